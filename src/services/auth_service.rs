//! services/auth_service.rs
//! Emisión y validación de JWT, y hashing de contraseñas con Argon2id.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::auth_model::{Claims, LoginRequest, RegisterRequest, TokenResponse};
use crate::models::usuario_model::{UsuarioRecord, UsuarioResponse};
use crate::services::usuario_service::UsuarioService;

const CREDENCIALES_INVALIDAS: &str = "Usuario o contraseña incorrectos";

/// Contraseña del hash señuelo; se verifica contra él cuando el usuario no existe
/// para que ambos rechazos cuesten lo mismo.
const PASSWORD_SENUELO: &str = "usuario-inexistente";

struct Llaves {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

#[derive(Clone)]
pub struct AuthService {
    usuario_service: UsuarioService,
    llaves: Arc<Llaves>,
    hash_senuelo: Arc<str>,
    expiracion_horas: i64,
}

impl AuthService {
    pub fn new(
        usuario_service: UsuarioService,
        jwt_secret: &str,
        expiracion_horas: i64,
    ) -> Result<Self> {
        let llaves = Llaves {
            encoding: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(jwt_secret.as_bytes()),
        };
        let hash_senuelo = hash_password(PASSWORD_SENUELO)?;
        Ok(AuthService {
            usuario_service,
            llaves: Arc::new(llaves),
            hash_senuelo: Arc::from(hash_senuelo),
            expiracion_horas,
        })
    }

    pub async fn login(&self, req: LoginRequest) -> AppResult<TokenResponse> {
        let record = match self.usuario_service.find_para_login(&req.usuario).await? {
            Some(record) => record,
            None => {
                verify_password(&req.password, &self.hash_senuelo);
                log::warn!("Login fallido: usuario '{}' inexistente o inactivo", req.usuario.trim());
                return Err(AppError::unauthorized(CREDENCIALES_INVALIDAS));
            }
        };

        if !verify_password(&req.password, &record.password_hash) {
            log::warn!("Login fallido: contraseña incorrecta para '{}'", record.username);
            return Err(AppError::unauthorized(CREDENCIALES_INVALIDAS));
        }

        let usuario = self.respuesta_usuario(record).await?;
        log::info!("Login correcto: usuario '{}'", usuario.username);
        self.emitir_token(usuario)
    }

    pub async fn register(&self, req: RegisterRequest) -> AppResult<TokenResponse> {
        let usuario = self
            .usuario_service
            .registrar(&req.username, &req.email, &req.nombre_completo, &req.password)
            .await?;
        self.emitir_token(usuario)
    }

    /// Valida el token y recarga el usuario: un usuario desactivado o con roles
    /// revocados pierde el acceso aunque su token siga vigente.
    pub async fn autenticar(&self, token: &str) -> AppResult<UsuarioResponse> {
        let claims = self.validar_token(token)?;
        match self.usuario_service.get(claims.sub).await {
            Ok(usuario) => Ok(usuario),
            Err(AppError::NotFound(_)) => {
                Err(AppError::unauthorized("El usuario del token no está activo"))
            }
            Err(e) => Err(e),
        }
    }

    pub fn emitir_token(&self, usuario: UsuarioResponse) -> AppResult<TokenResponse> {
        let ahora = Utc::now();
        let expira_en = ahora + Duration::hours(self.expiracion_horas);
        let claims = Claims {
            sub: usuario.id,
            username: usuario.username.clone(),
            roles: usuario.roles.clone(),
            iat: ahora.timestamp(),
            exp: expira_en.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.llaves.encoding)
            .context("No se pudo firmar el JWT")?;

        Ok(TokenResponse {
            token,
            tipo: "Bearer".to_string(),
            expira_en,
            usuario,
        })
    }

    pub fn validar_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.llaves.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Token rechazado: {}", e);
                AppError::unauthorized("Token inválido o expirado")
            })
    }

    async fn respuesta_usuario(&self, record: UsuarioRecord) -> AppResult<UsuarioResponse> {
        let roles = self.usuario_service.roles(record.id).await?;
        Ok(UsuarioResponse::from_record(record, roles))
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| anyhow!("No se pudo generar la sal: {}", e))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("No se pudo hashear la contraseña: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

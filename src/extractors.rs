//! extractors.rs
//! Extractor de usuario autenticado a partir del header `Authorization: Bearer <jwt>`.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::errors::{AppError, AppResult};
use crate::models::usuario_model::{Rol, UsuarioResponse};
use crate::services::auth_service::AuthService;

/// Usuario activo dueño del token. Se recarga desde la base en cada petición.
#[derive(Debug, Clone)]
pub struct UsuarioAutenticado(pub UsuarioResponse);

impl UsuarioAutenticado {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn es_propietario(&self) -> bool {
        self.0.tiene_rol(Rol::Propietario)
    }

    pub fn es_admin(&self) -> bool {
        self.0.tiene_rol(Rol::Administrador) || self.es_propietario()
    }

    pub fn requerir_admin(&self) -> AppResult<()> {
        if self.es_admin() {
            Ok(())
        } else {
            log::warn!(
                "Usuario '{}' sin permisos de administración",
                self.0.username
            );
            Err(AppError::forbidden(
                "Se requiere rol ADMINISTRADOR o PROPIETARIO",
            ))
        }
    }
}

impl FromRequest for UsuarioAutenticado {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_service = req.app_data::<web::Data<AuthService>>().cloned();
        let token = extraer_bearer(req);

        Box::pin(async move {
            let auth_service = auth_service
                .ok_or_else(|| AppError::Internal(anyhow::anyhow!("AuthService no registrado")))?;
            let token = token.ok_or_else(|| AppError::unauthorized("Token de acceso requerido"))?;
            let usuario = auth_service.autenticar(&token).await?;
            Ok(UsuarioAutenticado(usuario))
        })
    }
}

fn extraer_bearer(req: &HttpRequest) -> Option<String> {
    let valor = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = valor
        .strip_prefix("Bearer ")
        .or_else(|| valor.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

//! models/auth_model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::usuario_model::{Rol, UsuarioResponse};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username o email
    pub usuario: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub nombre_completo: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub tipo: String,
    pub expira_en: DateTime<Utc>,
    pub usuario: UsuarioResponse,
}

/// Claims del JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub roles: Vec<Rol>,
    pub iat: i64,
    pub exp: i64,
}

//! handlers/auth_handler.rs
//! Endpoints públicos de autenticación y el perfil del usuario actual.

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::extractors::UsuarioAutenticado;
use crate::models::auth_model::{LoginRequest, RegisterRequest};
use crate::services::auth_service::AuthService;

/// POST /auth/login
pub async fn login_endpoint(
    auth_service: web::Data<AuthService>,
    req_body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let token = auth_service.login(req_body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(token))
}

/// POST /auth/register
/// El primer usuario registrado queda como PROPIETARIO.
pub async fn register_endpoint(
    auth_service: web::Data<AuthService>,
    req_body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let token = auth_service.register(req_body.into_inner()).await?;
    Ok(HttpResponse::Created().json(token))
}

/// GET /auth/me
pub async fn me_endpoint(usuario: UsuarioAutenticado) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(usuario.0))
}

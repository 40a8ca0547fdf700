//! handlers/usuario_handler.rs
//! Administración de usuarios. Las reglas sobre el PROPIETARIO viven en UsuarioService.

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::extractors::UsuarioAutenticado;
use crate::models::common_model::{MensajeResponse, PaginationQuery};
use crate::models::usuario_model::{CreateUsuarioRequest, RolesRequest, UpdateUsuarioRequest};
use crate::services::usuario_service::UsuarioService;

/// GET /api/usuarios
pub async fn list_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<UsuarioService>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    Ok(HttpResponse::Ok().json(service.list(&query).await?))
}

/// GET /api/usuarios/{id}
pub async fn get_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<UsuarioService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    Ok(HttpResponse::Ok().json(service.get(path.into_inner()).await?))
}

/// POST /api/usuarios
pub async fn create_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<UsuarioService>,
    req_body: web::Json<CreateUsuarioRequest>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    let creado = service.create(&usuario.0, req_body.into_inner()).await?;
    Ok(HttpResponse::Created().json(creado))
}

/// PUT /api/usuarios/{id}
pub async fn update_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<UsuarioService>,
    path: web::Path<i64>,
    req_body: web::Json<UpdateUsuarioRequest>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    let actualizado = service
        .update(&usuario.0, path.into_inner(), req_body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(actualizado))
}

/// PUT /api/usuarios/{id}/roles
pub async fn set_roles_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<UsuarioService>,
    path: web::Path<i64>,
    req_body: web::Json<RolesRequest>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    let actualizado = service
        .set_roles(&usuario.0, path.into_inner(), &req_body.roles)
        .await?;
    Ok(HttpResponse::Ok().json(actualizado))
}

/// DELETE /api/usuarios/{id}
pub async fn delete_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<UsuarioService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    service.delete(&usuario.0, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MensajeResponse::ok("Usuario eliminado")))
}

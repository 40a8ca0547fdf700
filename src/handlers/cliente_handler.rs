//! handlers/cliente_handler.rs
//! Clientes: cualquier usuario autenticado registra y edita; solo un admin elimina.

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::extractors::UsuarioAutenticado;
use crate::models::cliente_model::ClienteRequest;
use crate::models::common_model::{MensajeResponse, PaginationQuery};
use crate::services::cliente_service::ClienteService;

/// GET /api/clientes?q=
pub async fn list_endpoint(
    _usuario: UsuarioAutenticado,
    service: web::Data<ClienteService>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.list(&query).await?))
}

/// GET /api/clientes/{id}
pub async fn get_endpoint(
    _usuario: UsuarioAutenticado,
    service: web::Data<ClienteService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.get(path.into_inner()).await?))
}

/// POST /api/clientes
pub async fn create_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<ClienteService>,
    req_body: web::Json<ClienteRequest>,
) -> Result<HttpResponse, AppError> {
    let record = service.create(req_body.into_inner()).await?;
    log::info!("Cliente {} registrado por {}", record.id, usuario.0.username);
    Ok(HttpResponse::Created().json(record))
}

/// PUT /api/clientes/{id}
pub async fn update_endpoint(
    _usuario: UsuarioAutenticado,
    service: web::Data<ClienteService>,
    path: web::Path<i64>,
    req_body: web::Json<ClienteRequest>,
) -> Result<HttpResponse, AppError> {
    let record = service
        .update(path.into_inner(), req_body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

/// DELETE /api/clientes/{id}
pub async fn delete_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<ClienteService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    service.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MensajeResponse::ok("Cliente eliminado")))
}

//! handlers/moneda_handler.rs

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::extractors::UsuarioAutenticado;
use crate::models::common_model::{MensajeResponse, PaginationQuery};
use crate::models::moneda_model::MonedaRequest;
use crate::services::moneda_service::MonedaService;

/// GET /api/monedas
pub async fn list_endpoint(
    _usuario: UsuarioAutenticado,
    service: web::Data<MonedaService>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.list(&query).await?))
}

/// GET /api/monedas/{id}
pub async fn get_endpoint(
    _usuario: UsuarioAutenticado,
    service: web::Data<MonedaService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.get(path.into_inner()).await?))
}

/// POST /api/monedas
pub async fn create_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<MonedaService>,
    req_body: web::Json<MonedaRequest>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    let record = service.create(req_body.into_inner()).await?;
    Ok(HttpResponse::Created().json(record))
}

/// PUT /api/monedas/{id}
pub async fn update_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<MonedaService>,
    path: web::Path<i64>,
    req_body: web::Json<MonedaRequest>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    let record = service
        .update(path.into_inner(), req_body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

/// DELETE /api/monedas/{id}
pub async fn delete_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<MonedaService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    service.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MensajeResponse::ok("Moneda eliminada")))
}

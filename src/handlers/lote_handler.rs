//! handlers/lote_handler.rs

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::extractors::UsuarioAutenticado;
use crate::models::common_model::{MensajeResponse, PaginationQuery};
use crate::models::lote_model::{LoteFiltro, LoteRequest};
use crate::services::lote_service::LoteService;

/// GET /api/lotes?proyecto_id=&estado=
pub async fn list_endpoint(
    _usuario: UsuarioAutenticado,
    service: web::Data<LoteService>,
    filtro: web::Query<LoteFiltro>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.list(&filtro, &query).await?))
}

/// GET /api/lotes/{id}
pub async fn get_endpoint(
    _usuario: UsuarioAutenticado,
    service: web::Data<LoteService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.get(path.into_inner()).await?))
}

/// POST /api/lotes
pub async fn create_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<LoteService>,
    req_body: web::Json<LoteRequest>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    let record = service.create(req_body.into_inner()).await?;
    Ok(HttpResponse::Created().json(record))
}

/// PUT /api/lotes/{id}
/// El estado solo puede pasar a DISPONIBLE o RESERVADO; VENDIDO lo asigna la venta.
pub async fn update_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<LoteService>,
    path: web::Path<i64>,
    req_body: web::Json<LoteRequest>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    let record = service
        .update(path.into_inner(), req_body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

/// DELETE /api/lotes/{id}
pub async fn delete_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<LoteService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    service.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MensajeResponse::ok("Lote eliminado")))
}

//! handlers/venta_handler.rs
//! Ventas de lotes y su estado de cuenta.

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::extractors::UsuarioAutenticado;
use crate::models::common_model::{MensajeResponse, PaginationQuery};
use crate::models::venta_model::{CreateVentaRequest, UpdateVentaRequest, VentaFiltro};
use crate::services::abono_service::AbonoService;
use crate::services::venta_service::VentaService;

/// GET /api/ventas?cliente_id=&lote_id=&estado=&q=
pub async fn list_endpoint(
    _usuario: UsuarioAutenticado,
    service: web::Data<VentaService>,
    filtro: web::Query<VentaFiltro>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.list(&filtro, &query).await?))
}

/// GET /api/ventas/{id}
pub async fn get_endpoint(
    _usuario: UsuarioAutenticado,
    service: web::Data<VentaService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.get(path.into_inner()).await?))
}

/// POST /api/ventas
/// El vendedor registrado es el usuario del token.
pub async fn create_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<VentaService>,
    req_body: web::Json<CreateVentaRequest>,
) -> Result<HttpResponse, AppError> {
    let record = service.create(req_body.into_inner(), usuario.id()).await?;
    Ok(HttpResponse::Created().json(record))
}

/// PUT /api/ventas/{id}
pub async fn update_endpoint(
    _usuario: UsuarioAutenticado,
    service: web::Data<VentaService>,
    path: web::Path<i64>,
    req_body: web::Json<UpdateVentaRequest>,
) -> Result<HttpResponse, AppError> {
    let record = service
        .update(path.into_inner(), req_body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

/// POST /api/ventas/{id}/anular
pub async fn anular_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<VentaService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    let record = service.anular(path.into_inner()).await?;
    log::warn!("Venta {} anulada por {}", record.id, usuario.0.username);
    Ok(HttpResponse::Ok().json(record))
}

/// DELETE /api/ventas/{id}
pub async fn delete_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<VentaService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    service.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MensajeResponse::ok("Venta eliminada")))
}

/// GET /api/ventas/{id}/estado-cuenta
pub async fn estado_cuenta_endpoint(
    _usuario: UsuarioAutenticado,
    service: web::Data<VentaService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.estado_cuenta(path.into_inner()).await?))
}

/// GET /api/ventas/{id}/abonos
pub async fn list_abonos_endpoint(
    _usuario: UsuarioAutenticado,
    abono_service: web::Data<AbonoService>,
    path: web::Path<i64>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let pagina = abono_service
        .list_por_venta(path.into_inner(), &query)
        .await?;
    Ok(HttpResponse::Ok().json(pagina))
}

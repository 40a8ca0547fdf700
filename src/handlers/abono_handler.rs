//! handlers/abono_handler.rs

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::extractors::UsuarioAutenticado;
use crate::models::abono_model::{CreateAbonoRequest, UpdateAbonoRequest};
use crate::models::common_model::MensajeResponse;
use crate::services::abono_service::AbonoService;

/// GET /api/abonos/{id}
pub async fn get_endpoint(
    _usuario: UsuarioAutenticado,
    service: web::Data<AbonoService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(service.get(path.into_inner()).await?))
}

/// POST /api/abonos
/// Rechaza montos que excedan el saldo pendiente de la venta.
pub async fn create_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<AbonoService>,
    req_body: web::Json<CreateAbonoRequest>,
) -> Result<HttpResponse, AppError> {
    let record = service.create(req_body.into_inner(), usuario.id()).await?;
    Ok(HttpResponse::Created().json(record))
}

/// PUT /api/abonos/{id}
pub async fn update_endpoint(
    _usuario: UsuarioAutenticado,
    service: web::Data<AbonoService>,
    path: web::Path<i64>,
    req_body: web::Json<UpdateAbonoRequest>,
) -> Result<HttpResponse, AppError> {
    let record = service
        .update(path.into_inner(), req_body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

/// DELETE /api/abonos/{id}
pub async fn delete_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<AbonoService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    service.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MensajeResponse::ok("Abono eliminado")))
}

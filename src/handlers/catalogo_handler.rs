//! handlers/catalogo_handler.rs
//! CRUD de catálogos simples. El tipo de catálogo llega como `web::Data<TipoCatalogo>`
//! registrado en cada scope (departamentos, tipos-documento, tipos-lote).

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::extractors::UsuarioAutenticado;
use crate::models::catalogo_model::{CatalogoRequest, TipoCatalogo};
use crate::models::common_model::{MensajeResponse, PaginationQuery};
use crate::services::catalogo_service::CatalogoService;

/// GET /api/{catalogo}
pub async fn list_endpoint(
    _usuario: UsuarioAutenticado,
    tipo: web::Data<TipoCatalogo>,
    service: web::Data<CatalogoService>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let pagina = service.list(**tipo, &query).await?;
    Ok(HttpResponse::Ok().json(pagina))
}

/// GET /api/{catalogo}/{id}
pub async fn get_endpoint(
    _usuario: UsuarioAutenticado,
    tipo: web::Data<TipoCatalogo>,
    service: web::Data<CatalogoService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let record = service.get(**tipo, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// POST /api/{catalogo}
pub async fn create_endpoint(
    usuario: UsuarioAutenticado,
    tipo: web::Data<TipoCatalogo>,
    service: web::Data<CatalogoService>,
    req_body: web::Json<CatalogoRequest>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    let record = service.create(**tipo, req_body.into_inner()).await?;
    Ok(HttpResponse::Created().json(record))
}

/// PUT /api/{catalogo}/{id}
pub async fn update_endpoint(
    usuario: UsuarioAutenticado,
    tipo: web::Data<TipoCatalogo>,
    service: web::Data<CatalogoService>,
    path: web::Path<i64>,
    req_body: web::Json<CatalogoRequest>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    let record = service
        .update(**tipo, path.into_inner(), req_body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

/// DELETE /api/{catalogo}/{id}
pub async fn delete_endpoint(
    usuario: UsuarioAutenticado,
    tipo: web::Data<TipoCatalogo>,
    service: web::Data<CatalogoService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    service.delete(**tipo, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MensajeResponse::ok(format!(
        "{} eliminado",
        tipo.etiqueta()
    ))))
}

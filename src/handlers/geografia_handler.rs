//! handlers/geografia_handler.rs

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::extractors::UsuarioAutenticado;
use crate::models::common_model::{MensajeResponse, PaginationQuery};
use crate::models::geografia_model::{DistritoFiltro, DistritoRequest, ProvinciaFiltro, ProvinciaRequest};
use crate::services::geografia_service::GeografiaService;

/// GET /api/provincias?departamento_id=
pub async fn list_provincias_endpoint(
    _usuario: UsuarioAutenticado,
    service: web::Data<GeografiaService>,
    filtro: web::Query<ProvinciaFiltro>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let pagina = service.list_provincias(&filtro, &query).await?;
    Ok(HttpResponse::Ok().json(pagina))
}

/// GET /api/provincias/{id}
pub async fn get_provincia_endpoint(
    _usuario: UsuarioAutenticado,
    service: web::Data<GeografiaService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let record = service.get_provincia(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// POST /api/provincias
pub async fn create_provincia_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<GeografiaService>,
    req_body: web::Json<ProvinciaRequest>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    let record = service.create_provincia(req_body.into_inner()).await?;
    Ok(HttpResponse::Created().json(record))
}

/// PUT /api/provincias/{id}
pub async fn update_provincia_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<GeografiaService>,
    path: web::Path<i64>,
    req_body: web::Json<ProvinciaRequest>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    let record = service
        .update_provincia(path.into_inner(), req_body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

/// DELETE /api/provincias/{id}
pub async fn delete_provincia_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<GeografiaService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    service.delete_provincia(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MensajeResponse::ok("Provincia eliminada")))
}

/// GET /api/distritos?provincia_id=
pub async fn list_distritos_endpoint(
    _usuario: UsuarioAutenticado,
    service: web::Data<GeografiaService>,
    filtro: web::Query<DistritoFiltro>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let pagina = service.list_distritos(&filtro, &query).await?;
    Ok(HttpResponse::Ok().json(pagina))
}

/// GET /api/distritos/{id}
pub async fn get_distrito_endpoint(
    _usuario: UsuarioAutenticado,
    service: web::Data<GeografiaService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let record = service.get_distrito(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// POST /api/distritos
pub async fn create_distrito_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<GeografiaService>,
    req_body: web::Json<DistritoRequest>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    let record = service.create_distrito(req_body.into_inner()).await?;
    Ok(HttpResponse::Created().json(record))
}

/// PUT /api/distritos/{id}
pub async fn update_distrito_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<GeografiaService>,
    path: web::Path<i64>,
    req_body: web::Json<DistritoRequest>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    let record = service
        .update_distrito(path.into_inner(), req_body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

/// DELETE /api/distritos/{id}
pub async fn delete_distrito_endpoint(
    usuario: UsuarioAutenticado,
    service: web::Data<GeografiaService>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    service.delete_distrito(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MensajeResponse::ok("Distrito eliminado")))
}

//! handlers/salud_handler.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::{Pool, Sqlite};

use crate::errors::AppError;

/// GET /health
pub async fn health_endpoint(db_pool: web::Data<Pool<Sqlite>>) -> Result<HttpResponse, AppError> {
    sqlx::query("SELECT 1").execute(db_pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

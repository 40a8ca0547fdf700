//! models/cliente_model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClienteRecord {
    pub id: i64,
    pub tipo_documento_id: i64,
    pub numero_documento: String,
    pub nombres: String,
    pub apellidos: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub direccion: Option<String>,
    pub distrito_id: Option<i64>,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClienteRequest {
    pub tipo_documento_id: i64,
    pub numero_documento: String,
    pub nombres: String,
    pub apellidos: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub direccion: Option<String>,
    pub distrito_id: Option<i64>,
}

//! models/proyecto_model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProyectoRecord {
    pub id: i64,
    pub nombre: String,
    #[serde(skip_serializing, default)]
    pub nombre_normalizado: String,
    pub descripcion: Option<String>,
    pub ubicacion: Option<String>,
    pub distrito_id: Option<i64>,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProyectoRequest {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub ubicacion: Option<String>,
    pub distrito_id: Option<i64>,
}

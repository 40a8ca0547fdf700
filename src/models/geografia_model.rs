//! models/geografia_model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProvinciaRecord {
    pub id: i64,
    pub departamento_id: i64,
    pub nombre: String,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProvinciaRequest {
    pub departamento_id: i64,
    pub nombre: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DistritoRecord {
    pub id: i64,
    pub provincia_id: i64,
    pub nombre: String,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DistritoRequest {
    pub provincia_id: i64,
    pub nombre: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvinciaFiltro {
    pub departamento_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DistritoFiltro {
    pub provincia_id: Option<i64>,
}

//! models/moneda_model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MonedaRecord {
    pub id: i64,
    /// Código ISO 4217 (PEN, USD...)
    pub codigo: String,
    pub nombre: String,
    pub simbolo: String,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonedaRequest {
    pub codigo: String,
    pub nombre: String,
    pub simbolo: String,
}

//! models/lote_model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoLote {
    Disponible,
    Reservado,
    Vendido,
}

impl EstadoLote {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoLote::Disponible => "DISPONIBLE",
            EstadoLote::Reservado => "RESERVADO",
            EstadoLote::Vendido => "VENDIDO",
        }
    }
}

impl TryFrom<String> for EstadoLote {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "DISPONIBLE" => Ok(EstadoLote::Disponible),
            "RESERVADO" => Ok(EstadoLote::Reservado),
            "VENDIDO" => Ok(EstadoLote::Vendido),
            otro => Err(format!("Estado de lote desconocido: {}", otro)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LoteRecord {
    pub id: i64,
    pub proyecto_id: i64,
    pub tipo_lote_id: Option<i64>,
    pub manzana: String,
    pub numero: String,
    pub area: f64,
    pub precio: f64,
    #[sqlx(try_from = "String")]
    pub estado: EstadoLote,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoteRequest {
    pub proyecto_id: i64,
    pub tipo_lote_id: Option<i64>,
    pub manzana: String,
    pub numero: String,
    pub area: f64,
    pub precio: f64,
    /// Solo DISPONIBLE o RESERVADO; VENDIDO lo pone el flujo de ventas.
    pub estado: Option<EstadoLote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoteFiltro {
    pub proyecto_id: Option<i64>,
    pub estado: Option<EstadoLote>,
}

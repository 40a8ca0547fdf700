//! models/venta_model.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::abono_model::AbonoRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoVenta {
    EnProceso,
    Pagada,
    Anulada,
}

impl EstadoVenta {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoVenta::EnProceso => "EN_PROCESO",
            EstadoVenta::Pagada => "PAGADA",
            EstadoVenta::Anulada => "ANULADA",
        }
    }
}

impl TryFrom<String> for EstadoVenta {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "EN_PROCESO" => Ok(EstadoVenta::EnProceso),
            "PAGADA" => Ok(EstadoVenta::Pagada),
            "ANULADA" => Ok(EstadoVenta::Anulada),
            otro => Err(format!("Estado de venta desconocido: {}", otro)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VentaRecord {
    pub id: i64,
    pub cliente_id: i64,
    pub lote_id: i64,
    pub moneda_id: i64,
    pub usuario_id: i64,
    pub monto_total: f64,
    pub fecha_venta: NaiveDate,
    #[sqlx(try_from = "String")]
    pub estado: EstadoVenta,
    pub observaciones: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVentaRequest {
    pub cliente_id: i64,
    pub lote_id: i64,
    pub moneda_id: i64,
    pub monto_total: f64,
    /// Por defecto, la fecha de hoy
    pub fecha_venta: Option<NaiveDate>,
    pub observaciones: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateVentaRequest {
    pub moneda_id: i64,
    pub monto_total: f64,
    pub fecha_venta: NaiveDate,
    pub observaciones: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VentaFiltro {
    pub cliente_id: Option<i64>,
    pub lote_id: Option<i64>,
    pub estado: Option<EstadoVenta>,
}

/// Venta con sus abonos vigentes y el saldo pendiente.
#[derive(Debug, Clone, Serialize)]
pub struct EstadoCuentaResponse {
    pub venta: VentaRecord,
    pub abonos: Vec<AbonoRecord>,
    pub total_abonado: f64,
    pub saldo: f64,
}

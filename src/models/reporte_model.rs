//! models/reporte_model.rs
//! Parámetros del reporte y la respuesta JSON del servicio de analítica.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReporteVentasQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desde: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hasta: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proyecto_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicador {
    pub nombre: String,
    pub valor: Value,
}

/// Cuerpo que devuelve `GET /analytics/ventas`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReporteAnalitico {
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub periodo: Option<String>,
    #[serde(default)]
    pub indicadores: Vec<Indicador>,
    #[serde(default)]
    pub columnas: Vec<String>,
    #[serde(default)]
    pub filas: Vec<Vec<Value>>,
}

//! models/abono_model.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AbonoRecord {
    pub id: i64,
    pub venta_id: i64,
    pub monto_abonado: f64,
    pub fecha_abono: NaiveDate,
    pub metodo_pago: Option<String>,
    pub numero_operacion: Option<String>,
    pub observacion: Option<String>,
    pub usuario_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAbonoRequest {
    pub venta_id: i64,
    pub monto_abonado: f64,
    pub fecha_abono: Option<NaiveDate>,
    pub metodo_pago: Option<String>,
    pub numero_operacion: Option<String>,
    pub observacion: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAbonoRequest {
    pub monto_abonado: f64,
    pub fecha_abono: NaiveDate,
    pub metodo_pago: Option<String>,
    pub numero_operacion: Option<String>,
    pub observacion: Option<String>,
}

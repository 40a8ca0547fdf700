//! handlers/mod.rs
//! Módulo que agrupa los distintos handlers HTTP.

pub mod abono_handler;
pub mod auth_handler;
pub mod catalogo_handler;
pub mod cliente_handler;
pub mod geografia_handler;
pub mod lote_handler;
pub mod moneda_handler;
pub mod proyecto_handler;
pub mod reporte_handler;
pub mod salud_handler;
pub mod usuario_handler;
pub mod venta_handler;

//! services/mod.rs
//! Módulo que agrupa los distintos "servicios" o "capas de negocio" de la app.

pub mod abono_service;
pub mod auth_service;
pub mod catalogo_service;
pub mod cliente_service;
pub mod geografia_service;
pub mod lote_service;
pub mod moneda_service;
pub mod pdf_service;
pub mod proyecto_service;
pub mod reporte_service;
pub mod saldo_venta;
pub mod usuario_service;
pub mod validaciones;
pub mod venta_service;

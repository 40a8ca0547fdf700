//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

pub mod abono_model;
pub mod auth_model;
pub mod catalogo_model;
pub mod cliente_model;
pub mod common_model;
pub mod geografia_model;
pub mod lote_model;
pub mod moneda_model;
pub mod pdf_model;
pub mod proyecto_model;
pub mod reporte_model;
pub mod usuario_model;
pub mod venta_model;

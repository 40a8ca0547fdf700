//! config/pdf_config.rs
//! Maquetado de los reportes PDF.

use crate::models::pdf_model::{PdfMargins, PdfOrientation, PdfPagePreset};

/// Configuración global de reportes; los márgenes van en milímetros.
/// `AppConfig` la arma desde `REPORTE_*`.
#[derive(Debug, Clone)]
pub struct ReportePdfConfig {
    pub titulo_empresa: String,
    pub orientacion: PdfOrientation,
    pub tamano_pagina: PdfPagePreset,
    pub margenes: PdfMargins,
    /// Zoom de wkhtmltopdf (1.0 = sin cambio)
    pub zoom: f64,
}

impl Default for ReportePdfConfig {
    fn default() -> Self {
        ReportePdfConfig {
            titulo_empresa: "Inmobiliaria".to_string(),
            orientacion: PdfOrientation::Landscape,
            tamano_pagina: PdfPagePreset::A4,
            margenes: PdfMargins {
                top: 12.0,
                bottom: 12.0,
                left: 10.0,
                right: 10.0,
            },
            zoom: 1.0,
        }
    }
}

//! models/pdf_model.rs
//! Estructuras de datos para la generación de PDFs con wkhtmltopdf.

use std::str::FromStr;

use serde::Serialize;

/// Márgenes en milímetros
#[derive(Debug, Clone)]
pub struct PdfMargins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfOrientation {
    Portrait,
    Landscape,
}

impl FromStr for PdfOrientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "portrait" | "vertical" => Ok(PdfOrientation::Portrait),
            "landscape" | "horizontal" => Ok(PdfOrientation::Landscape),
            otro => Err(format!("orientación desconocida: {}", otro)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfPagePreset {
    A4,
    A3,
    Letter,
    Legal,
}

impl PdfPagePreset {
    /// Nombre que espera `--page-size` de wkhtmltopdf
    pub fn as_str(&self) -> &'static str {
        match self {
            PdfPagePreset::A4 => "A4",
            PdfPagePreset::A3 => "A3",
            PdfPagePreset::Letter => "Letter",
            PdfPagePreset::Legal => "Legal",
        }
    }
}

impl FromStr for PdfPagePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A4" => Ok(PdfPagePreset::A4),
            "A3" => Ok(PdfPagePreset::A3),
            "LETTER" | "CARTA" => Ok(PdfPagePreset::Letter),
            "LEGAL" | "OFICIO" => Ok(PdfPagePreset::Legal),
            otro => Err(format!("tamaño de página desconocido: {}", otro)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PdfRequest {
    pub file_name: String,
    /// HTML que vamos a renderizar.
    pub html: String,
    pub orientation: Option<PdfOrientation>,
    pub page_size_preset: Option<PdfPagePreset>,
    pub margins: Option<PdfMargins>,
    /// Zoom de wkhtmltopdf (1.0 = sin cambio)
    pub scale: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PdfResponse {
    pub success: bool,
    pub message: String,
}

impl PdfRequest {
    #[cfg(test)]
    pub fn test_new(html: String) -> Self {
        Self {
            file_name: "test.pdf".to_string(),
            html,
            orientation: None,
            page_size_preset: None,
            margins: None,
            scale: None,
        }
    }
}

//! models/common_model.rs
//! Tipos compartidos por todos los listados: paginación y búsqueda.

use serde::{Deserialize, Serialize};

pub const PAGE_SIZE_DEFAULT: u64 = 10;
pub const PAGE_SIZE_MAX: u64 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    /// Texto libre de búsqueda
    pub q: Option<String>,
}

impl PaginationQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
            .unwrap_or(PAGE_SIZE_DEFAULT)
            .clamp(1, PAGE_SIZE_MAX)
    }

    /// Satura en `i64::MAX`: una página enorme simplemente queda vacía.
    pub fn offset(&self) -> i64 {
        let offset = (self.page() - 1).saturating_mul(self.page_size());
        i64::try_from(offset).unwrap_or(i64::MAX)
    }

    pub fn limit(&self) -> i64 {
        self.page_size() as i64
    }

    /// Patrón LIKE plegado a minúsculas, o None si no hay búsqueda.
    /// Se compara contra columnas `busqueda` / `*_normalizado` plegadas igual.
    pub fn patron_busqueda(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{}%", q.to_lowercase()))
    }
}

/// Respuesta paginada genérica
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagina<T> {
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub items: Vec<T>,
}

impl<T> Pagina<T> {
    pub fn new(query: &PaginationQuery, total: i64, items: Vec<T>) -> Self {
        Pagina {
            total: total.max(0) as u64,
            page: query.page(),
            page_size: query.page_size(),
            items,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MensajeResponse {
    pub success: bool,
    pub message: String,
}

impl MensajeResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Limpia un texto opcional: recorta y descarta cadenas vacías.
pub fn texto_opcional(valor: Option<String>) -> Option<String> {
    valor
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Recorta un texto obligatorio; error si queda vacío.
pub fn texto_requerido(valor: &str, campo: &str) -> crate::errors::AppResult<String> {
    let limpio = valor.trim();
    if limpio.is_empty() {
        return Err(crate::errors::AppError::bad_request(format!(
            "El campo '{}' es obligatorio",
            campo
        )));
    }
    Ok(limpio.to_string())
}

/// Forma canónica de un nombre para la unicidad: sin espacios extremos,
/// espacios internos colapsados y en minúsculas (Unicode).
pub fn normalizar_nombre(nombre: &str) -> String {
    nombre
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Texto de la columna `busqueda`: los campos presentes, en minúsculas,
/// uno por línea. `LOWER()` de SQLite no pliega acentos ni la ñ.
pub fn texto_busqueda(campos: &[Option<&str>]) -> String {
    campos
        .iter()
        .flatten()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

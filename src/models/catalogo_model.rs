//! models/catalogo_model.rs
//! Catálogos simples (nombre + descripción): departamentos, tipos de documento y tipos de lote.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipoCatalogo {
    Departamento,
    TipoDocumento,
    TipoLote,
}

impl TipoCatalogo {
    pub fn tabla(&self) -> &'static str {
        match self {
            TipoCatalogo::Departamento => "departamentos",
            TipoCatalogo::TipoDocumento => "tipos_documento",
            TipoCatalogo::TipoLote => "tipos_lote",
        }
    }

    /// Nombre legible para mensajes de error
    pub fn etiqueta(&self) -> &'static str {
        match self {
            TipoCatalogo::Departamento => "Departamento",
            TipoCatalogo::TipoDocumento => "Tipo de documento",
            TipoCatalogo::TipoLote => "Tipo de lote",
        }
    }

    /// Tabla y columna que dependen de este catálogo; bloquean el borrado mientras estén activas.
    pub fn dependientes(&self) -> (&'static str, &'static str) {
        match self {
            TipoCatalogo::Departamento => ("provincias", "departamento_id"),
            TipoCatalogo::TipoDocumento => ("clientes", "tipo_documento_id"),
            TipoCatalogo::TipoLote => ("lotes", "tipo_lote_id"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CatalogoRecord {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogoRequest {
    pub nombre: String,
    pub descripcion: Option<String>,
}

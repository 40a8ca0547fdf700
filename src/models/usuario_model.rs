//! models/usuario_model.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rol {
    Propietario,
    Administrador,
    Vendedor,
}

impl Rol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rol::Propietario => "PROPIETARIO",
            Rol::Administrador => "ADMINISTRADOR",
            Rol::Vendedor => "VENDEDOR",
        }
    }
}

impl TryFrom<String> for Rol {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "PROPIETARIO" => Ok(Rol::Propietario),
            "ADMINISTRADOR" => Ok(Rol::Administrador),
            "VENDEDOR" => Ok(Rol::Vendedor),
            otro => Err(format!("Rol desconocido: {}", otro)),
        }
    }
}

/// Fila de la tabla `usuarios`. Nunca se serializa hacia afuera.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UsuarioRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub nombre_completo: String,
    pub password_hash: String,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Usuario con sus roles, tal como se expone en la API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsuarioResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub nombre_completo: String,
    pub activo: bool,
    pub roles: Vec<Rol>,
    pub created_at: DateTime<Utc>,
}

impl UsuarioResponse {
    pub fn from_record(record: UsuarioRecord, roles: Vec<Rol>) -> Self {
        UsuarioResponse {
            id: record.id,
            username: record.username,
            email: record.email,
            nombre_completo: record.nombre_completo,
            activo: record.activo,
            roles,
            created_at: record.created_at,
        }
    }

    pub fn tiene_rol(&self, rol: Rol) -> bool {
        self.roles.contains(&rol)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUsuarioRequest {
    pub username: String,
    pub email: String,
    pub nombre_completo: String,
    pub password: String,
    pub roles: Vec<Rol>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUsuarioRequest {
    pub email: Option<String>,
    pub nombre_completo: Option<String>,
    pub activo: Option<bool>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RolesRequest {
    pub roles: Vec<Rol>,
}

//! config/app_config.rs
//! Configuración del servicio leída desde variables de entorno (.env incluido).

use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Result};

use crate::config::pdf_config::ReportePdfConfig;

const JWT_SECRET_DESARROLLO: &str = "inmobiliaria-dev-secret-cambiar-en-produccion";

/// `APP_ENV`; si falta se asume producción.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entorno {
    Desarrollo,
    Produccion,
}

impl FromStr for Entorno {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "desarrollo" | "dev" | "local" => Ok(Entorno::Desarrollo),
            "production" | "produccion" | "prod" => Ok(Entorno::Produccion),
            otro => Err(format!("entorno desconocido: {}", otro)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub entorno: Entorno,
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiracion_horas: i64,
    pub analytics_api_url: String,
    pub analytics_timeout: Duration,
    pub pdf_max_procesos: usize,
    pub reporte: ReportePdfConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construye la config a partir de una función de búsqueda; así los tests
    /// no necesitan tocar el entorno del proceso.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let entorno: Entorno = parse_or(&lookup, "APP_ENV", Entorno::Produccion)?;

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret,
            None if entorno == Entorno::Desarrollo => {
                log::warn!("JWT_SECRET no definido, usando secreto de desarrollo");
                JWT_SECRET_DESARROLLO.to_string()
            }
            None => {
                return Err(anyhow!(
                    "JWT_SECRET es obligatorio fuera de desarrollo (APP_ENV=development)"
                ))
            }
        };

        let jwt_expiracion_horas: i64 = parse_or(&lookup, "JWT_EXPIRACION_HORAS", 8)?;
        if jwt_expiracion_horas <= 0 {
            return Err(anyhow!("JWT_EXPIRACION_HORAS debe ser mayor a 0"));
        }

        let pdf_max_procesos: usize = parse_or(&lookup, "PDF_MAX_PROCESOS", 8)?;
        if pdf_max_procesos == 0 {
            return Err(anyhow!("PDF_MAX_PROCESOS debe ser mayor a 0"));
        }

        let workers: usize = parse_or(&lookup, "WORKERS", 4)?;
        if workers == 0 {
            return Err(anyhow!("WORKERS debe ser mayor a 0"));
        }

        Ok(AppConfig {
            entorno,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 5022)?,
            workers,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://data/inmobiliaria.db".to_string()),
            jwt_secret,
            jwt_expiracion_horas,
            analytics_api_url: lookup("ANALYTICS_API_URL")
                .unwrap_or_else(|| "http://localhost:8000".to_string())
                .trim_end_matches('/')
                .to_string(),
            analytics_timeout: Duration::from_secs(parse_or(&lookup, "ANALYTICS_TIMEOUT_SECS", 30)?),
            pdf_max_procesos,
            reporte: reporte_desde(&lookup)?,
        })
    }
}

/// Maquetado del reporte: `REPORTE_EMPRESA`, `REPORTE_ORIENTACION`,
/// `REPORTE_PAGINA` y `REPORTE_ZOOM` sobre los valores por defecto.
fn reporte_desde<F>(lookup: &F) -> Result<ReportePdfConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let base = ReportePdfConfig::default();

    let zoom: f64 = parse_or(lookup, "REPORTE_ZOOM", base.zoom)?;
    if !zoom.is_finite() || zoom <= 0.0 {
        return Err(anyhow!("REPORTE_ZOOM debe ser mayor a 0"));
    }

    Ok(ReportePdfConfig {
        titulo_empresa: lookup("REPORTE_EMPRESA")
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or(base.titulo_empresa),
        orientacion: parse_or(lookup, "REPORTE_ORIENTACION", base.orientacion)?,
        tamano_pagina: parse_or(lookup, "REPORTE_PAGINA", base.tamano_pagina)?,
        margenes: base.margenes,
        zoom,
    })
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| anyhow!("Valor inválido para {}: '{}'", key, raw)),
        None => Ok(default),
    }
}

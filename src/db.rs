//! db.rs
//! Conexión al pool SQLite y migraciones.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

pub async fn conectar(database_url: &str) -> Result<Pool<Sqlite>> {
    // Crear la carpeta del archivo si hace falta (p.ej. ./data)
    if let Some(ruta) = ruta_archivo(database_url) {
        if let Some(dir) = Path::new(ruta).parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("No se pudo crear el directorio {:?}", dir))?;
        }
    }

    log::info!("Conectando a SQLite en {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("DATABASE_URL inválida: {}", database_url))?
        .create_if_missing(true)
        .foreign_keys(true)
        // Las escrituras concurrentes esperan el lock en vez de fallar con SQLITE_BUSY
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("No se pudo conectar a la base de datos SQLite")?;

    Ok(pool)
}

/// Corre migraciones con sqlx
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Fallo al ejecutar migraciones")?;
    Ok(())
}

fn ruta_archivo(database_url: &str) -> Option<&str> {
    let ruta = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let ruta = ruta.split('?').next().unwrap_or(ruta);
    if ruta.is_empty() || ruta.starts_with(":memory:") {
        None
    } else {
        Some(ruta)
    }
}

/// Pool en memoria con el esquema aplicado. Una sola conexión: cada conexión
/// `:memory:` sería una base distinta.
#[cfg(test)]
pub async fn pool_en_memoria() -> Result<Pool<Sqlite>> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

//! services/validaciones.rs
//! Consultas de apoyo compartidas por los servicios (existencia y dependencias).

use sqlx::{Executor, Sqlite};

use crate::errors::{AppError, AppResult};

/// `tabla` y `columna` siempre son literales del código, nunca entrada del usuario.
pub async fn existe_activo<'e, E>(executor: E, tabla: &str, id: i64) -> AppResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT COUNT(*) FROM {} WHERE id = ?1 AND activo = 1", tabla);
    let n: i64 = sqlx::query_scalar(&sql).bind(id).fetch_one(executor).await?;
    Ok(n > 0)
}

/// 404 si el registro no existe o está dado de baja.
pub async fn requerir_activo<'e, E>(executor: E, tabla: &str, id: i64, etiqueta: &str) -> AppResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    if existe_activo(executor, tabla, id).await? {
        Ok(())
    } else {
        Err(AppError::not_found(format!(
            "{} con id {} no encontrado",
            etiqueta, id
        )))
    }
}

/// Cuenta filas activas de `tabla` que referencian `id` por `columna`.
pub async fn contar_dependientes<'e, E>(
    executor: E,
    tabla: &str,
    columna: &str,
    id: i64,
) -> AppResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE {} = ?1 AND activo = 1",
        tabla, columna
    );
    let n: i64 = sqlx::query_scalar(&sql).bind(id).fetch_one(executor).await?;
    Ok(n)
}

/// Ventas vigentes (no borradas ni anuladas) que referencian `id` por `columna`.
pub async fn contar_ventas_vigentes<'e, E>(executor: E, columna: &str, id: i64) -> AppResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT COUNT(*) FROM ventas WHERE {} = ?1 AND deleted_at IS NULL AND estado <> 'ANULADA'",
        columna
    );
    let n: i64 = sqlx::query_scalar(&sql).bind(id).fetch_one(executor).await?;
    Ok(n)
}

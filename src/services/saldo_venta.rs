//! services/saldo_venta.rs
//! Reglas de conciliación entre una venta y sus abonos.

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqliteConnection};

use crate::errors::{AppError, AppResult};
use crate::models::venta_model::{EstadoVenta, VentaRecord};

/// Tolerancia para comparar montos en coma flotante.
pub const TOLERANCIA_MONTO: f64 = 0.001;

pub const COLUMNAS_VENTA: &str = "id, cliente_id, lote_id, moneda_id, usuario_id, monto_total, \
                                  fecha_venta, estado, observaciones, created_at, updated_at";

/// Valida un abono contra el saldo pendiente. `abonado_otros` es la suma de los
/// demás abonos vigentes de la venta (sin el abono que se valida).
pub fn validar_monto_abono(monto: f64, monto_total: f64, abonado_otros: f64) -> AppResult<()> {
    if !monto.is_finite() || monto <= 0.0 {
        return Err(AppError::bad_request("El monto abonado debe ser mayor a 0"));
    }

    let saldo = monto_total - abonado_otros;
    if monto > saldo + TOLERANCIA_MONTO {
        return Err(AppError::bad_request(format!(
            "El monto abonado ({:.2}) excede el saldo pendiente ({:.2})",
            monto,
            saldo.max(0.0)
        )));
    }
    Ok(())
}

/// Estado que corresponde a la venta según lo abonado. Una venta anulada no cambia.
pub fn estado_por_saldo(actual: EstadoVenta, monto_total: f64, total_abonado: f64) -> EstadoVenta {
    if actual == EstadoVenta::Anulada {
        return actual;
    }
    if monto_total - total_abonado <= TOLERANCIA_MONTO {
        EstadoVenta::Pagada
    } else {
        EstadoVenta::EnProceso
    }
}

/// Suma de abonos vigentes de la venta, opcionalmente excluyendo uno.
pub async fn total_abonado<'e, E>(executor: E, venta_id: i64, excluir_abono: Option<i64>) -> AppResult<f64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let total: f64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(monto_abonado), 0.0)
        FROM abonos
        WHERE venta_id = ?1 AND deleted_at IS NULL AND id <> ?2
        "#,
    )
    .bind(venta_id)
    .bind(excluir_abono.unwrap_or(-1))
    .fetch_one(executor)
    .await?;
    Ok(total)
}

/// Marca la venta como modificada y la devuelve. Al ser la primera escritura de la
/// transacción, toma el lock de escritura antes de leer saldos.
pub async fn bloquear_venta(conn: &mut SqliteConnection, venta_id: i64) -> AppResult<VentaRecord> {
    let afectadas = sqlx::query("UPDATE ventas SET updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL")
        .bind(Utc::now())
        .bind(venta_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    if afectadas == 0 {
        return Err(AppError::not_found(format!(
            "Venta con id {} no encontrada",
            venta_id
        )));
    }

    let sql = format!("SELECT {} FROM ventas WHERE id = ?1", COLUMNAS_VENTA);
    let venta = sqlx::query_as::<_, VentaRecord>(&sql)
        .bind(venta_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(venta)
}

/// Recalcula y persiste el estado de la venta según sus abonos vigentes.
pub async fn recalcular_estado(conn: &mut SqliteConnection, venta: &VentaRecord) -> AppResult<EstadoVenta> {
    let abonado = total_abonado(&mut *conn, venta.id, None).await?;
    let nuevo = estado_por_saldo(venta.estado, venta.monto_total, abonado);

    if nuevo != venta.estado {
        sqlx::query("UPDATE ventas SET estado = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(nuevo.as_str())
            .bind(Utc::now())
            .bind(venta.id)
            .execute(&mut *conn)
            .await?;
        log::info!(
            "Venta {} cambia de estado {} -> {} (abonado={:.2}, total={:.2})",
            venta.id,
            venta.estado.as_str(),
            nuevo.as_str(),
            abonado,
            venta.monto_total
        );
    }
    Ok(nuevo)
}

//! services/abono_service.rs
//! Abonos (pagos parciales) contra el saldo de una venta.

use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::errors::{AppError, AppResult};
use crate::models::abono_model::{AbonoRecord, CreateAbonoRequest, UpdateAbonoRequest};
use crate::models::common_model::{texto_opcional, Pagina, PaginationQuery};
use crate::models::venta_model::EstadoVenta;
use crate::services::saldo_venta;

const COLUMNAS: &str = "id, venta_id, monto_abonado, fecha_abono, metodo_pago, numero_operacion, \
                        observacion, usuario_id, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct AbonoService {
    db_pool: Pool<Sqlite>,
}

impl AbonoService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        AbonoService { db_pool }
    }

    pub async fn list_por_venta(
        &self,
        venta_id: i64,
        query: &PaginationQuery,
    ) -> AppResult<Pagina<AbonoRecord>> {
        let existe: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM ventas WHERE id = ?1 AND deleted_at IS NULL")
                .bind(venta_id)
                .fetch_one(&self.db_pool)
                .await?;
        if existe == 0 {
            return Err(AppError::not_found(format!(
                "Venta con id {} no encontrada",
                venta_id
            )));
        }

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM abonos WHERE venta_id = ?1 AND deleted_at IS NULL",
        )
        .bind(venta_id)
        .fetch_one(&self.db_pool)
        .await?;

        let sql = format!(
            r#"
            SELECT {}
            FROM abonos
            WHERE venta_id = ?1 AND deleted_at IS NULL
            ORDER BY fecha_abono DESC, id DESC
            LIMIT ?2 OFFSET ?3
            "#,
            COLUMNAS
        );
        let rows = sqlx::query_as::<_, AbonoRecord>(&sql)
            .bind(venta_id)
            .bind(query.limit())
            .bind(query.offset())
            .fetch_all(&self.db_pool)
            .await?;

        Ok(Pagina::new(query, total, rows))
    }

    pub async fn get(&self, id: i64) -> AppResult<AbonoRecord> {
        let sql = format!(
            "SELECT {} FROM abonos WHERE id = ?1 AND deleted_at IS NULL",
            COLUMNAS
        );
        sqlx::query_as::<_, AbonoRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Abono con id {} no encontrado", id)))
    }

    /// Registra un abono si cabe en el saldo pendiente (con tolerancia) y
    /// actualiza el estado de la venta.
    pub async fn create(&self, req: CreateAbonoRequest, usuario_id: i64) -> AppResult<AbonoRecord> {
        let mut tx = self.db_pool.begin().await?;

        let venta = saldo_venta::bloquear_venta(&mut tx, req.venta_id).await?;
        if venta.estado == EstadoVenta::Anulada {
            return Err(AppError::conflict("No se pueden registrar abonos en una venta anulada"));
        }

        let abonado = saldo_venta::total_abonado(&mut *tx, venta.id, None).await?;
        saldo_venta::validar_monto_abono(req.monto_abonado, venta.monto_total, abonado)?;

        let ahora = Utc::now();
        let fecha_abono = req.fecha_abono.unwrap_or_else(|| ahora.date_naive());
        let id = sqlx::query(
            r#"
            INSERT INTO abonos (
                venta_id, monto_abonado, fecha_abono, metodo_pago, numero_operacion,
                observacion, usuario_id, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            "#,
        )
        .bind(venta.id)
        .bind(req.monto_abonado)
        .bind(fecha_abono)
        .bind(texto_opcional(req.metodo_pago))
        .bind(texto_opcional(req.numero_operacion))
        .bind(texto_opcional(req.observacion))
        .bind(usuario_id)
        .bind(ahora)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        saldo_venta::recalcular_estado(&mut tx, &venta).await?;
        tx.commit().await?;

        log::info!(
            "Abono registrado: id={}, venta={}, monto={:.2}, saldo_previo={:.2}",
            id,
            venta.id,
            req.monto_abonado,
            venta.monto_total - abonado
        );
        self.get(id).await
    }

    /// Edita un abono; el saldo se calcula sin contar el propio abono.
    pub async fn update(&self, id: i64, req: UpdateAbonoRequest) -> AppResult<AbonoRecord> {
        let actual = self.get(id).await?;

        let mut tx = self.db_pool.begin().await?;
        let venta = saldo_venta::bloquear_venta(&mut tx, actual.venta_id).await?;
        if venta.estado == EstadoVenta::Anulada {
            return Err(AppError::conflict("No se pueden modificar abonos de una venta anulada"));
        }

        let abonado_otros = saldo_venta::total_abonado(&mut *tx, venta.id, Some(id)).await?;
        saldo_venta::validar_monto_abono(req.monto_abonado, venta.monto_total, abonado_otros)?;

        let afectadas = sqlx::query(
            r#"
            UPDATE abonos
            SET monto_abonado = ?1,
                fecha_abono = ?2,
                metodo_pago = ?3,
                numero_operacion = ?4,
                observacion = ?5,
                updated_at = ?6
            WHERE id = ?7 AND deleted_at IS NULL
            "#,
        )
        .bind(req.monto_abonado)
        .bind(req.fecha_abono)
        .bind(texto_opcional(req.metodo_pago))
        .bind(texto_opcional(req.numero_operacion))
        .bind(texto_opcional(req.observacion))
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if afectadas == 0 {
            return Err(AppError::not_found(format!("Abono con id {} no encontrado", id)));
        }

        saldo_venta::recalcular_estado(&mut tx, &venta).await?;
        tx.commit().await?;

        log::info!(
            "Abono {} actualizado: {:.2} -> {:.2}",
            id,
            actual.monto_abonado,
            req.monto_abonado
        );
        self.get(id).await
    }

    /// Baja lógica del abono; la venta vuelve a EN_PROCESO si reaparece saldo.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let actual = self.get(id).await?;

        let mut tx = self.db_pool.begin().await?;
        let venta = saldo_venta::bloquear_venta(&mut tx, actual.venta_id).await?;

        let ahora = Utc::now();
        sqlx::query("UPDATE abonos SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2")
            .bind(ahora)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        saldo_venta::recalcular_estado(&mut tx, &venta).await?;
        tx.commit().await?;

        log::warn!(
            "Abono {} eliminado (venta={}, monto={:.2})",
            id,
            venta.id,
            actual.monto_abonado
        );
        Ok(())
    }
}

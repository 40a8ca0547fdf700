//! services/venta_service.rs
//! Registro de ventas de lotes y su ciclo de vida (EN_PROCESO → PAGADA / ANULADA).

use chrono::Utc;
use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::errors::{AppError, AppResult};
use crate::models::abono_model::AbonoRecord;
use crate::models::common_model::{texto_opcional, Pagina, PaginationQuery};
use crate::models::lote_model::EstadoLote;
use crate::models::venta_model::{
    CreateVentaRequest, EstadoCuentaResponse, EstadoVenta, UpdateVentaRequest, VentaFiltro,
    VentaRecord,
};
use crate::services::saldo_venta::{self, COLUMNAS_VENTA, TOLERANCIA_MONTO};
use crate::services::validaciones;

#[derive(Clone, Debug)]
pub struct VentaService {
    db_pool: Pool<Sqlite>,
}

impl VentaService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        VentaService { db_pool }
    }

    pub async fn list(
        &self,
        filtro: &VentaFiltro,
        query: &PaginationQuery,
    ) -> AppResult<Pagina<VentaRecord>> {
        let patron = query.patron_busqueda();

        let mut count = QueryBuilder::<Sqlite>::new(
            "SELECT COUNT(*) FROM ventas v JOIN clientes c ON c.id = v.cliente_id WHERE v.deleted_at IS NULL",
        );
        push_filtros(&mut count, filtro, &patron);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.db_pool)
            .await?;

        let mut items = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT v.id, v.cliente_id, v.lote_id, v.moneda_id, v.usuario_id, v.monto_total,
                   v.fecha_venta, v.estado, v.observaciones, v.created_at, v.updated_at
            FROM ventas v
            JOIN clientes c ON c.id = v.cliente_id
            WHERE v.deleted_at IS NULL
            "#,
        );
        push_filtros(&mut items, filtro, &patron);
        items
            .push(" ORDER BY v.fecha_venta DESC, v.id DESC LIMIT ")
            .push_bind(query.limit())
            .push(" OFFSET ")
            .push_bind(query.offset());
        let rows = items
            .build_query_as::<VentaRecord>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(Pagina::new(query, total, rows))
    }

    pub async fn get(&self, id: i64) -> AppResult<VentaRecord> {
        let sql = format!(
            "SELECT {} FROM ventas WHERE id = ?1 AND deleted_at IS NULL",
            COLUMNAS_VENTA
        );
        sqlx::query_as::<_, VentaRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Venta con id {} no encontrada", id)))
    }

    /// Registra la venta y marca el lote como VENDIDO en la misma transacción.
    pub async fn create(&self, req: CreateVentaRequest, usuario_id: i64) -> AppResult<VentaRecord> {
        validar_monto_total(req.monto_total)?;

        let mut tx = self.db_pool.begin().await?;

        // Reservar el lote primero: es la escritura que toma el lock.
        let ahora = Utc::now();
        let reservado = sqlx::query(
            "UPDATE lotes SET estado = ?1, updated_at = ?2 WHERE id = ?3 AND activo = 1 AND estado = ?4",
        )
        .bind(EstadoLote::Vendido.as_str())
        .bind(ahora)
        .bind(req.lote_id)
        .bind(EstadoLote::Disponible.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if reservado == 0 {
            validaciones::requerir_activo(&mut *tx, "lotes", req.lote_id, "Lote").await?;
            return Err(AppError::conflict(format!(
                "El lote {} no está disponible para la venta",
                req.lote_id
            )));
        }

        validaciones::requerir_activo(&mut *tx, "clientes", req.cliente_id, "Cliente").await?;
        validaciones::requerir_activo(&mut *tx, "monedas", req.moneda_id, "Moneda").await?;

        let fecha_venta = req.fecha_venta.unwrap_or_else(|| ahora.date_naive());
        let id = sqlx::query(
            r#"
            INSERT INTO ventas (
                cliente_id, lote_id, moneda_id, usuario_id, monto_total,
                fecha_venta, estado, observaciones, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            "#,
        )
        .bind(req.cliente_id)
        .bind(req.lote_id)
        .bind(req.moneda_id)
        .bind(usuario_id)
        .bind(req.monto_total)
        .bind(fecha_venta)
        .bind(EstadoVenta::EnProceso.as_str())
        .bind(texto_opcional(req.observaciones))
        .bind(ahora)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        log::info!(
            "Venta creada: id={}, cliente={}, lote={}, total={:.2}, vendedor={}",
            id,
            req.cliente_id,
            req.lote_id,
            req.monto_total,
            usuario_id
        );
        self.get(id).await
    }

    pub async fn update(&self, id: i64, req: UpdateVentaRequest) -> AppResult<VentaRecord> {
        validar_monto_total(req.monto_total)?;

        let mut tx = self.db_pool.begin().await?;
        let venta = saldo_venta::bloquear_venta(&mut tx, id).await?;
        if venta.estado == EstadoVenta::Anulada {
            return Err(AppError::conflict("No se puede modificar una venta anulada"));
        }

        validaciones::requerir_activo(&mut *tx, "monedas", req.moneda_id, "Moneda").await?;

        let abonado = saldo_venta::total_abonado(&mut *tx, id, None).await?;
        if req.monto_total + TOLERANCIA_MONTO < abonado {
            return Err(AppError::bad_request(format!(
                "El monto total ({:.2}) no puede ser menor a lo ya abonado ({:.2})",
                req.monto_total, abonado
            )));
        }
        let estado = saldo_venta::estado_por_saldo(venta.estado, req.monto_total, abonado);

        sqlx::query(
            r#"
            UPDATE ventas
            SET moneda_id = ?1,
                monto_total = ?2,
                fecha_venta = ?3,
                observaciones = ?4,
                estado = ?5,
                updated_at = ?6
            WHERE id = ?7
            "#,
        )
        .bind(req.moneda_id)
        .bind(req.monto_total)
        .bind(req.fecha_venta)
        .bind(texto_opcional(req.observaciones))
        .bind(estado.as_str())
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        self.get(id).await
    }

    /// Anula la venta y libera el lote.
    pub async fn anular(&self, id: i64) -> AppResult<VentaRecord> {
        let mut tx = self.db_pool.begin().await?;
        let venta = saldo_venta::bloquear_venta(&mut tx, id).await?;
        if venta.estado == EstadoVenta::Anulada {
            return Err(AppError::conflict("La venta ya está anulada"));
        }

        let ahora = Utc::now();
        sqlx::query("UPDATE ventas SET estado = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(EstadoVenta::Anulada.as_str())
            .bind(ahora)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        liberar_lote(&mut tx, venta.lote_id).await?;

        tx.commit().await?;
        log::warn!("Venta {} anulada; lote {} liberado", id, venta.lote_id);
        self.get(id).await
    }

    /// Baja lógica de la venta y de sus abonos.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tx = self.db_pool.begin().await?;
        let venta = saldo_venta::bloquear_venta(&mut tx, id).await?;

        let ahora = Utc::now();
        sqlx::query("UPDATE ventas SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2")
            .bind(ahora)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let abonos = sqlx::query(
            "UPDATE abonos SET deleted_at = ?1, updated_at = ?1 WHERE venta_id = ?2 AND deleted_at IS NULL",
        )
        .bind(ahora)
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        // Una venta anulada ya había liberado su lote
        if venta.estado != EstadoVenta::Anulada {
            liberar_lote(&mut tx, venta.lote_id).await?;
        }

        tx.commit().await?;
        log::warn!("Venta {} eliminada junto con {} abono(s)", id, abonos);
        Ok(())
    }

    pub async fn estado_cuenta(&self, id: i64) -> AppResult<EstadoCuentaResponse> {
        let venta = self.get(id).await?;

        let abonos = sqlx::query_as::<_, AbonoRecord>(
            r#"
            SELECT id, venta_id, monto_abonado, fecha_abono, metodo_pago, numero_operacion,
                   observacion, usuario_id, created_at, updated_at
            FROM abonos
            WHERE venta_id = ?1 AND deleted_at IS NULL
            ORDER BY fecha_abono ASC, id ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.db_pool)
        .await?;

        let total_abonado: f64 = abonos.iter().map(|a| a.monto_abonado).sum();
        let saldo = (venta.monto_total - total_abonado).max(0.0);

        Ok(EstadoCuentaResponse {
            venta,
            abonos,
            total_abonado,
            saldo,
        })
    }
}

fn validar_monto_total(monto_total: f64) -> AppResult<()> {
    if !monto_total.is_finite() || monto_total <= 0.0 {
        return Err(AppError::bad_request("El monto total debe ser mayor a 0"));
    }
    Ok(())
}

async fn liberar_lote(conn: &mut sqlx::SqliteConnection, lote_id: i64) -> AppResult<()> {
    sqlx::query("UPDATE lotes SET estado = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(EstadoLote::Disponible.as_str())
        .bind(Utc::now())
        .bind(lote_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

fn push_filtros(qb: &mut QueryBuilder<'_, Sqlite>, filtro: &VentaFiltro, patron: &Option<String>) {
    if let Some(cliente_id) = filtro.cliente_id {
        qb.push(" AND v.cliente_id = ").push_bind(cliente_id);
    }
    if let Some(lote_id) = filtro.lote_id {
        qb.push(" AND v.lote_id = ").push_bind(lote_id);
    }
    if let Some(estado) = filtro.estado {
        qb.push(" AND v.estado = ").push_bind(estado.as_str());
    }
    if let Some(p) = patron {
        qb.push(" AND c.busqueda LIKE ").push_bind(p.clone());
    }
}

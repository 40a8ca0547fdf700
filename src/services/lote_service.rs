//! services/lote_service.rs

use chrono::Utc;
use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::errors::{AppError, AppResult};
use crate::models::common_model::{texto_requerido, Pagina, PaginationQuery};
use crate::models::lote_model::{EstadoLote, LoteFiltro, LoteRecord, LoteRequest};
use crate::services::validaciones;

const COLUMNAS: &str = "id, proyecto_id, tipo_lote_id, manzana, numero, area, precio, estado, \
                        activo, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct LoteService {
    db_pool: Pool<Sqlite>,
}

impl LoteService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        LoteService { db_pool }
    }

    pub async fn list(
        &self,
        filtro: &LoteFiltro,
        query: &PaginationQuery,
    ) -> AppResult<Pagina<LoteRecord>> {
        let patron = query.patron_busqueda();

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM lotes WHERE activo = 1");
        push_filtros(&mut count, filtro, &patron);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.db_pool)
            .await?;

        let mut items =
            QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM lotes WHERE activo = 1", COLUMNAS));
        push_filtros(&mut items, filtro, &patron);
        items
            .push(" ORDER BY proyecto_id ASC, manzana ASC, numero ASC LIMIT ")
            .push_bind(query.limit())
            .push(" OFFSET ")
            .push_bind(query.offset());
        let rows = items
            .build_query_as::<LoteRecord>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(Pagina::new(query, total, rows))
    }

    pub async fn get(&self, id: i64) -> AppResult<LoteRecord> {
        let sql = format!("SELECT {} FROM lotes WHERE id = ?1 AND activo = 1", COLUMNAS);
        sqlx::query_as::<_, LoteRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Lote con id {} no encontrado", id)))
    }

    pub async fn create(&self, req: LoteRequest) -> AppResult<LoteRecord> {
        let estado = match req.estado {
            Some(EstadoLote::Vendido) => return Err(estado_vendido_manual()),
            Some(estado) => estado,
            None => EstadoLote::Disponible,
        };
        let datos = self.validar(req, None).await?;

        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO lotes (
                proyecto_id, tipo_lote_id, manzana, numero, area, precio, estado,
                activo, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?8)
            "#,
        )
        .bind(datos.proyecto_id)
        .bind(datos.tipo_lote_id)
        .bind(&datos.manzana)
        .bind(&datos.numero)
        .bind(datos.area)
        .bind(datos.precio)
        .bind(estado.as_str())
        .bind(now)
        .execute(&self.db_pool)
        .await?
        .last_insert_rowid();

        log::info!(
            "Lote creado: id={}, proyecto={}, Mz {} Lt {}",
            id,
            datos.proyecto_id,
            datos.manzana,
            datos.numero
        );
        self.get(id).await
    }

    pub async fn update(&self, id: i64, req: LoteRequest) -> AppResult<LoteRecord> {
        let actual = self.get(id).await?;
        let venta_vigente =
            validaciones::contar_ventas_vigentes(&self.db_pool, "lote_id", id).await? > 0;

        let estado = match (req.estado, venta_vigente) {
            (Some(nuevo), _) if nuevo == actual.estado => nuevo,
            (Some(EstadoLote::Vendido), _) => return Err(estado_vendido_manual()),
            (Some(_), true) => {
                return Err(AppError::conflict(
                    "El lote tiene una venta vigente; su estado lo gobierna la venta",
                ))
            }
            (Some(nuevo), false) => nuevo,
            (None, _) => actual.estado,
        };
        let datos = self.validar(req, Some(id)).await?;

        sqlx::query(
            r#"
            UPDATE lotes
            SET proyecto_id = ?1,
                tipo_lote_id = ?2,
                manzana = ?3,
                numero = ?4,
                area = ?5,
                precio = ?6,
                estado = ?7,
                updated_at = ?8
            WHERE id = ?9
            "#,
        )
        .bind(datos.proyecto_id)
        .bind(datos.tipo_lote_id)
        .bind(&datos.manzana)
        .bind(&datos.numero)
        .bind(datos.area)
        .bind(datos.precio)
        .bind(estado.as_str())
        .bind(Utc::now())
        .bind(id)
        .execute(&self.db_pool)
        .await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.get(id).await?;

        if validaciones::contar_ventas_vigentes(&self.db_pool, "lote_id", id).await? > 0 {
            return Err(AppError::conflict("El lote tiene una venta vigente"));
        }

        sqlx::query("UPDATE lotes SET activo = 0, updated_at = ?1 WHERE id = ?2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        log::info!("Lote dado de baja: id={}", id);
        Ok(())
    }

    async fn validar(&self, req: LoteRequest, excluir_id: Option<i64>) -> AppResult<LoteRequest> {
        let manzana = texto_requerido(&req.manzana, "manzana")?.to_uppercase();
        let numero = texto_requerido(&req.numero, "numero")?.to_uppercase();

        if !req.area.is_finite() || req.area <= 0.0 {
            return Err(AppError::bad_request("El área debe ser mayor a 0"));
        }
        if !req.precio.is_finite() || req.precio < 0.0 {
            return Err(AppError::bad_request("El precio no puede ser negativo"));
        }

        validaciones::requerir_activo(&self.db_pool, "proyectos", req.proyecto_id, "Proyecto").await?;
        if let Some(tipo_lote_id) = req.tipo_lote_id {
            validaciones::requerir_activo(&self.db_pool, "tipos_lote", tipo_lote_id, "Tipo de lote")
                .await?;
        }

        let repetidos: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM lotes
            WHERE activo = 1 AND proyecto_id = ?1 AND manzana = ?2 AND numero = ?3 AND id <> ?4
            "#,
        )
        .bind(req.proyecto_id)
        .bind(&manzana)
        .bind(&numero)
        .bind(excluir_id.unwrap_or(-1))
        .fetch_one(&self.db_pool)
        .await?;
        if repetidos > 0 {
            return Err(AppError::conflict(format!(
                "Ya existe el lote Mz {} Lt {} en el proyecto",
                manzana, numero
            )));
        }

        Ok(LoteRequest {
            manzana,
            numero,
            ..req
        })
    }
}

fn estado_vendido_manual() -> AppError {
    AppError::bad_request("El estado VENDIDO solo se asigna registrando una venta")
}

fn push_filtros(qb: &mut QueryBuilder<'_, Sqlite>, filtro: &LoteFiltro, patron: &Option<String>) {
    if let Some(proyecto_id) = filtro.proyecto_id {
        qb.push(" AND proyecto_id = ").push_bind(proyecto_id);
    }
    if let Some(estado) = filtro.estado {
        qb.push(" AND estado = ").push_bind(estado.as_str());
    }
    // manzana y numero se guardan en mayúsculas
    if let Some(p) = patron.as_deref().map(str::to_uppercase) {
        qb.push(" AND (manzana LIKE ")
            .push_bind(p.clone())
            .push(" OR numero LIKE ")
            .push_bind(p)
            .push(")");
    }
}

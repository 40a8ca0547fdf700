//! services/moneda_service.rs

use chrono::Utc;
use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::errors::{AppError, AppResult};
use crate::models::common_model::{texto_busqueda, texto_requerido, Pagina, PaginationQuery};
use crate::models::moneda_model::{MonedaRecord, MonedaRequest};
use crate::services::validaciones;

#[derive(Clone, Debug)]
pub struct MonedaService {
    db_pool: Pool<Sqlite>,
}

impl MonedaService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        MonedaService { db_pool }
    }

    pub async fn list(&self, query: &PaginationQuery) -> AppResult<Pagina<MonedaRecord>> {
        let patron = query.patron_busqueda();

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM monedas WHERE activo = 1");
        push_busqueda(&mut count, &patron);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.db_pool)
            .await?;

        let mut items = QueryBuilder::<Sqlite>::new(
            "SELECT id, codigo, nombre, simbolo, activo, created_at, updated_at FROM monedas WHERE activo = 1",
        );
        push_busqueda(&mut items, &patron);
        items
            .push(" ORDER BY codigo ASC LIMIT ")
            .push_bind(query.limit())
            .push(" OFFSET ")
            .push_bind(query.offset());
        let rows = items
            .build_query_as::<MonedaRecord>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(Pagina::new(query, total, rows))
    }

    pub async fn get(&self, id: i64) -> AppResult<MonedaRecord> {
        sqlx::query_as::<_, MonedaRecord>(
            r#"
            SELECT id, codigo, nombre, simbolo, activo, created_at, updated_at
            FROM monedas
            WHERE id = ?1 AND activo = 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Moneda con id {} no encontrada", id)))
    }

    pub async fn create(&self, req: MonedaRequest) -> AppResult<MonedaRecord> {
        let datos = validar(req)?;
        self.verificar_codigo_unico(&datos.codigo, None).await?;

        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO monedas (codigo, nombre, simbolo, busqueda, activo, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)
            "#,
        )
        .bind(&datos.codigo)
        .bind(&datos.nombre)
        .bind(&datos.simbolo)
        .bind(busqueda(&datos))
        .bind(now)
        .execute(&self.db_pool)
        .await?
        .last_insert_rowid();

        log::info!("Moneda creada: id={}, codigo={}", id, datos.codigo);
        self.get(id).await
    }

    pub async fn update(&self, id: i64, req: MonedaRequest) -> AppResult<MonedaRecord> {
        self.get(id).await?;
        let datos = validar(req)?;
        self.verificar_codigo_unico(&datos.codigo, Some(id)).await?;

        sqlx::query(
            r#"
            UPDATE monedas
            SET codigo = ?1, nombre = ?2, simbolo = ?3, busqueda = ?4, updated_at = ?5
            WHERE id = ?6
            "#,
        )
        .bind(&datos.codigo)
        .bind(&datos.nombre)
        .bind(&datos.simbolo)
        .bind(busqueda(&datos))
        .bind(Utc::now())
        .bind(id)
        .execute(&self.db_pool)
        .await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.get(id).await?;

        let ventas = validaciones::contar_ventas_vigentes(&self.db_pool, "moneda_id", id).await?;
        if ventas > 0 {
            return Err(AppError::conflict(format!(
                "La moneda está en uso por {} venta(s) vigentes",
                ventas
            )));
        }

        sqlx::query("UPDATE monedas SET activo = 0, updated_at = ?1 WHERE id = ?2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        log::info!("Moneda dada de baja: id={}", id);
        Ok(())
    }

    async fn verificar_codigo_unico(&self, codigo: &str, excluir_id: Option<i64>) -> AppResult<()> {
        let n: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM monedas WHERE activo = 1 AND codigo = ?1 AND id <> ?2",
        )
        .bind(codigo)
        .bind(excluir_id.unwrap_or(-1))
        .fetch_one(&self.db_pool)
        .await?;

        if n > 0 {
            return Err(AppError::conflict(format!(
                "Ya existe una moneda con código {}",
                codigo
            )));
        }
        Ok(())
    }
}

/// Código ISO de tres letras, siempre en mayúsculas.
pub fn normalizar_codigo(codigo: &str) -> AppResult<String> {
    let codigo = codigo.trim().to_uppercase();
    if codigo.len() != 3 || !codigo.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::bad_request(
            "El código de moneda debe tener exactamente 3 letras",
        ));
    }
    Ok(codigo)
}

fn validar(req: MonedaRequest) -> AppResult<MonedaRequest> {
    Ok(MonedaRequest {
        codigo: normalizar_codigo(&req.codigo)?,
        nombre: texto_requerido(&req.nombre, "nombre")?,
        simbolo: texto_requerido(&req.simbolo, "simbolo")?,
    })
}

fn busqueda(datos: &MonedaRequest) -> String {
    texto_busqueda(&[Some(datos.codigo.as_str()), Some(datos.nombre.as_str())])
}

fn push_busqueda(qb: &mut QueryBuilder<'_, Sqlite>, patron: &Option<String>) {
    if let Some(p) = patron {
        qb.push(" AND busqueda LIKE ").push_bind(p.clone());
    }
}

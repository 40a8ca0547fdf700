//! services/catalogo_service.rs
//! CRUD de los catálogos simples (departamentos, tipos de documento, tipos de lote).

use chrono::Utc;
use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::errors::{AppError, AppResult};
use crate::models::catalogo_model::{CatalogoRecord, CatalogoRequest, TipoCatalogo};
use crate::models::common_model::{
    normalizar_nombre, texto_busqueda, texto_opcional, texto_requerido, Pagina, PaginationQuery,
};
use crate::services::validaciones;

#[derive(Clone, Debug)]
pub struct CatalogoService {
    db_pool: Pool<Sqlite>,
}

impl CatalogoService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        CatalogoService { db_pool }
    }

    pub async fn list(
        &self,
        tipo: TipoCatalogo,
        query: &PaginationQuery,
    ) -> AppResult<Pagina<CatalogoRecord>> {
        let patron = query.patron_busqueda();

        let mut count = QueryBuilder::<Sqlite>::new(format!(
            "SELECT COUNT(*) FROM {} WHERE activo = 1",
            tipo.tabla()
        ));
        push_busqueda(&mut count, &patron);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.db_pool)
            .await?;

        let mut items = QueryBuilder::<Sqlite>::new(format!(
            "SELECT id, nombre, descripcion, activo, created_at, updated_at FROM {} WHERE activo = 1",
            tipo.tabla()
        ));
        push_busqueda(&mut items, &patron);
        items
            .push(" ORDER BY nombre ASC LIMIT ")
            .push_bind(query.limit())
            .push(" OFFSET ")
            .push_bind(query.offset());

        let rows = items
            .build_query_as::<CatalogoRecord>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(Pagina::new(query, total, rows))
    }

    pub async fn get(&self, tipo: TipoCatalogo, id: i64) -> AppResult<CatalogoRecord> {
        let sql = format!(
            "SELECT id, nombre, descripcion, activo, created_at, updated_at FROM {} WHERE id = ?1 AND activo = 1",
            tipo.tabla()
        );
        sqlx::query_as::<_, CatalogoRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("{} con id {} no encontrado", tipo.etiqueta(), id)))
    }

    pub async fn create(&self, tipo: TipoCatalogo, req: CatalogoRequest) -> AppResult<CatalogoRecord> {
        let nombre = texto_requerido(&req.nombre, "nombre")?;
        let descripcion = texto_opcional(req.descripcion);
        let normalizado = normalizar_nombre(&nombre);
        self.verificar_nombre_unico(tipo, &nombre, &normalizado, None).await?;

        let now = Utc::now();
        let sql = format!(
            "INSERT INTO {} (nombre, nombre_normalizado, descripcion, busqueda, activo, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)",
            tipo.tabla()
        );
        let id = sqlx::query(&sql)
            .bind(&nombre)
            .bind(&normalizado)
            .bind(&descripcion)
            .bind(texto_busqueda(&[Some(nombre.as_str()), descripcion.as_deref()]))
            .bind(now)
            .execute(&self.db_pool)
            .await?
            .last_insert_rowid();

        log::info!("{} creado: id={}, nombre='{}'", tipo.etiqueta(), id, nombre);
        self.get(tipo, id).await
    }

    pub async fn update(
        &self,
        tipo: TipoCatalogo,
        id: i64,
        req: CatalogoRequest,
    ) -> AppResult<CatalogoRecord> {
        self.get(tipo, id).await?;
        let nombre = texto_requerido(&req.nombre, "nombre")?;
        let descripcion = texto_opcional(req.descripcion);
        let normalizado = normalizar_nombre(&nombre);
        self.verificar_nombre_unico(tipo, &nombre, &normalizado, Some(id)).await?;

        let sql = format!(
            "UPDATE {} SET nombre = ?1, nombre_normalizado = ?2, descripcion = ?3, busqueda = ?4, \
             updated_at = ?5 WHERE id = ?6",
            tipo.tabla()
        );
        sqlx::query(&sql)
            .bind(&nombre)
            .bind(&normalizado)
            .bind(&descripcion)
            .bind(texto_busqueda(&[Some(nombre.as_str()), descripcion.as_deref()]))
            .bind(Utc::now())
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        self.get(tipo, id).await
    }

    /// Baja lógica; no se permite mientras haya registros activos que dependan de él.
    pub async fn delete(&self, tipo: TipoCatalogo, id: i64) -> AppResult<()> {
        self.get(tipo, id).await?;

        let (tabla_dep, columna) = tipo.dependientes();
        let dependientes =
            validaciones::contar_dependientes(&self.db_pool, tabla_dep, columna, id).await?;
        if dependientes > 0 {
            return Err(AppError::conflict(format!(
                "{} en uso por {} registro(s) activos de {}",
                tipo.etiqueta(),
                dependientes,
                tabla_dep
            )));
        }

        let sql = format!(
            "UPDATE {} SET activo = 0, updated_at = ?1 WHERE id = ?2",
            tipo.tabla()
        );
        sqlx::query(&sql)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        log::info!("{} dado de baja: id={}", tipo.etiqueta(), id);
        Ok(())
    }

    async fn verificar_nombre_unico(
        &self,
        tipo: TipoCatalogo,
        nombre: &str,
        normalizado: &str,
        excluir_id: Option<i64>,
    ) -> AppResult<()> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE activo = 1 AND nombre_normalizado = ?1 AND id <> ?2",
            tipo.tabla()
        );
        let n: i64 = sqlx::query_scalar(&sql)
            .bind(normalizado)
            .bind(excluir_id.unwrap_or(-1))
            .fetch_one(&self.db_pool)
            .await?;

        if n > 0 {
            return Err(AppError::conflict(format!(
                "Ya existe un {} con el nombre '{}'",
                tipo.etiqueta().to_lowercase(),
                nombre
            )));
        }
        Ok(())
    }
}

fn push_busqueda(qb: &mut QueryBuilder<'_, Sqlite>, patron: &Option<String>) {
    if let Some(p) = patron {
        qb.push(" AND busqueda LIKE ").push_bind(p.clone());
    }
}

//! services/geografia_service.rs
//! Provincias y distritos; cada nivel cuelga de un padre activo.

use chrono::Utc;
use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::errors::{AppError, AppResult};
use crate::models::common_model::{normalizar_nombre, texto_requerido, Pagina, PaginationQuery};
use crate::models::geografia_model::{
    DistritoFiltro, DistritoRecord, DistritoRequest, ProvinciaFiltro, ProvinciaRecord,
    ProvinciaRequest,
};
use crate::services::validaciones;

#[derive(Clone, Debug)]
pub struct GeografiaService {
    db_pool: Pool<Sqlite>,
}

impl GeografiaService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        GeografiaService { db_pool }
    }

    // ======================================================
    // Provincias
    // ======================================================

    pub async fn list_provincias(
        &self,
        filtro: &ProvinciaFiltro,
        query: &PaginationQuery,
    ) -> AppResult<Pagina<ProvinciaRecord>> {
        let patron = query.patron_busqueda();

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM provincias WHERE activo = 1");
        push_filtros(&mut count, "departamento_id", filtro.departamento_id, &patron);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.db_pool)
            .await?;

        let mut items = QueryBuilder::<Sqlite>::new(
            "SELECT id, departamento_id, nombre, activo, created_at, updated_at FROM provincias WHERE activo = 1",
        );
        push_filtros(&mut items, "departamento_id", filtro.departamento_id, &patron);
        items
            .push(" ORDER BY nombre ASC LIMIT ")
            .push_bind(query.limit())
            .push(" OFFSET ")
            .push_bind(query.offset());
        let rows = items
            .build_query_as::<ProvinciaRecord>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(Pagina::new(query, total, rows))
    }

    pub async fn get_provincia(&self, id: i64) -> AppResult<ProvinciaRecord> {
        sqlx::query_as::<_, ProvinciaRecord>(
            r#"
            SELECT id, departamento_id, nombre, activo, created_at, updated_at
            FROM provincias
            WHERE id = ?1 AND activo = 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Provincia con id {} no encontrada", id)))
    }

    pub async fn create_provincia(&self, req: ProvinciaRequest) -> AppResult<ProvinciaRecord> {
        let nombre = texto_requerido(&req.nombre, "nombre")?;
        validaciones::requerir_activo(&self.db_pool, "departamentos", req.departamento_id, "Departamento")
            .await?;
        self.verificar_unico("provincias", "departamento_id", req.departamento_id, &nombre, None)
            .await?;

        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO provincias (departamento_id, nombre, nombre_normalizado, activo, created_at, updated_at)
            VALUES (?1, ?2, ?3, 1, ?4, ?4)
            "#,
        )
        .bind(req.departamento_id)
        .bind(&nombre)
        .bind(normalizar_nombre(&nombre))
        .bind(now)
        .execute(&self.db_pool)
        .await?
        .last_insert_rowid();

        log::info!("Provincia creada: id={}, nombre='{}'", id, nombre);
        self.get_provincia(id).await
    }

    pub async fn update_provincia(&self, id: i64, req: ProvinciaRequest) -> AppResult<ProvinciaRecord> {
        self.get_provincia(id).await?;
        let nombre = texto_requerido(&req.nombre, "nombre")?;
        validaciones::requerir_activo(&self.db_pool, "departamentos", req.departamento_id, "Departamento")
            .await?;
        self.verificar_unico("provincias", "departamento_id", req.departamento_id, &nombre, Some(id))
            .await?;

        sqlx::query(
            r#"
            UPDATE provincias
            SET departamento_id = ?1, nombre = ?2, nombre_normalizado = ?3, updated_at = ?4
            WHERE id = ?5
            "#,
        )
        .bind(req.departamento_id)
        .bind(&nombre)
        .bind(normalizar_nombre(&nombre))
        .bind(Utc::now())
        .bind(id)
        .execute(&self.db_pool)
        .await?;

        self.get_provincia(id).await
    }

    pub async fn delete_provincia(&self, id: i64) -> AppResult<()> {
        self.get_provincia(id).await?;

        let distritos =
            validaciones::contar_dependientes(&self.db_pool, "distritos", "provincia_id", id).await?;
        if distritos > 0 {
            return Err(AppError::conflict(format!(
                "La provincia tiene {} distrito(s) activos",
                distritos
            )));
        }

        sqlx::query("UPDATE provincias SET activo = 0, updated_at = ?1 WHERE id = ?2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        log::info!("Provincia dada de baja: id={}", id);
        Ok(())
    }

    // ======================================================
    // Distritos
    // ======================================================

    pub async fn list_distritos(
        &self,
        filtro: &DistritoFiltro,
        query: &PaginationQuery,
    ) -> AppResult<Pagina<DistritoRecord>> {
        let patron = query.patron_busqueda();

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM distritos WHERE activo = 1");
        push_filtros(&mut count, "provincia_id", filtro.provincia_id, &patron);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.db_pool)
            .await?;

        let mut items = QueryBuilder::<Sqlite>::new(
            "SELECT id, provincia_id, nombre, activo, created_at, updated_at FROM distritos WHERE activo = 1",
        );
        push_filtros(&mut items, "provincia_id", filtro.provincia_id, &patron);
        items
            .push(" ORDER BY nombre ASC LIMIT ")
            .push_bind(query.limit())
            .push(" OFFSET ")
            .push_bind(query.offset());
        let rows = items
            .build_query_as::<DistritoRecord>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(Pagina::new(query, total, rows))
    }

    pub async fn get_distrito(&self, id: i64) -> AppResult<DistritoRecord> {
        sqlx::query_as::<_, DistritoRecord>(
            r#"
            SELECT id, provincia_id, nombre, activo, created_at, updated_at
            FROM distritos
            WHERE id = ?1 AND activo = 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Distrito con id {} no encontrado", id)))
    }

    pub async fn create_distrito(&self, req: DistritoRequest) -> AppResult<DistritoRecord> {
        let nombre = texto_requerido(&req.nombre, "nombre")?;
        validaciones::requerir_activo(&self.db_pool, "provincias", req.provincia_id, "Provincia").await?;
        self.verificar_unico("distritos", "provincia_id", req.provincia_id, &nombre, None)
            .await?;

        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO distritos (provincia_id, nombre, nombre_normalizado, activo, created_at, updated_at)
            VALUES (?1, ?2, ?3, 1, ?4, ?4)
            "#,
        )
        .bind(req.provincia_id)
        .bind(&nombre)
        .bind(normalizar_nombre(&nombre))
        .bind(now)
        .execute(&self.db_pool)
        .await?
        .last_insert_rowid();

        log::info!("Distrito creado: id={}, nombre='{}'", id, nombre);
        self.get_distrito(id).await
    }

    pub async fn update_distrito(&self, id: i64, req: DistritoRequest) -> AppResult<DistritoRecord> {
        self.get_distrito(id).await?;
        let nombre = texto_requerido(&req.nombre, "nombre")?;
        validaciones::requerir_activo(&self.db_pool, "provincias", req.provincia_id, "Provincia").await?;
        self.verificar_unico("distritos", "provincia_id", req.provincia_id, &nombre, Some(id))
            .await?;

        sqlx::query(
            r#"
            UPDATE distritos
            SET provincia_id = ?1, nombre = ?2, nombre_normalizado = ?3, updated_at = ?4
            WHERE id = ?5
            "#,
        )
        .bind(req.provincia_id)
        .bind(&nombre)
        .bind(normalizar_nombre(&nombre))
        .bind(Utc::now())
        .bind(id)
        .execute(&self.db_pool)
        .await?;

        self.get_distrito(id).await
    }

    /// No se da de baja un distrito que aún usan clientes o proyectos activos.
    pub async fn delete_distrito(&self, id: i64) -> AppResult<()> {
        self.get_distrito(id).await?;

        let clientes =
            validaciones::contar_dependientes(&self.db_pool, "clientes", "distrito_id", id).await?;
        let proyectos =
            validaciones::contar_dependientes(&self.db_pool, "proyectos", "distrito_id", id).await?;
        if clientes + proyectos > 0 {
            return Err(AppError::conflict(format!(
                "El distrito está en uso por {} cliente(s) y {} proyecto(s)",
                clientes, proyectos
            )));
        }

        sqlx::query("UPDATE distritos SET activo = 0, updated_at = ?1 WHERE id = ?2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        log::info!("Distrito dado de baja: id={}", id);
        Ok(())
    }

    async fn verificar_unico(
        &self,
        tabla: &str,
        columna_padre: &str,
        padre_id: i64,
        nombre: &str,
        excluir_id: Option<i64>,
    ) -> AppResult<()> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE activo = 1 AND {} = ?1 AND nombre_normalizado = ?2 AND id <> ?3",
            tabla, columna_padre
        );
        let n: i64 = sqlx::query_scalar(&sql)
            .bind(padre_id)
            .bind(normalizar_nombre(nombre))
            .bind(excluir_id.unwrap_or(-1))
            .fetch_one(&self.db_pool)
            .await?;

        if n > 0 {
            return Err(AppError::conflict(format!(
                "Ya existe '{}' en el mismo nivel superior",
                nombre
            )));
        }
        Ok(())
    }
}

fn push_filtros(
    qb: &mut QueryBuilder<'_, Sqlite>,
    columna_padre: &str,
    padre_id: Option<i64>,
    patron: &Option<String>,
) {
    if let Some(id) = padre_id {
        qb.push(format!(" AND {} = ", columna_padre)).push_bind(id);
    }
    if let Some(p) = patron {
        qb.push(" AND nombre_normalizado LIKE ").push_bind(p.clone());
    }
}

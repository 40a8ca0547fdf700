//! services/proyecto_service.rs

use chrono::Utc;
use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::errors::{AppError, AppResult};
use crate::models::common_model::{
    normalizar_nombre, texto_busqueda, texto_opcional, texto_requerido, Pagina, PaginationQuery,
};
use crate::models::proyecto_model::{ProyectoRecord, ProyectoRequest};
use crate::services::validaciones;

const COLUMNAS: &str =
    "id, nombre, nombre_normalizado, descripcion, ubicacion, distrito_id, activo, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct ProyectoService {
    db_pool: Pool<Sqlite>,
}

impl ProyectoService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        ProyectoService { db_pool }
    }

    pub async fn list(&self, query: &PaginationQuery) -> AppResult<Pagina<ProyectoRecord>> {
        let patron = query.patron_busqueda();

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM proyectos WHERE activo = 1");
        push_busqueda(&mut count, &patron);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.db_pool)
            .await?;

        let mut items = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM proyectos WHERE activo = 1",
            COLUMNAS
        ));
        push_busqueda(&mut items, &patron);
        items
            .push(" ORDER BY nombre ASC LIMIT ")
            .push_bind(query.limit())
            .push(" OFFSET ")
            .push_bind(query.offset());
        let rows = items
            .build_query_as::<ProyectoRecord>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(Pagina::new(query, total, rows))
    }

    pub async fn get(&self, id: i64) -> AppResult<ProyectoRecord> {
        let sql = format!("SELECT {} FROM proyectos WHERE id = ?1 AND activo = 1", COLUMNAS);
        sqlx::query_as::<_, ProyectoRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Proyecto con id {} no encontrado", id)))
    }

    pub async fn create(&self, req: ProyectoRequest) -> AppResult<ProyectoRecord> {
        let nombre = limpiar_nombre(&req.nombre)?;
        let normalizado = normalizar_nombre(&nombre);
        self.verificar_nombre_unico(&normalizado, None).await?;
        if let Some(distrito_id) = req.distrito_id {
            validaciones::requerir_activo(&self.db_pool, "distritos", distrito_id, "Distrito").await?;
        }
        let ubicacion = texto_opcional(req.ubicacion);

        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO proyectos (
                nombre, nombre_normalizado, descripcion, ubicacion, distrito_id,
                busqueda, activo, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)
            "#,
        )
        .bind(&nombre)
        .bind(&normalizado)
        .bind(texto_opcional(req.descripcion))
        .bind(&ubicacion)
        .bind(req.distrito_id)
        .bind(texto_busqueda(&[Some(normalizado.as_str()), ubicacion.as_deref()]))
        .bind(now)
        .execute(&self.db_pool)
        .await?
        .last_insert_rowid();

        log::info!("Proyecto creado: id={}, nombre='{}'", id, nombre);
        self.get(id).await
    }

    pub async fn update(&self, id: i64, req: ProyectoRequest) -> AppResult<ProyectoRecord> {
        self.get(id).await?;
        let nombre = limpiar_nombre(&req.nombre)?;
        let normalizado = normalizar_nombre(&nombre);
        self.verificar_nombre_unico(&normalizado, Some(id)).await?;
        if let Some(distrito_id) = req.distrito_id {
            validaciones::requerir_activo(&self.db_pool, "distritos", distrito_id, "Distrito").await?;
        }
        let ubicacion = texto_opcional(req.ubicacion);

        sqlx::query(
            r#"
            UPDATE proyectos
            SET nombre = ?1,
                nombre_normalizado = ?2,
                descripcion = ?3,
                ubicacion = ?4,
                distrito_id = ?5,
                busqueda = ?6,
                updated_at = ?7
            WHERE id = ?8
            "#,
        )
        .bind(&nombre)
        .bind(&normalizado)
        .bind(texto_opcional(req.descripcion))
        .bind(&ubicacion)
        .bind(req.distrito_id)
        .bind(texto_busqueda(&[Some(normalizado.as_str()), ubicacion.as_deref()]))
        .bind(Utc::now())
        .bind(id)
        .execute(&self.db_pool)
        .await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.get(id).await?;

        let lotes = validaciones::contar_dependientes(&self.db_pool, "lotes", "proyecto_id", id).await?;
        if lotes > 0 {
            return Err(AppError::conflict(format!(
                "El proyecto tiene {} lote(s) activos",
                lotes
            )));
        }

        sqlx::query("UPDATE proyectos SET activo = 0, updated_at = ?1 WHERE id = ?2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        log::info!("Proyecto dado de baja: id={}", id);
        Ok(())
    }

    /// Compara contra los proyectos activos usando el nombre normalizado.
    async fn verificar_nombre_unico(&self, normalizado: &str, excluir_id: Option<i64>) -> AppResult<()> {
        let n: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM proyectos WHERE activo = 1 AND nombre_normalizado = ?1 AND id <> ?2",
        )
        .bind(normalizado)
        .bind(excluir_id.unwrap_or(-1))
        .fetch_one(&self.db_pool)
        .await?;

        if n > 0 {
            return Err(AppError::conflict("Ya existe un proyecto activo con ese nombre"));
        }
        Ok(())
    }
}

/// El nombre visible se guarda recortado y con espacios internos simples.
fn limpiar_nombre(nombre: &str) -> AppResult<String> {
    let nombre = texto_requerido(nombre, "nombre")?;
    Ok(nombre.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn push_busqueda(qb: &mut QueryBuilder<'_, Sqlite>, patron: &Option<String>) {
    if let Some(p) = patron {
        qb.push(" AND busqueda LIKE ").push_bind(p.clone());
    }
}

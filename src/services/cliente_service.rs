//! services/cliente_service.rs

use chrono::Utc;
use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::errors::{AppError, AppResult};
use crate::models::cliente_model::{ClienteRecord, ClienteRequest};
use crate::models::common_model::{
    texto_busqueda, texto_opcional, texto_requerido, Pagina, PaginationQuery,
};
use crate::services::validaciones;

const COLUMNAS: &str = "id, tipo_documento_id, numero_documento, nombres, apellidos, telefono, \
                        email, direccion, distrito_id, activo, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct ClienteService {
    db_pool: Pool<Sqlite>,
}

impl ClienteService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        ClienteService { db_pool }
    }

    pub async fn list(&self, query: &PaginationQuery) -> AppResult<Pagina<ClienteRecord>> {
        let patron = query.patron_busqueda();

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM clientes WHERE activo = 1");
        push_busqueda(&mut count, &patron);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.db_pool)
            .await?;

        let mut items = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM clientes WHERE activo = 1",
            COLUMNAS
        ));
        push_busqueda(&mut items, &patron);
        items
            .push(" ORDER BY nombres ASC, apellidos ASC LIMIT ")
            .push_bind(query.limit())
            .push(" OFFSET ")
            .push_bind(query.offset());
        let rows = items
            .build_query_as::<ClienteRecord>()
            .fetch_all(&self.db_pool)
            .await?;

        Ok(Pagina::new(query, total, rows))
    }

    pub async fn get(&self, id: i64) -> AppResult<ClienteRecord> {
        let sql = format!("SELECT {} FROM clientes WHERE id = ?1 AND activo = 1", COLUMNAS);
        sqlx::query_as::<_, ClienteRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Cliente con id {} no encontrado", id)))
    }

    pub async fn create(&self, req: ClienteRequest) -> AppResult<ClienteRecord> {
        let datos = self.validar(req, None).await?;

        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO clientes (
                tipo_documento_id, numero_documento, nombres, apellidos, telefono,
                email, direccion, distrito_id, busqueda, activo, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, ?10, ?10)
            "#,
        )
        .bind(datos.tipo_documento_id)
        .bind(&datos.numero_documento)
        .bind(&datos.nombres)
        .bind(&datos.apellidos)
        .bind(&datos.telefono)
        .bind(&datos.email)
        .bind(&datos.direccion)
        .bind(datos.distrito_id)
        .bind(busqueda(&datos))
        .bind(now)
        .execute(&self.db_pool)
        .await?
        .last_insert_rowid();

        log::info!(
            "Cliente creado: id={}, documento={}",
            id,
            datos.numero_documento
        );
        self.get(id).await
    }

    pub async fn update(&self, id: i64, req: ClienteRequest) -> AppResult<ClienteRecord> {
        self.get(id).await?;
        let datos = self.validar(req, Some(id)).await?;

        sqlx::query(
            r#"
            UPDATE clientes
            SET tipo_documento_id = ?1,
                numero_documento = ?2,
                nombres = ?3,
                apellidos = ?4,
                telefono = ?5,
                email = ?6,
                direccion = ?7,
                distrito_id = ?8,
                busqueda = ?9,
                updated_at = ?10
            WHERE id = ?11
            "#,
        )
        .bind(datos.tipo_documento_id)
        .bind(&datos.numero_documento)
        .bind(&datos.nombres)
        .bind(&datos.apellidos)
        .bind(&datos.telefono)
        .bind(&datos.email)
        .bind(&datos.direccion)
        .bind(datos.distrito_id)
        .bind(busqueda(&datos))
        .bind(Utc::now())
        .bind(id)
        .execute(&self.db_pool)
        .await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.get(id).await?;

        let ventas = validaciones::contar_ventas_vigentes(&self.db_pool, "cliente_id", id).await?;
        if ventas > 0 {
            return Err(AppError::conflict(format!(
                "El cliente tiene {} venta(s) vigentes",
                ventas
            )));
        }

        sqlx::query("UPDATE clientes SET activo = 0, updated_at = ?1 WHERE id = ?2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        log::info!("Cliente dado de baja: id={}", id);
        Ok(())
    }

    async fn validar(&self, req: ClienteRequest, excluir_id: Option<i64>) -> AppResult<ClienteRequest> {
        let numero_documento = texto_requerido(&req.numero_documento, "numero_documento")?;
        let nombres = texto_requerido(&req.nombres, "nombres")?;

        validaciones::requerir_activo(
            &self.db_pool,
            "tipos_documento",
            req.tipo_documento_id,
            "Tipo de documento",
        )
        .await?;
        if let Some(distrito_id) = req.distrito_id {
            validaciones::requerir_activo(&self.db_pool, "distritos", distrito_id, "Distrito").await?;
        }

        let email = texto_opcional(req.email);
        if let Some(e) = &email {
            if !e.contains('@') {
                return Err(AppError::bad_request("El email del cliente no es válido"));
            }
        }

        let repetidos: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM clientes
            WHERE activo = 1 AND tipo_documento_id = ?1 AND numero_documento = ?2 AND id <> ?3
            "#,
        )
        .bind(req.tipo_documento_id)
        .bind(&numero_documento)
        .bind(excluir_id.unwrap_or(-1))
        .fetch_one(&self.db_pool)
        .await?;
        if repetidos > 0 {
            return Err(AppError::conflict(format!(
                "Ya existe un cliente con el documento {}",
                numero_documento
            )));
        }

        Ok(ClienteRequest {
            tipo_documento_id: req.tipo_documento_id,
            numero_documento,
            nombres,
            apellidos: texto_opcional(req.apellidos),
            telefono: texto_opcional(req.telefono),
            email,
            direccion: texto_opcional(req.direccion),
            distrito_id: req.distrito_id,
        })
    }
}

/// Nombres, apellidos y documento; la búsqueda de ventas también la usa.
fn busqueda(datos: &ClienteRequest) -> String {
    texto_busqueda(&[
        Some(datos.nombres.as_str()),
        datos.apellidos.as_deref(),
        Some(datos.numero_documento.as_str()),
    ])
}

fn push_busqueda(qb: &mut QueryBuilder<'_, Sqlite>, patron: &Option<String>) {
    if let Some(p) = patron {
        qb.push(" AND busqueda LIKE ").push_bind(p.clone());
    }
}

//! services/usuario_service.rs
//! Gestión de usuarios y roles con las reglas de propiedad:
//! un solo PROPIETARIO, nadie se elimina a sí mismo y los administradores
//! no propietarios no tocan a otros administradores ni al propietario.

use std::collections::BTreeSet;

use chrono::Utc;
use sqlx::{Executor, Pool, QueryBuilder, Sqlite, SqliteConnection};

use crate::errors::{AppError, AppResult};
use crate::models::common_model::{texto_busqueda, texto_requerido, Pagina, PaginationQuery};
use crate::models::usuario_model::{
    CreateUsuarioRequest, Rol, UpdateUsuarioRequest, UsuarioRecord, UsuarioResponse,
};
use crate::services::auth_service::hash_password;

const COLUMNAS: &str =
    "id, username, email, nombre_completo, password_hash, activo, created_at, updated_at";

pub const PASSWORD_MIN_LEN: usize = 8;

#[derive(Clone, Debug)]
pub struct UsuarioService {
    db_pool: Pool<Sqlite>,
}

impl UsuarioService {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        UsuarioService { db_pool }
    }

    pub async fn list(&self, query: &PaginationQuery) -> AppResult<Pagina<UsuarioResponse>> {
        let patron = query.patron_busqueda();

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM usuarios WHERE activo = 1");
        push_busqueda(&mut count, &patron);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.db_pool)
            .await?;

        let mut items =
            QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM usuarios WHERE activo = 1", COLUMNAS));
        push_busqueda(&mut items, &patron);
        items
            .push(" ORDER BY username ASC LIMIT ")
            .push_bind(query.limit())
            .push(" OFFSET ")
            .push_bind(query.offset());
        let rows = items
            .build_query_as::<UsuarioRecord>()
            .fetch_all(&self.db_pool)
            .await?;

        let mut usuarios = Vec::with_capacity(rows.len());
        for record in rows {
            let roles = roles_de(&self.db_pool, record.id).await?;
            usuarios.push(UsuarioResponse::from_record(record, roles));
        }

        Ok(Pagina::new(query, total, usuarios))
    }

    /// Usuario activo con sus roles.
    pub async fn get(&self, id: i64) -> AppResult<UsuarioResponse> {
        let sql = format!("SELECT {} FROM usuarios WHERE id = ?1 AND activo = 1", COLUMNAS);
        let record = sqlx::query_as::<_, UsuarioRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Usuario con id {} no encontrado", id)))?;

        let roles = roles_de(&self.db_pool, id).await?;
        Ok(UsuarioResponse::from_record(record, roles))
    }

    /// Busca por username o email (sin distinguir mayúsculas), solo activos.
    /// El email ya se guarda en minúsculas.
    pub async fn find_para_login(&self, login: &str) -> AppResult<Option<UsuarioRecord>> {
        let sql = format!(
            "SELECT {} FROM usuarios WHERE activo = 1 AND (username_normalizado = ?1 OR email = ?1)",
            COLUMNAS
        );
        let record = sqlx::query_as::<_, UsuarioRecord>(&sql)
            .bind(login.trim().to_lowercase())
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(record)
    }

    pub async fn roles(&self, usuario_id: i64) -> AppResult<Vec<Rol>> {
        roles_de(&self.db_pool, usuario_id).await
    }

    /// Alta desde la administración.
    pub async fn create(
        &self,
        actor: &UsuarioResponse,
        req: CreateUsuarioRequest,
    ) -> AppResult<UsuarioResponse> {
        let roles = normalizar_roles(&req.roles)?;

        let mut tx = self.db_pool.begin().await?;
        let id = insertar_usuario(
            &mut tx,
            &req.username,
            &req.email,
            &req.nombre_completo,
            &req.password,
        )
        .await?;
        asignar_roles(&mut tx, id, &roles).await?;
        tx.commit().await?;

        log::info!(
            "Usuario creado por {}: id={}, username='{}', roles={:?}",
            actor.username,
            id,
            req.username.trim(),
            roles
        );
        self.get(id).await
    }

    /// Registro público: el primer usuario del sistema queda como PROPIETARIO,
    /// los demás como VENDEDOR.
    pub async fn registrar(
        &self,
        username: &str,
        email: &str,
        nombre_completo: &str,
        password: &str,
    ) -> AppResult<UsuarioResponse> {
        let mut tx = self.db_pool.begin().await?;

        // El INSERT va primero: toma el lock de escritura antes de contar, así dos
        // registros simultáneos no leen ambos "sin usuarios".
        let id = insertar_usuario(&mut tx, username, email, nombre_completo, password).await?;
        let otros: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM usuarios WHERE activo = 1 AND id <> ?1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        let rol = if otros == 0 {
            Rol::Propietario
        } else {
            Rol::Vendedor
        };
        asignar_roles(&mut tx, id, &[rol]).await?;
        tx.commit().await?;

        log::info!(
            "Usuario registrado: id={}, username='{}', rol={}",
            id,
            username.trim(),
            rol.as_str()
        );
        self.get(id).await
    }

    pub async fn update(
        &self,
        actor: &UsuarioResponse,
        id: i64,
        req: UpdateUsuarioRequest,
    ) -> AppResult<UsuarioResponse> {
        let objetivo = self.get(id).await?;
        verificar_modificacion(actor, &objetivo)?;
        if req.activo == Some(false) {
            verificar_eliminacion(actor, &objetivo)?;
        }

        let email = match &req.email {
            Some(e) => validar_email(e)?,
            None => objetivo.email.clone(),
        };
        let nombre_completo = match &req.nombre_completo {
            Some(n) => texto_requerido(n, "nombre_completo")?,
            None => objetivo.nombre_completo.clone(),
        };
        let repetidos: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM usuarios WHERE email = ?1 AND id <> ?2")
                .bind(&email)
                .bind(id)
                .fetch_one(&self.db_pool)
                .await?;
        if repetidos > 0 {
            return Err(AppError::conflict(format!("El email {} ya está registrado", email)));
        }

        let password_hash = match &req.password {
            Some(p) => {
                validar_password(p)?;
                Some(hash_password(p)?)
            }
            None => None,
        };

        sqlx::query(
            r#"
            UPDATE usuarios
            SET email = ?1,
                nombre_completo = ?2,
                activo = ?3,
                password_hash = COALESCE(?4, password_hash),
                busqueda = ?5,
                updated_at = ?6
            WHERE id = ?7
            "#,
        )
        .bind(&email)
        .bind(&nombre_completo)
        .bind(req.activo.unwrap_or(true))
        .bind(password_hash)
        .bind(busqueda(&objetivo.username, &email, &nombre_completo))
        .bind(Utc::now())
        .bind(id)
        .execute(&self.db_pool)
        .await?;

        if req.activo == Some(false) {
            log::warn!("Usuario {} desactivado por {}", id, actor.username);
            return Ok(UsuarioResponse {
                activo: false,
                email,
                nombre_completo,
                ..objetivo
            });
        }
        self.get(id).await
    }

    /// Reemplaza el conjunto de roles del usuario.
    pub async fn set_roles(
        &self,
        actor: &UsuarioResponse,
        id: i64,
        roles: &[Rol],
    ) -> AppResult<UsuarioResponse> {
        let objetivo = self.get(id).await?;
        verificar_modificacion(actor, &objetivo)?;
        let roles = normalizar_roles(roles)?;
        verificar_cambio_roles(actor, &objetivo, &roles)?;

        let mut tx = self.db_pool.begin().await?;
        sqlx::query("DELETE FROM usuario_roles WHERE usuario_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        asignar_roles(&mut tx, id, &roles).await?;
        tx.commit().await?;

        log::info!(
            "Roles de usuario {} actualizados por {}: {:?}",
            id,
            actor.username,
            roles
        );
        self.get(id).await
    }

    /// Baja lógica
    pub async fn delete(&self, actor: &UsuarioResponse, id: i64) -> AppResult<()> {
        let objetivo = self.get(id).await?;
        verificar_eliminacion(actor, &objetivo)?;

        sqlx::query("UPDATE usuarios SET activo = 0, updated_at = ?1 WHERE id = ?2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        log::warn!(
            "Usuario {} ('{}') eliminado por {}",
            id,
            objetivo.username,
            actor.username
        );
        Ok(())
    }
}

// ======================================================
// Reglas de autorización
// ======================================================

/// Solo un PROPIETARIO puede modificar a un PROPIETARIO.
pub fn verificar_modificacion(actor: &UsuarioResponse, objetivo: &UsuarioResponse) -> AppResult<()> {
    if objetivo.tiene_rol(Rol::Propietario) && !actor.tiene_rol(Rol::Propietario) {
        return Err(AppError::forbidden(
            "Solo el PROPIETARIO puede modificar al PROPIETARIO",
        ));
    }
    Ok(())
}

/// Quitar ADMINISTRADOR a otro administrador equivale a poder eliminarlo después,
/// así que solo el PROPIETARIO puede hacerlo.
pub fn verificar_cambio_roles(
    actor: &UsuarioResponse,
    objetivo: &UsuarioResponse,
    nuevos: &[Rol],
) -> AppResult<()> {
    let degrada_admin =
        objetivo.tiene_rol(Rol::Administrador) && !nuevos.contains(&Rol::Administrador);
    if degrada_admin && actor.id != objetivo.id && !actor.tiene_rol(Rol::Propietario) {
        log::warn!(
            "Rechazado: {} intentó quitar ADMINISTRADOR a {}",
            actor.username,
            objetivo.username
        );
        return Err(AppError::forbidden(
            "Solo el PROPIETARIO puede quitar el rol ADMINISTRADOR a otro administrador",
        ));
    }
    Ok(())
}

/// Reglas para eliminar o desactivar un usuario.
pub fn verificar_eliminacion(actor: &UsuarioResponse, objetivo: &UsuarioResponse) -> AppResult<()> {
    if actor.id == objetivo.id {
        return Err(AppError::bad_request(
            "No puedes eliminar ni desactivar tu propio usuario",
        ));
    }
    if actor.tiene_rol(Rol::Propietario) {
        return Ok(());
    }
    if objetivo.tiene_rol(Rol::Propietario) {
        return Err(AppError::forbidden(
            "Solo el PROPIETARIO puede modificar al PROPIETARIO",
        ));
    }
    if objetivo.tiene_rol(Rol::Administrador) {
        return Err(AppError::forbidden(
            "Solo el PROPIETARIO puede eliminar a otro administrador",
        ));
    }
    Ok(())
}

/// Sin duplicados y al menos un rol.
pub fn normalizar_roles(roles: &[Rol]) -> AppResult<Vec<Rol>> {
    let unicos: BTreeSet<Rol> = roles.iter().copied().collect();
    if unicos.is_empty() {
        return Err(AppError::bad_request("El usuario debe tener al menos un rol"));
    }
    Ok(unicos.into_iter().collect())
}

pub fn validar_password(password: &str) -> AppResult<()> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AppError::bad_request(format!(
            "La contraseña debe tener al menos {} caracteres",
            PASSWORD_MIN_LEN
        )));
    }
    Ok(())
}

fn validar_email(email: &str) -> AppResult<String> {
    let email = texto_requerido(email, "email")?.to_lowercase();
    let valido = email
        .split_once('@')
        .map(|(local, dominio)| !local.is_empty() && dominio.contains('.'))
        .unwrap_or(false);
    if !valido {
        return Err(AppError::bad_request("El email no es válido"));
    }
    Ok(email)
}

// ======================================================
// Acceso a datos
// ======================================================

async fn roles_de<'e, E>(executor: E, usuario_id: i64) -> AppResult<Vec<Rol>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let filas: Vec<String> =
        sqlx::query_scalar("SELECT rol FROM usuario_roles WHERE usuario_id = ?1 ORDER BY rol")
            .bind(usuario_id)
            .fetch_all(executor)
            .await?;

    let mut roles = filas
        .into_iter()
        .map(Rol::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    roles.sort();
    Ok(roles)
}

async fn insertar_usuario(
    conn: &mut SqliteConnection,
    username: &str,
    email: &str,
    nombre_completo: &str,
    password: &str,
) -> AppResult<i64> {
    let username = texto_requerido(username, "username")?;
    if username.chars().any(char::is_whitespace) {
        return Err(AppError::bad_request("El username no puede contener espacios"));
    }
    let email = validar_email(email)?;
    let nombre_completo = texto_requerido(nombre_completo, "nombre_completo")?;
    validar_password(password)?;

    let password_hash = hash_password(password)?;
    let now = Utc::now();
    // Los índices únicos sobre username_normalizado y email resuelven los duplicados
    let id = sqlx::query(
        r#"
        INSERT INTO usuarios (
            username, username_normalizado, email, nombre_completo, password_hash,
            busqueda, activo, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)
        "#,
    )
    .bind(&username)
    .bind(username.to_lowercase())
    .bind(&email)
    .bind(&nombre_completo)
    .bind(&password_hash)
    .bind(busqueda(&username, &email, &nombre_completo))
    .bind(now)
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
            AppError::conflict("El username o email ya está registrado")
        } else {
            AppError::Internal(anyhow::Error::new(e).context("Fallo al insertar usuario"))
        }
    })?
    .last_insert_rowid();

    Ok(id)
}

fn busqueda(username: &str, email: &str, nombre_completo: &str) -> String {
    texto_busqueda(&[Some(username), Some(email), Some(nombre_completo)])
}

/// Inserta roles validando la exclusividad del PROPIETARIO.
async fn asignar_roles(conn: &mut SqliteConnection, usuario_id: i64, roles: &[Rol]) -> AppResult<()> {
    if roles.contains(&Rol::Propietario) {
        let actual: Option<i64> = sqlx::query_scalar(
            "SELECT usuario_id FROM usuario_roles WHERE rol = ?1 AND usuario_id <> ?2",
        )
        .bind(Rol::Propietario.as_str())
        .bind(usuario_id)
        .fetch_optional(&mut *conn)
        .await?;
        if let Some(otro) = actual {
            log::warn!(
                "Rechazado rol PROPIETARIO para usuario {}: ya lo tiene el usuario {}",
                usuario_id,
                otro
            );
            return Err(AppError::conflict("Ya existe un usuario con rol PROPIETARIO"));
        }
    }

    for rol in roles {
        sqlx::query("INSERT INTO usuario_roles (usuario_id, rol) VALUES (?1, ?2)")
            .bind(usuario_id)
            .bind(rol.as_str())
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                // Respaldo del índice único parcial sobre PROPIETARIO
                let duplicado =
                    matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation());
                if duplicado {
                    AppError::conflict("Ya existe un usuario con rol PROPIETARIO")
                } else {
                    AppError::from(e)
                }
            })?;
    }
    Ok(())
}

fn push_busqueda(qb: &mut QueryBuilder<'_, Sqlite>, patron: &Option<String>) {
    if let Some(p) = patron {
        qb.push(" AND busqueda LIKE ").push_bind(p.clone());
    }
}

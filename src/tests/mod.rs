//! tests/mod.rs
//! Pruebas del servicio y helpers compartidos para armar datos.

mod abono_tests;
mod auth_tests;
mod catalogo_tests;
mod config_tests;
mod pdf_tests;
mod proyecto_tests;
mod reporte_tests;

use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::db;
use crate::models::cliente_model::ClienteRequest;
use crate::models::lote_model::LoteRequest;
use crate::models::proyecto_model::ProyectoRequest;
use crate::models::venta_model::{CreateVentaRequest, VentaRecord};
use crate::services::cliente_service::ClienteService;
use crate::services::lote_service::LoteService;
use crate::services::proyecto_service::ProyectoService;
use crate::services::venta_service::VentaService;

/// ids sembrados por la migración de datos iniciales
pub const MONEDA_PEN: i64 = 1;
pub const TIPO_DOC_DNI: i64 = 1;

pub async fn test_pool() -> Pool<Sqlite> {
    db::pool_en_memoria()
        .await
        .expect("No se pudo crear el pool en memoria")
}

/// Inserta un usuario sin pasar por argon2; útil como vendedor en pruebas de ventas.
pub async fn insertar_usuario_directo(pool: &Pool<Sqlite>, username: &str) -> i64 {
    let now = Utc::now();
    let id = sqlx::query(
        r#"
        INSERT INTO usuarios (
            username, username_normalizado, email, nombre_completo, password_hash,
            activo, created_at, updated_at
        )
        VALUES (?1, ?2, ?3, ?4, 'sin-hash', 1, ?5, ?5)
        "#,
    )
    .bind(username)
    .bind(username.to_lowercase())
    .bind(format!("{}@test.pe", username))
    .bind(format!("Usuario {}", username))
    .bind(now)
    .execute(pool)
    .await
    .expect("insert usuario")
    .last_insert_rowid();

    sqlx::query("INSERT INTO usuario_roles (usuario_id, rol) VALUES (?1, 'VENDEDOR')")
        .bind(id)
        .execute(pool)
        .await
        .expect("insert rol");
    id
}

pub fn cliente_request(numero_documento: &str, nombres: &str) -> ClienteRequest {
    ClienteRequest {
        tipo_documento_id: TIPO_DOC_DNI,
        numero_documento: numero_documento.to_string(),
        nombres: nombres.to_string(),
        apellidos: Some("Quispe".to_string()),
        telefono: None,
        email: None,
        direccion: None,
        distrito_id: None,
    }
}

pub fn proyecto_request(nombre: &str) -> ProyectoRequest {
    ProyectoRequest {
        nombre: nombre.to_string(),
        descripcion: None,
        ubicacion: None,
        distrito_id: None,
    }
}

pub fn lote_request(proyecto_id: i64, manzana: &str, numero: &str) -> LoteRequest {
    LoteRequest {
        proyecto_id,
        tipo_lote_id: Some(1),
        manzana: manzana.to_string(),
        numero: numero.to_string(),
        area: 120.0,
        precio: 45_000.0,
        estado: None,
    }
}

/// Datos mínimos para registrar ventas: vendedor, cliente, proyecto y un lote disponible.
pub struct Escenario {
    pub pool: Pool<Sqlite>,
    pub vendedor_id: i64,
    pub cliente_id: i64,
    pub proyecto_id: i64,
    pub lote_id: i64,
}

impl Escenario {
    pub async fn nuevo() -> Self {
        let pool = test_pool().await;
        let vendedor_id = insertar_usuario_directo(&pool, "vendedor").await;

        let cliente = ClienteService::new(pool.clone())
            .create(cliente_request("70123456", "Rosa"))
            .await
            .expect("crear cliente");
        let proyecto = ProyectoService::new(pool.clone())
            .create(proyecto_request("Los Olivos"))
            .await
            .expect("crear proyecto");
        let lote = LoteService::new(pool.clone())
            .create(lote_request(proyecto.id, "A", "1"))
            .await
            .expect("crear lote");

        Escenario {
            pool,
            vendedor_id,
            cliente_id: cliente.id,
            proyecto_id: proyecto.id,
            lote_id: lote.id,
        }
    }

    pub async fn otro_lote(&self, numero: &str) -> i64 {
        LoteService::new(self.pool.clone())
            .create(lote_request(self.proyecto_id, "A", numero))
            .await
            .expect("crear lote")
            .id
    }

    pub async fn vender(&self, lote_id: i64, monto_total: f64) -> VentaRecord {
        VentaService::new(self.pool.clone())
            .create(
                CreateVentaRequest {
                    cliente_id: self.cliente_id,
                    lote_id,
                    moneda_id: MONEDA_PEN,
                    monto_total,
                    fecha_venta: None,
                    observaciones: None,
                },
                self.vendedor_id,
            )
            .await
            .expect("crear venta")
    }
}

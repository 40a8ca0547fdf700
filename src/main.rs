use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;

use crate::config::app_config::AppConfig;
use crate::logger::init_logger;
use crate::services::abono_service::AbonoService;
use crate::services::auth_service::AuthService;
use crate::services::catalogo_service::CatalogoService;
use crate::services::cliente_service::ClienteService;
use crate::services::geografia_service::GeografiaService;
use crate::services::lote_service::LoteService;
use crate::services::moneda_service::MonedaService;
use crate::services::pdf_service::PdfService;
use crate::services::proyecto_service::ProyectoService;
use crate::services::reporte_service::ReporteService;
use crate::services::usuario_service::UsuarioService;
use crate::services::venta_service::VentaService;

mod app;
mod config;
mod db;
mod errors;
mod extractors;
mod handlers;
mod logger;
mod models;
mod services;

#[cfg(test)]
mod tests;

fn io_error(e: anyhow::Error) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("{:#}", e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let config = AppConfig::from_env().map_err(io_error)?;
    log::info!("Entorno: {:?}", config.entorno);

    // Conectarnos a la DB y aplicar el esquema
    let db_pool = db::conectar(&config.database_url).await.map_err(io_error)?;
    db::run_migrations(&db_pool).await.map_err(io_error)?;

    let pdf_service = PdfService::new(config.pdf_max_procesos).map_err(io_error)?;
    if !pdf_service.disponible() {
        log::warn!("Reportes PDF deshabilitados hasta instalar wkhtmltopdf");
    }
    let reporte_service = ReporteService::new(
        &config.analytics_api_url,
        config.analytics_timeout,
        pdf_service,
        config.reporte.clone(),
    )
    .map_err(io_error)?;

    let usuario_service = UsuarioService::new(db_pool.clone());
    let auth_service = AuthService::new(
        usuario_service.clone(),
        &config.jwt_secret,
        config.jwt_expiracion_horas,
    )
    .map_err(io_error)?;
    let catalogo_service = CatalogoService::new(db_pool.clone());
    let geografia_service = GeografiaService::new(db_pool.clone());
    let moneda_service = MonedaService::new(db_pool.clone());
    let cliente_service = ClienteService::new(db_pool.clone());
    let proyecto_service = ProyectoService::new(db_pool.clone());
    let lote_service = LoteService::new(db_pool.clone());
    let venta_service = VentaService::new(db_pool.clone());
    let abono_service = AbonoService::new(db_pool.clone());

    // Levantar servidor
    log::info!("Levantando servidor en {}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(usuario_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(catalogo_service.clone()))
            .app_data(web::Data::new(geografia_service.clone()))
            .app_data(web::Data::new(moneda_service.clone()))
            .app_data(web::Data::new(cliente_service.clone()))
            .app_data(web::Data::new(proyecto_service.clone()))
            .app_data(web::Data::new(lote_service.clone()))
            .app_data(web::Data::new(venta_service.clone()))
            .app_data(web::Data::new(abono_service.clone()))
            .app_data(web::Data::new(reporte_service.clone()))
            .configure(app::init_app)
    })
    .workers(config.workers)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

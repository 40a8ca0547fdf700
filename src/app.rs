//! app.rs
use crate::handlers::{
    abono_handler, auth_handler, catalogo_handler, cliente_handler, geografia_handler,
    lote_handler, moneda_handler, proyecto_handler, reporte_handler, salud_handler,
    usuario_handler, venta_handler,
};
use crate::models::catalogo_model::TipoCatalogo;
use actix_web::web;

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(salud_handler::health_endpoint))
        .service(
            web::scope("/auth")
                .route("/login", web::post().to(auth_handler::login_endpoint))
                .route("/register", web::post().to(auth_handler::register_endpoint))
                .route("/me", web::get().to(auth_handler::me_endpoint)),
        )
        .service(
            web::scope("/api")
                .service(catalogo_scope("/departamentos", TipoCatalogo::Departamento))
                .service(catalogo_scope("/tipos-documento", TipoCatalogo::TipoDocumento))
                .service(catalogo_scope("/tipos-lote", TipoCatalogo::TipoLote))
                .service(
                    web::scope("/provincias")
                        .route("", web::get().to(geografia_handler::list_provincias_endpoint))
                        .route("", web::post().to(geografia_handler::create_provincia_endpoint))
                        .route("/{id}", web::get().to(geografia_handler::get_provincia_endpoint))
                        .route("/{id}", web::put().to(geografia_handler::update_provincia_endpoint))
                        .route(
                            "/{id}",
                            web::delete().to(geografia_handler::delete_provincia_endpoint),
                        ),
                )
                .service(
                    web::scope("/distritos")
                        .route("", web::get().to(geografia_handler::list_distritos_endpoint))
                        .route("", web::post().to(geografia_handler::create_distrito_endpoint))
                        .route("/{id}", web::get().to(geografia_handler::get_distrito_endpoint))
                        .route("/{id}", web::put().to(geografia_handler::update_distrito_endpoint))
                        .route(
                            "/{id}",
                            web::delete().to(geografia_handler::delete_distrito_endpoint),
                        ),
                )
                .service(
                    web::scope("/monedas")
                        .route("", web::get().to(moneda_handler::list_endpoint))
                        .route("", web::post().to(moneda_handler::create_endpoint))
                        .route("/{id}", web::get().to(moneda_handler::get_endpoint))
                        .route("/{id}", web::put().to(moneda_handler::update_endpoint))
                        .route("/{id}", web::delete().to(moneda_handler::delete_endpoint)),
                )
                .service(
                    web::scope("/clientes")
                        .route("", web::get().to(cliente_handler::list_endpoint))
                        .route("", web::post().to(cliente_handler::create_endpoint))
                        .route("/{id}", web::get().to(cliente_handler::get_endpoint))
                        .route("/{id}", web::put().to(cliente_handler::update_endpoint))
                        .route("/{id}", web::delete().to(cliente_handler::delete_endpoint)),
                )
                .service(
                    web::scope("/proyectos")
                        .route("", web::get().to(proyecto_handler::list_endpoint))
                        .route("", web::post().to(proyecto_handler::create_endpoint))
                        .route("/{id}", web::get().to(proyecto_handler::get_endpoint))
                        .route("/{id}", web::put().to(proyecto_handler::update_endpoint))
                        .route("/{id}", web::delete().to(proyecto_handler::delete_endpoint)),
                )
                .service(
                    web::scope("/lotes")
                        .route("", web::get().to(lote_handler::list_endpoint))
                        .route("", web::post().to(lote_handler::create_endpoint))
                        .route("/{id}", web::get().to(lote_handler::get_endpoint))
                        .route("/{id}", web::put().to(lote_handler::update_endpoint))
                        .route("/{id}", web::delete().to(lote_handler::delete_endpoint)),
                )
                .service(
                    web::scope("/ventas")
                        .route("", web::get().to(venta_handler::list_endpoint))
                        .route("", web::post().to(venta_handler::create_endpoint))
                        .route("/{id}", web::get().to(venta_handler::get_endpoint))
                        .route("/{id}", web::put().to(venta_handler::update_endpoint))
                        .route("/{id}", web::delete().to(venta_handler::delete_endpoint))
                        .route("/{id}/anular", web::post().to(venta_handler::anular_endpoint))
                        .route(
                            "/{id}/estado-cuenta",
                            web::get().to(venta_handler::estado_cuenta_endpoint),
                        )
                        .route(
                            "/{id}/abonos",
                            web::get().to(venta_handler::list_abonos_endpoint),
                        ),
                )
                .service(
                    web::scope("/abonos")
                        .route("", web::post().to(abono_handler::create_endpoint))
                        .route("/{id}", web::get().to(abono_handler::get_endpoint))
                        .route("/{id}", web::put().to(abono_handler::update_endpoint))
                        .route("/{id}", web::delete().to(abono_handler::delete_endpoint)),
                )
                .service(
                    web::scope("/usuarios")
                        .route("", web::get().to(usuario_handler::list_endpoint))
                        .route("", web::post().to(usuario_handler::create_endpoint))
                        .route("/{id}", web::get().to(usuario_handler::get_endpoint))
                        .route("/{id}", web::put().to(usuario_handler::update_endpoint))
                        .route("/{id}", web::delete().to(usuario_handler::delete_endpoint))
                        .route("/{id}/roles", web::put().to(usuario_handler::set_roles_endpoint)),
                )
                .service(web::scope("/reportes").route(
                    "/ventas/pdf",
                    web::get().to(reporte_handler::reporte_ventas_pdf_endpoint),
                )),
        );
}

/// Los tres catálogos simples comparten handlers; el tipo viaja como app_data del scope.
fn catalogo_scope(path: &str, tipo: TipoCatalogo) -> actix_web::Scope {
    web::scope(path)
        .app_data(web::Data::new(tipo))
        .route("", web::get().to(catalogo_handler::list_endpoint))
        .route("", web::post().to(catalogo_handler::create_endpoint))
        .route("/{id}", web::get().to(catalogo_handler::get_endpoint))
        .route("/{id}", web::put().to(catalogo_handler::update_endpoint))
        .route("/{id}", web::delete().to(catalogo_handler::delete_endpoint))
}

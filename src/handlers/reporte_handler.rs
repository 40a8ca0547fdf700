//! handlers/reporte_handler.rs
//! Descarga del reporte de ventas en PDF.

use actix_web::{web, HttpResponse};
use log::error;

use crate::errors::AppError;
use crate::extractors::UsuarioAutenticado;
use crate::models::pdf_model::PdfResponse;
use crate::models::reporte_model::ReporteVentasQuery;
use crate::services::reporte_service::{nombre_archivo, ReporteService};

/// GET /api/reportes/ventas/pdf?desde=&hasta=&proyecto_id=
/// Retorna el PDF como adjunto. Los fallos de analítica o de wkhtmltopdf
/// se responden con un 500 genérico; el detalle queda en el log.
pub async fn reporte_ventas_pdf_endpoint(
    usuario: UsuarioAutenticado,
    reporte_service: web::Data<ReporteService>,
    query: web::Query<ReporteVentasQuery>,
) -> Result<HttpResponse, AppError> {
    usuario.requerir_admin()?;
    ReporteService::validar_query(&query)?;

    log::info!(
        "Reporte de ventas solicitado por {}: {:?}",
        usuario.0.username,
        *query
    );

    let file_name = nombre_archivo(&query);
    match reporte_service.generar_reporte_ventas(&query).await {
        Ok(pdf_bytes) => Ok(HttpResponse::Ok()
            .append_header(("Content-Type", "application/pdf"))
            .append_header((
                "Content-Disposition",
                format!(
                    "attachment; filename*=UTF-8''{}",
                    urlencoding::encode(&file_name)
                ),
            ))
            .append_header(("Cache-Control", "no-store"))
            .append_header(("Content-Length", pdf_bytes.len().to_string()))
            .body(pdf_bytes)),
        Err(e) => {
            error!("Error generando reporte de ventas: {:?}", e);
            Ok(HttpResponse::InternalServerError().json(PdfResponse {
                success: false,
                message: "No se pudo generar el reporte PDF".to_string(),
            }))
        }
    }
}

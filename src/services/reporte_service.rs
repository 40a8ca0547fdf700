//! services/reporte_service.rs
//! Reporte de ventas en PDF: consulta el servicio de analítica, arma el HTML
//! y lo convierte con PdfService.

use std::fmt::Write as _;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;

use crate::config::pdf_config::ReportePdfConfig;
use crate::errors::{AppError, AppResult};
use crate::models::pdf_model::PdfRequest;
use crate::models::reporte_model::{ReporteAnalitico, ReporteVentasQuery};
use crate::services::pdf_service::PdfService;

#[derive(Clone)]
pub struct ReporteService {
    http_client: Client,
    analytics_url: String,
    pdf_service: PdfService,
    config: ReportePdfConfig,
}

impl ReporteService {
    pub fn new(
        analytics_url: &str,
        timeout: Duration,
        pdf_service: PdfService,
        config: ReportePdfConfig,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("No se pudo construir el cliente HTTP de analítica")?;

        Ok(Self {
            http_client,
            analytics_url: analytics_url.trim_end_matches('/').to_string(),
            pdf_service,
            config,
        })
    }

    /// 400 si el rango de fechas está invertido.
    pub fn validar_query(query: &ReporteVentasQuery) -> AppResult<()> {
        if let (Some(desde), Some(hasta)) = (query.desde, query.hasta) {
            if desde > hasta {
                return Err(AppError::bad_request(
                    "La fecha 'desde' no puede ser posterior a 'hasta'",
                ));
            }
        }
        Ok(())
    }

    pub async fn obtener_analitica(&self, query: &ReporteVentasQuery) -> Result<ReporteAnalitico> {
        let url = format!("{}/analytics/ventas", self.analytics_url);
        log::info!("(obtener_analitica) GET {} {:?}", url, query);

        let resp = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .context("Fallo al consultar el servicio de analítica")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body_txt = resp.text().await.unwrap_or_default();
            log::error!(
                "(obtener_analitica) Respuesta no exitosa status={} body='{}'",
                status,
                body_txt
            );
            return Err(anyhow!("Analítica respondió {}: {}", status, body_txt));
        }

        let datos = resp
            .json::<ReporteAnalitico>()
            .await
            .context("La respuesta de analítica no tiene el formato esperado")?;

        log::info!(
            "(obtener_analitica) {} indicadores, {} filas",
            datos.indicadores.len(),
            datos.filas.len()
        );
        Ok(datos)
    }

    pub async fn generar_reporte_ventas(&self, query: &ReporteVentasQuery) -> Result<Vec<u8>> {
        let datos = self.obtener_analitica(query).await?;
        let html = self.render_html(&datos);

        let pdf_req = PdfRequest {
            file_name: nombre_archivo(query),
            html,
            orientation: Some(self.config.orientacion),
            page_size_preset: Some(self.config.tamano_pagina),
            margins: Some(self.config.margenes.clone()),
            scale: Some(self.config.zoom),
        };

        self.pdf_service
            .generate_pdf(pdf_req)
            .await
            .context("Error generando PDF con pdf_service")
    }

    /// HTML completo del reporte. Todo valor externo pasa por `escapar_html`.
    pub fn render_html(&self, datos: &ReporteAnalitico) -> String {
        let titulo = datos
            .titulo
            .clone()
            .unwrap_or_else(|| "Reporte de ventas".to_string());

        let mut html = String::with_capacity(4096);
        html.push_str("<!DOCTYPE html><html lang=\"es\"><head><meta charset=\"utf-8\">");
        let _ = write!(html, "<title>{}</title>", escapar_html(&titulo));
        html.push_str(ESTILOS);
        html.push_str("</head><body>");

        let _ = write!(
            html,
            "<header><div class=\"empresa\">{}</div><h1>{}</h1>",
            escapar_html(&self.config.titulo_empresa),
            escapar_html(&titulo)
        );
        if let Some(periodo) = &datos.periodo {
            let _ = write!(html, "<div class=\"periodo\">Periodo: {}</div>", escapar_html(periodo));
        }
        let _ = write!(
            html,
            "<div class=\"generado\">Generado: {}</div></header>",
            Utc::now().format("%d/%m/%Y %H:%M UTC")
        );

        if !datos.indicadores.is_empty() {
            html.push_str("<section class=\"indicadores\">");
            for ind in &datos.indicadores {
                let _ = write!(
                    html,
                    "<div class=\"indicador\"><span class=\"nombre\">{}</span><span class=\"valor\">{}</span></div>",
                    escapar_html(&ind.nombre),
                    formatear_valor(&ind.valor)
                );
            }
            html.push_str("</section>");
        }

        if datos.filas.is_empty() {
            html.push_str("<p class=\"vacio\">No hay datos para el periodo seleccionado.</p>");
        } else {
            html.push_str("<table><thead><tr>");
            for col in &datos.columnas {
                let _ = write!(html, "<th>{}</th>", escapar_html(col));
            }
            html.push_str("</tr></thead><tbody>");
            for fila in &datos.filas {
                html.push_str("<tr>");
                for celda in fila {
                    let clase = if celda.is_number() { " class=\"num\"" } else { "" };
                    let _ = write!(html, "<td{}>{}</td>", clase, formatear_valor(celda));
                }
                html.push_str("</tr>");
            }
            html.push_str("</tbody></table>");
        }

        html.push_str("</body></html>");
        html
    }
}

const ESTILOS: &str = r#"<style>
body { font-family: 'DejaVu Sans', Arial, sans-serif; font-size: 11px; color: #222; }
header { border-bottom: 2px solid #1f4e79; margin-bottom: 12px; padding-bottom: 6px; }
.empresa { font-size: 10px; text-transform: uppercase; color: #1f4e79; }
h1 { font-size: 18px; margin: 4px 0; }
.periodo, .generado { font-size: 10px; color: #555; }
.indicadores { margin: 10px 0; }
.indicador { display: inline-block; border: 1px solid #ccc; padding: 6px 10px; margin: 0 6px 6px 0; }
.indicador .nombre { display: block; font-size: 9px; color: #555; }
.indicador .valor { font-size: 14px; font-weight: bold; }
table { width: 100%; border-collapse: collapse; }
th { background: #1f4e79; color: #fff; padding: 4px; text-align: left; }
td { border-bottom: 1px solid #ddd; padding: 4px; }
td.num { text-align: right; }
.vacio { font-style: italic; color: #777; }
</style>"#;

pub fn escapar_html(texto: &str) -> String {
    let mut out = String::with_capacity(texto.len());
    for c in texto.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            otro => out.push(otro),
        }
    }
    out
}

/// Números con dos decimales (enteros tal cual), texto escapado.
pub fn formatear_valor(valor: &Value) -> String {
    match valor {
        Value::Null => "-".to_string(),
        Value::Bool(true) => "Sí".to_string(),
        Value::Bool(false) => "No".to_string(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                n.to_string()
            } else {
                format!("{:.2}", n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => escapar_html(s),
        otro => escapar_html(&otro.to_string()),
    }
}

/// Nombre del PDF según el rango pedido.
pub fn nombre_archivo(query: &ReporteVentasQuery) -> String {
    match (query.desde, query.hasta) {
        (Some(desde), Some(hasta)) => format!(
            "reporte_ventas_{}_{}.pdf",
            desde.format("%Y%m%d"),
            hasta.format("%Y%m%d")
        ),
        _ => format!("reporte_ventas_{}.pdf", Utc::now().format("%Y%m%d")),
    }
}

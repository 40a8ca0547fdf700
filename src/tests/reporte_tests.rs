//! tests/reporte_tests.rs
//! Reporte de ventas: cliente de analítica (mockeado con httpmock) y HTML.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;
    use httpmock::prelude::*;
    use serde_json::json;

    use crate::config::pdf_config::ReportePdfConfig;
    use crate::errors::AppError;
    use crate::models::reporte_model::{Indicador, ReporteAnalitico, ReporteVentasQuery};
    use crate::services::pdf_service::PdfService;
    use crate::services::reporte_service::{escapar_html, formatear_valor, nombre_archivo, ReporteService};

    fn service(url: &str) -> ReporteService {
        let pdf_service = PdfService::new(1).expect("PdfService");
        ReporteService::new(
            url,
            Duration::from_secs(5),
            pdf_service,
            ReportePdfConfig::default(),
        )
        .expect("ReporteService")
    }

    fn query() -> ReporteVentasQuery {
        ReporteVentasQuery {
            desde: NaiveDate::from_ymd_opt(2024, 1, 1),
            hasta: NaiveDate::from_ymd_opt(2024, 3, 31),
            proyecto_id: Some(7),
        }
    }

    #[test]
    fn test_validar_rango_de_fechas() {
        assert!(ReporteService::validar_query(&query()).is_ok());
        assert!(ReporteService::validar_query(&ReporteVentasQuery::default()).is_ok());

        let invertido = ReporteVentasQuery {
            desde: NaiveDate::from_ymd_opt(2024, 5, 1),
            hasta: NaiveDate::from_ymd_opt(2024, 4, 1),
            proyecto_id: None,
        };
        assert!(matches!(
            ReporteService::validar_query(&invertido),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_escapar_y_formatear() {
        assert_eq!(
            escapar_html(r#"<b>"Tom & Jerry's"</b>"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
        assert_eq!(formatear_valor(&json!(1234.5)), "1234.50");
        assert_eq!(formatear_valor(&json!(12)), "12");
        assert_eq!(formatear_valor(&json!(null)), "-");
        assert_eq!(formatear_valor(&json!(true)), "Sí");
        assert_eq!(formatear_valor(&json!("<script>")), "&lt;script&gt;");
    }

    #[test]
    fn test_nombre_archivo() {
        assert_eq!(nombre_archivo(&query()), "reporte_ventas_20240101_20240331.pdf");
        assert!(nombre_archivo(&ReporteVentasQuery::default()).starts_with("reporte_ventas_"));
    }

    #[actix_rt::test]
    async fn test_render_html_escapa_todo() {
        let service = service("http://localhost:1");
        let datos = ReporteAnalitico {
            titulo: Some("Ventas <Q1>".to_string()),
            periodo: Some("2024-01 / 2024-03".to_string()),
            indicadores: vec![Indicador {
                nombre: "Total vendido".to_string(),
                valor: json!(150000.5),
            }],
            columnas: vec!["Proyecto".to_string(), "Monto".to_string()],
            filas: vec![vec![json!("Villa <img src=x>"), json!(2500.1)]],
        };

        let html = service.render_html(&datos);
        assert!(html.contains("Ventas &lt;Q1&gt;"));
        assert!(html.contains("150000.50"));
        assert!(html.contains("Villa &lt;img src=x&gt;"));
        assert!(html.contains("<td class=\"num\">2500.10</td>"));
        assert!(!html.contains("<img"));

        let vacio = service.render_html(&ReporteAnalitico::default());
        assert!(vacio.contains("No hay datos"));
        assert!(vacio.contains("Reporte de ventas"));
    }

    #[actix_rt::test]
    async fn test_obtener_analitica_envia_filtros() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/analytics/ventas")
                .query_param("desde", "2024-01-01")
                .query_param("hasta", "2024-03-31")
                .query_param("proyecto_id", "7");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "titulo": "Ventas Q1",
                    "indicadores": [{ "nombre": "Ventas", "valor": 3 }],
                    "columnas": ["Lote", "Monto"],
                    "filas": [["A-1", 1000.0], ["A-2", null]]
                }));
        });

        let datos = service(&server.base_url())
            .obtener_analitica(&query())
            .await
            .unwrap();

        mock.assert();
        assert_eq!(datos.titulo.as_deref(), Some("Ventas Q1"));
        assert!(datos.periodo.is_none());
        assert_eq!(datos.filas.len(), 2);
        assert_eq!(datos.indicadores[0].valor, json!(3));
    }

    #[actix_rt::test]
    async fn test_obtener_analitica_error_del_servicio() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/analytics/ventas");
            then.status(503).body("mantenimiento");
        });

        let err = service(&server.base_url())
            .obtener_analitica(&ReporteVentasQuery::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("503"));

        // El error de analítica corta el reporte antes de llegar a wkhtmltopdf
        let err = service(&server.base_url())
            .generar_reporte_ventas(&ReporteVentasQuery::default())
            .await;
        assert!(err.is_err());
    }
}

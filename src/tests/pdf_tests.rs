//! tests/pdf_tests.rs
//! Pruebas unitarias para `PdfService`.

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use crate::models::pdf_model::{PdfMargins, PdfOrientation, PdfPagePreset, PdfRequest};
    use crate::services::pdf_service::{build_args, PdfService};

    fn valor_de<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn test_args_por_defecto() {
        let args = build_args(&PdfRequest::test_new("<h1>Hola</h1>".to_string()));

        assert_eq!(valor_de(&args, "--orientation"), Some("Portrait"));
        assert_eq!(valor_de(&args, "--page-size"), Some("A4"));
        assert_eq!(valor_de(&args, "--margin-top"), Some("10mm"));
        assert_eq!(valor_de(&args, "--margin-right"), Some("10mm"));
        assert_eq!(valor_de(&args, "--encoding"), Some("utf-8"));
        assert!(!args.iter().any(|a| a == "--zoom"));
        assert!(args.iter().any(|a| a == "--quiet"));
    }

    #[test]
    fn test_args_preset_y_margenes() {
        let mut req = PdfRequest::test_new(String::new());
        req.orientation = Some(PdfOrientation::Landscape);
        req.page_size_preset = Some(PdfPagePreset::Legal);
        req.margins = Some(PdfMargins {
            top: 12.0,
            bottom: 8.5,
            left: 5.0,
            right: 5.0,
        });
        req.scale = Some(0.8);

        let args = build_args(&req);
        assert_eq!(valor_de(&args, "--orientation"), Some("Landscape"));
        assert_eq!(valor_de(&args, "--page-size"), Some("Legal"));
        assert_eq!(valor_de(&args, "--margin-top"), Some("12mm"));
        assert_eq!(valor_de(&args, "--margin-bottom"), Some("8.5mm"));
        assert_eq!(valor_de(&args, "--zoom"), Some("0.8"));
    }

    #[test]
    fn test_parseo_orientacion_y_pagina() {
        assert_eq!("landscape".parse::<PdfOrientation>(), Ok(PdfOrientation::Landscape));
        assert_eq!(" Vertical ".parse::<PdfOrientation>(), Ok(PdfOrientation::Portrait));
        assert!("diagonal".parse::<PdfOrientation>().is_err());

        assert_eq!("a3".parse::<PdfPagePreset>(), Ok(PdfPagePreset::A3));
        assert_eq!("Carta".parse::<PdfPagePreset>(), Ok(PdfPagePreset::Letter));
        assert!("B5".parse::<PdfPagePreset>().is_err());
    }

    #[actix_rt::test]
    async fn test_sin_wkhtmltopdf_falla_con_error() {
        let service = PdfService::new(1).expect("PdfService");
        if service.disponible() {
            return;
        }
        let res = service
            .generate_pdf(PdfRequest::test_new("<h1>x</h1>".to_string()))
            .await;
        assert!(res.is_err());
    }

    #[actix_rt::test]
    #[ignore = "requiere wkhtmltopdf instalado"]
    async fn test_generate_pdf_simple() {
        let service = PdfService::new(2).expect("PdfService");
        assert!(service.disponible());

        let start = Instant::now();
        let pdf_data = service
            .generate_pdf(PdfRequest::test_new("<h1>Hola mundo</h1>".to_string()))
            .await
            .expect("No se generó el PDF");
        assert!(pdf_data.starts_with(b"%PDF"), "No inicia con %PDF");
        assert!(start.elapsed().as_secs() < 30, "Tardó demasiado");
    }

    #[actix_rt::test]
    #[ignore = "requiere wkhtmltopdf instalado"]
    async fn test_pdf_orientations() {
        let service = PdfService::new(2).expect("PdfService");

        for orient in [PdfOrientation::Portrait, PdfOrientation::Landscape] {
            let mut req = PdfRequest::test_new(format!("<h1>Orient {:?}</h1>", orient));
            req.orientation = Some(orient);

            let res = service.generate_pdf(req).await;
            assert!(res.is_ok(), "Falló con orientación {:?}", orient);
            assert!(res.unwrap().starts_with(b"%PDF"));
        }
    }
}

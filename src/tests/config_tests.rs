//! tests/config_tests.rs

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use crate::config::app_config::{AppConfig, Entorno};
    use crate::config::pdf_config::ReportePdfConfig;
    use crate::models::pdf_model::{PdfOrientation, PdfPagePreset};

    fn config_con(pares: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let env: HashMap<String, String> = pares
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    /// Producción con secreto más los pares indicados.
    fn config_prod(pares: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let mut todos = vec![("JWT_SECRET", "secreto-produccion")];
        todos.extend_from_slice(pares);
        config_con(&todos)
    }

    #[test]
    fn test_valores_por_defecto_en_desarrollo() {
        let config = config_con(&[("APP_ENV", "development")]).unwrap();
        assert_eq!(config.entorno, Entorno::Desarrollo);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5022);
        assert_eq!(config.workers, 4);
        assert_eq!(config.database_url, "sqlite://data/inmobiliaria.db");
        assert_eq!(config.jwt_expiracion_horas, 8);
        assert_eq!(config.analytics_api_url, "http://localhost:8000");
        assert_eq!(config.analytics_timeout, Duration::from_secs(30));
        assert_eq!(config.pdf_max_procesos, 8);
        assert!(!config.jwt_secret.is_empty());
    }

    #[test]
    fn test_produccion_exige_jwt_secret() {
        // Sin APP_ENV se asume producción
        let err = config_con(&[]).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));

        assert!(config_con(&[("APP_ENV", "production")]).is_err());
        assert!(config_con(&[("APP_ENV", "production"), ("JWT_SECRET", "   ")]).is_err());

        let config = config_prod(&[]).unwrap();
        assert_eq!(config.entorno, Entorno::Produccion);
        assert_eq!(config.jwt_secret, "secreto-produccion");
    }

    #[test]
    fn test_entorno_desconocido() {
        assert!(config_con(&[("APP_ENV", "staging"), ("JWT_SECRET", "x")]).is_err());
        let config = config_con(&[("APP_ENV", " Dev ")]).unwrap();
        assert_eq!(config.entorno, Entorno::Desarrollo);
    }

    #[test]
    fn test_valores_desde_entorno() {
        let config = config_prod(&[
            ("PORT", "8080"),
            ("JWT_EXPIRACION_HORAS", "2"),
            ("ANALYTICS_API_URL", "http://analytics:9000/"),
            ("ANALYTICS_TIMEOUT_SECS", " 5 "),
            ("PDF_MAX_PROCESOS", "2"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_expiracion_horas, 2);
        assert_eq!(config.analytics_api_url, "http://analytics:9000");
        assert_eq!(config.analytics_timeout, Duration::from_secs(5));
        assert_eq!(config.pdf_max_procesos, 2);
    }

    #[test]
    fn test_valores_invalidos() {
        assert!(config_prod(&[("PORT", "puerto")]).is_err());
        assert!(config_prod(&[("PORT", "70000")]).is_err());
        assert!(config_prod(&[("JWT_EXPIRACION_HORAS", "0")]).is_err());
        assert!(config_prod(&[("PDF_MAX_PROCESOS", "0")]).is_err());
        assert!(config_prod(&[("WORKERS", "0")]).is_err());
        assert!(config_prod(&[("REPORTE_ZOOM", "0")]).is_err());
        assert!(config_prod(&[("REPORTE_PAGINA", "B5")]).is_err());
        assert!(config_prod(&[("REPORTE_ORIENTACION", "diagonal")]).is_err());
    }

    #[test]
    fn test_config_pdf_por_defecto() {
        let config = ReportePdfConfig::default();
        assert_eq!(config.orientacion, PdfOrientation::Landscape);
        assert_eq!(config.tamano_pagina, PdfPagePreset::A4);
        assert_eq!(config.margenes.top, 12.0);
        assert_eq!(config.zoom, 1.0);

        let sin_variables = config_prod(&[]).unwrap().reporte;
        assert_eq!(sin_variables.titulo_empresa, config.titulo_empresa);
        assert_eq!(sin_variables.tamano_pagina, PdfPagePreset::A4);
    }

    #[test]
    fn test_config_pdf_desde_entorno() {
        let reporte = config_prod(&[
            ("REPORTE_EMPRESA", "Inmobiliaria Los Andes"),
            ("REPORTE_ORIENTACION", "portrait"),
            ("REPORTE_PAGINA", "legal"),
            ("REPORTE_ZOOM", "0.9"),
        ])
        .unwrap()
        .reporte;
        assert_eq!(reporte.titulo_empresa, "Inmobiliaria Los Andes");
        assert_eq!(reporte.orientacion, PdfOrientation::Portrait);
        assert_eq!(reporte.tamano_pagina, PdfPagePreset::Legal);
        assert_eq!(reporte.zoom, 0.9);
    }
}

//! tests/catalogo_tests.rs
//! Catálogos simples, geografía y monedas.

#[cfg(test)]
mod tests {
    use crate::errors::AppError;
    use crate::models::catalogo_model::{CatalogoRequest, TipoCatalogo};
    use crate::models::common_model::PaginationQuery;
    use crate::models::geografia_model::{
        DistritoFiltro, DistritoRequest, ProvinciaFiltro, ProvinciaRequest,
    };
    use crate::models::moneda_model::MonedaRequest;
    use crate::services::catalogo_service::CatalogoService;
    use crate::services::geografia_service::GeografiaService;
    use crate::services::moneda_service::{normalizar_codigo, MonedaService};
    use crate::tests::{test_pool, Escenario, MONEDA_PEN};

    fn catalogo(nombre: &str) -> CatalogoRequest {
        CatalogoRequest {
            nombre: nombre.to_string(),
            descripcion: None,
        }
    }

    #[actix_rt::test]
    async fn test_datos_iniciales_sembrados() {
        let service = CatalogoService::new(test_pool().await);
        let q = PaginationQuery::default();

        let docs = service.list(TipoCatalogo::TipoDocumento, &q).await.unwrap();
        let nombres: Vec<&str> = docs.items.iter().map(|c| c.nombre.as_str()).collect();
        assert_eq!(docs.total, 3);
        assert!(nombres.contains(&"DNI"));
        assert!(nombres.contains(&"RUC"));

        let lotes = service.list(TipoCatalogo::TipoLote, &q).await.unwrap();
        assert_eq!(lotes.total, 3);
    }

    #[actix_rt::test]
    async fn test_nombre_unico_sin_distinguir_mayusculas() {
        let service = CatalogoService::new(test_pool().await);

        let lima = service
            .create(TipoCatalogo::Departamento, catalogo("  Lima "))
            .await
            .unwrap();
        assert_eq!(lima.nombre, "Lima");

        let err = service
            .create(TipoCatalogo::Departamento, catalogo("LIMA"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // El mismo nombre en otro catálogo no choca
        service
            .create(TipoCatalogo::TipoLote, catalogo("Lima"))
            .await
            .unwrap();

        let err = service
            .create(TipoCatalogo::Departamento, catalogo("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[actix_rt::test]
    async fn test_baja_logica_y_dependientes() {
        let pool = test_pool().await;
        let service = CatalogoService::new(pool.clone());
        let geografia = GeografiaService::new(pool.clone());

        let cusco = service
            .create(TipoCatalogo::Departamento, catalogo("Cusco"))
            .await
            .unwrap();
        let provincia = geografia
            .create_provincia(ProvinciaRequest {
                departamento_id: cusco.id,
                nombre: "Urubamba".to_string(),
            })
            .await
            .unwrap();

        let err = service
            .delete(TipoCatalogo::Departamento, cusco.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        geografia.delete_provincia(provincia.id).await.unwrap();
        service.delete(TipoCatalogo::Departamento, cusco.id).await.unwrap();

        assert!(matches!(
            service.get(TipoCatalogo::Departamento, cusco.id).await,
            Err(AppError::NotFound(_))
        ));
        let q = PaginationQuery {
            q: Some("cus".to_string()),
            ..Default::default()
        };
        assert_eq!(service.list(TipoCatalogo::Departamento, &q).await.unwrap().total, 0);

        // Dado de baja, el nombre queda libre otra vez
        service
            .create(TipoCatalogo::Departamento, catalogo("Cusco"))
            .await
            .unwrap();
    }

    #[actix_rt::test]
    async fn test_geografia_padres_y_unicidad() {
        let pool = test_pool().await;
        let catalogos = CatalogoService::new(pool.clone());
        let service = GeografiaService::new(pool.clone());

        let err = service
            .create_provincia(ProvinciaRequest {
                departamento_id: 999,
                nombre: "Huaral".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let lima = catalogos
            .create(TipoCatalogo::Departamento, catalogo("Lima"))
            .await
            .unwrap();
        let huaral = service
            .create_provincia(ProvinciaRequest {
                departamento_id: lima.id,
                nombre: "Huaral".to_string(),
            })
            .await
            .unwrap();
        let err = service
            .create_provincia(ProvinciaRequest {
                departamento_id: lima.id,
                nombre: "huaral".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let chancay = service
            .create_distrito(DistritoRequest {
                provincia_id: huaral.id,
                nombre: "Chancay".to_string(),
            })
            .await
            .unwrap();

        let err = service.delete_provincia(huaral.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let filtro = DistritoFiltro {
            provincia_id: Some(huaral.id),
        };
        let distritos = service
            .list_distritos(&filtro, &PaginationQuery::default())
            .await
            .unwrap();
        assert_eq!(distritos.total, 1);
        assert_eq!(distritos.items[0].id, chancay.id);

        let filtro = ProvinciaFiltro {
            departamento_id: Some(lima.id + 1000),
        };
        let provincias = service
            .list_provincias(&filtro, &PaginationQuery::default())
            .await
            .unwrap();
        assert_eq!(provincias.total, 0);
    }

    #[test]
    fn test_normalizar_codigo_moneda() {
        assert_eq!(normalizar_codigo(" eur ").unwrap(), "EUR");
        assert!(matches!(normalizar_codigo("EURO"), Err(AppError::BadRequest(_))));
        assert!(matches!(normalizar_codigo("U$D"), Err(AppError::BadRequest(_))));
        assert!(matches!(normalizar_codigo("ÉUR"), Err(AppError::BadRequest(_))));
    }

    #[actix_rt::test]
    async fn test_moneda_codigo_unico_y_en_uso() {
        let esc = Escenario::nuevo().await;
        let service = MonedaService::new(esc.pool.clone());

        let err = service
            .create(MonedaRequest {
                codigo: "pen".to_string(),
                nombre: "Otro sol".to_string(),
                simbolo: "S/".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let eur = service
            .create(MonedaRequest {
                codigo: "eur".to_string(),
                nombre: "Euro".to_string(),
                simbolo: "€".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(eur.codigo, "EUR");
        service.delete(eur.id).await.unwrap();

        esc.vender(esc.lote_id, 1_000.0).await;
        let err = service.delete(MONEDA_PEN).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[actix_rt::test]
    async fn test_nombres_con_tildes_y_enie() {
        let pool = test_pool().await;
        let service = CatalogoService::new(pool.clone());
        let geografia = GeografiaService::new(pool.clone());

        let ancash = service
            .create(TipoCatalogo::Departamento, catalogo("áncash"))
            .await
            .unwrap();
        let err = service
            .create(TipoCatalogo::Departamento, catalogo("ÁNCASH"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let q = PaginationQuery {
            q: Some("ÁNC".to_string()),
            ..Default::default()
        };
        let encontrados = service.list(TipoCatalogo::Departamento, &q).await.unwrap();
        assert_eq!(encontrados.total, 1);
        assert_eq!(encontrados.items[0].id, ancash.id);

        let huari = geografia
            .create_provincia(ProvinciaRequest {
                departamento_id: ancash.id,
                nombre: "Huari".to_string(),
            })
            .await
            .unwrap();
        geografia
            .create_distrito(DistritoRequest {
                provincia_id: huari.id,
                nombre: "San Marcos de Ñaña".to_string(),
            })
            .await
            .unwrap();
        let err = geografia
            .create_distrito(DistritoRequest {
                provincia_id: huari.id,
                nombre: "SAN MARCOS DE  ÑAÑA".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let filtro = DistritoFiltro { provincia_id: None };
        let q = PaginationQuery {
            q: Some("ÑAÑA".to_string()),
            ..Default::default()
        };
        assert_eq!(geografia.list_distritos(&filtro, &q).await.unwrap().total, 1);
    }

    #[test]
    fn test_offset_no_desborda() {
        let q = PaginationQuery {
            page: Some(u64::MAX),
            page_size: Some(100),
            q: None,
        };
        assert_eq!(q.offset(), i64::MAX);

        let q = PaginationQuery {
            page: Some(3),
            page_size: Some(500),
            q: None,
        };
        assert_eq!(q.page_size(), 100);
        assert_eq!(q.offset(), 200);
    }

    #[actix_rt::test]
    async fn test_pagina_enorme_devuelve_vacio() {
        let service = CatalogoService::new(test_pool().await);
        let q = PaginationQuery {
            page: Some(u64::MAX),
            page_size: Some(100),
            q: None,
        };
        let pagina = service.list(TipoCatalogo::TipoDocumento, &q).await.unwrap();
        assert_eq!(pagina.total, 3);
        assert!(pagina.items.is_empty());
        assert_eq!(pagina.page, u64::MAX);
    }
}

//! tests/proyecto_tests.rs
//! Unicidad de nombres de proyecto normalizados.

#[cfg(test)]
mod tests {
    use crate::errors::AppError;
    use crate::models::common_model::normalizar_nombre;
    use crate::services::proyecto_service::ProyectoService;
    use crate::tests::{proyecto_request, test_pool, Escenario};

    #[test]
    fn test_normalizar_nombre() {
        assert_eq!(normalizar_nombre("  Las   Lomas\tde  Carabayllo "), "las lomas de carabayllo");
        assert_eq!(normalizar_nombre("VILLA SOL"), "villa sol");
    }

    #[actix_rt::test]
    async fn test_nombre_duplicado_ignora_espacios_y_mayusculas() {
        let service = ProyectoService::new(test_pool().await);

        let creado = service
            .create(proyecto_request("  Villa   Sol "))
            .await
            .unwrap();
        assert_eq!(creado.nombre, "Villa Sol");

        let err = service
            .create(proyecto_request("villa sol"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = service
            .create(proyecto_request("VILLA\tSOL"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[actix_rt::test]
    async fn test_renombrar_a_si_mismo_y_a_otro() {
        let service = ProyectoService::new(test_pool().await);
        let sol = service.create(proyecto_request("Villa Sol")).await.unwrap();
        let mar = service.create(proyecto_request("Villa Mar")).await.unwrap();

        let renombrado = service
            .update(sol.id, proyecto_request("VILLA  SOL"))
            .await
            .unwrap();
        assert_eq!(renombrado.nombre, "VILLA SOL");

        let err = service
            .update(mar.id, proyecto_request("villa sol"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[actix_rt::test]
    async fn test_eliminar_libera_el_nombre_y_respeta_lotes() {
        let esc = Escenario::nuevo().await;
        let service = ProyectoService::new(esc.pool.clone());

        let err = service.delete(esc.proyecto_id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let vacio = service.create(proyecto_request("Sin Lotes")).await.unwrap();
        service.delete(vacio.id).await.unwrap();
        assert!(matches!(service.get(vacio.id).await, Err(AppError::NotFound(_))));

        service.create(proyecto_request("sin lotes")).await.unwrap();
    }
}

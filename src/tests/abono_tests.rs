//! tests/abono_tests.rs
//! Conciliación de abonos contra el saldo de la venta.

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::errors::AppError;
    use crate::models::abono_model::{CreateAbonoRequest, UpdateAbonoRequest};
    use crate::models::common_model::PaginationQuery;
    use crate::models::venta_model::EstadoVenta;
    use crate::services::abono_service::AbonoService;
    use crate::services::saldo_venta::{estado_por_saldo, validar_monto_abono, TOLERANCIA_MONTO};
    use crate::services::venta_service::VentaService;
    use crate::tests::Escenario;

    fn abono(venta_id: i64, monto: f64) -> CreateAbonoRequest {
        CreateAbonoRequest {
            venta_id,
            monto_abonado: monto,
            fecha_abono: None,
            metodo_pago: Some("TRANSFERENCIA".to_string()),
            numero_operacion: None,
            observacion: None,
        }
    }

    #[test]
    fn test_validar_monto_dentro_de_tolerancia() {
        assert!(validar_monto_abono(100.0, 100.0, 0.0).is_ok());
        assert!(validar_monto_abono(100.0 + TOLERANCIA_MONTO / 2.0, 100.0, 0.0).is_ok());
        assert!(validar_monto_abono(40.0, 100.0, 60.0).is_ok());
    }

    #[test]
    fn test_validar_monto_excede_saldo() {
        assert!(matches!(
            validar_monto_abono(100.01, 100.0, 0.0),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            validar_monto_abono(40.01, 100.0, 60.0),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_validar_monto_no_positivo() {
        assert!(matches!(validar_monto_abono(0.0, 100.0, 0.0), Err(AppError::BadRequest(_))));
        assert!(matches!(validar_monto_abono(-5.0, 100.0, 0.0), Err(AppError::BadRequest(_))));
        assert!(matches!(
            validar_monto_abono(f64::NAN, 100.0, 0.0),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_estado_por_saldo() {
        assert_eq!(estado_por_saldo(EstadoVenta::EnProceso, 100.0, 50.0), EstadoVenta::EnProceso);
        assert_eq!(estado_por_saldo(EstadoVenta::EnProceso, 100.0, 99.9995), EstadoVenta::Pagada);
        assert_eq!(estado_por_saldo(EstadoVenta::Pagada, 100.0, 80.0), EstadoVenta::EnProceso);
        assert_eq!(estado_por_saldo(EstadoVenta::Anulada, 100.0, 100.0), EstadoVenta::Anulada);
    }

    #[actix_rt::test]
    async fn test_abonos_hasta_pagar_la_venta() {
        let esc = Escenario::nuevo().await;
        let venta = esc.vender(esc.lote_id, 1000.0).await;
        let service = AbonoService::new(esc.pool.clone());
        let ventas = VentaService::new(esc.pool.clone());

        service.create(abono(venta.id, 400.0), esc.vendedor_id).await.unwrap();
        assert_eq!(ventas.get(venta.id).await.unwrap().estado, EstadoVenta::EnProceso);

        service.create(abono(venta.id, 600.0), esc.vendedor_id).await.unwrap();
        let pagada = ventas.get(venta.id).await.unwrap();
        assert_eq!(pagada.estado, EstadoVenta::Pagada);

        let cuenta = ventas.estado_cuenta(venta.id).await.unwrap();
        assert_eq!(cuenta.abonos.len(), 2);
        assert!((cuenta.total_abonado - 1000.0).abs() < TOLERANCIA_MONTO);
        assert!(cuenta.saldo.abs() < TOLERANCIA_MONTO);
    }

    #[actix_rt::test]
    async fn test_abono_que_excede_saldo_se_rechaza() {
        let esc = Escenario::nuevo().await;
        let venta = esc.vender(esc.lote_id, 500.0).await;
        let service = AbonoService::new(esc.pool.clone());

        service.create(abono(venta.id, 300.0), esc.vendedor_id).await.unwrap();
        let err = service
            .create(abono(venta.id, 200.5), esc.vendedor_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        // Dentro de la tolerancia sí entra y cierra la venta
        service
            .create(abono(venta.id, 200.0005), esc.vendedor_id)
            .await
            .unwrap();
        let venta = VentaService::new(esc.pool.clone()).get(venta.id).await.unwrap();
        assert_eq!(venta.estado, EstadoVenta::Pagada);
    }

    #[actix_rt::test]
    async fn test_editar_abono_excluye_su_propio_monto() {
        let esc = Escenario::nuevo().await;
        let venta = esc.vender(esc.lote_id, 1000.0).await;
        let service = AbonoService::new(esc.pool.clone());

        service.create(abono(venta.id, 300.0), esc.vendedor_id).await.unwrap();
        let segundo = service.create(abono(venta.id, 500.0), esc.vendedor_id).await.unwrap();

        let fecha = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let editar = |monto: f64| UpdateAbonoRequest {
            monto_abonado: monto,
            fecha_abono: fecha,
            metodo_pago: None,
            numero_operacion: Some("OP-77".to_string()),
            observacion: None,
        };

        // 300 + 700 = 1000: cabe justo
        let editado = service.update(segundo.id, editar(700.0)).await.unwrap();
        assert_eq!(editado.monto_abonado, 700.0);
        assert_eq!(editado.fecha_abono, fecha);
        assert_eq!(editado.numero_operacion.as_deref(), Some("OP-77"));
        let ventas = VentaService::new(esc.pool.clone());
        assert_eq!(ventas.get(venta.id).await.unwrap().estado, EstadoVenta::Pagada);

        // 300 + 701 excede
        let err = service.update(segundo.id, editar(701.0)).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        // Bajar el monto reabre el saldo
        service.update(segundo.id, editar(100.0)).await.unwrap();
        assert_eq!(ventas.get(venta.id).await.unwrap().estado, EstadoVenta::EnProceso);
    }

    #[actix_rt::test]
    async fn test_eliminar_abono_revierte_pagada() {
        let esc = Escenario::nuevo().await;
        let venta = esc.vender(esc.lote_id, 800.0).await;
        let service = AbonoService::new(esc.pool.clone());
        let ventas = VentaService::new(esc.pool.clone());

        let a = service.create(abono(venta.id, 800.0), esc.vendedor_id).await.unwrap();
        assert_eq!(ventas.get(venta.id).await.unwrap().estado, EstadoVenta::Pagada);

        service.delete(a.id).await.unwrap();
        assert_eq!(ventas.get(venta.id).await.unwrap().estado, EstadoVenta::EnProceso);
        assert!(matches!(service.get(a.id).await, Err(AppError::NotFound(_))));

        let pagina = service
            .list_por_venta(venta.id, &PaginationQuery::default())
            .await
            .unwrap();
        assert_eq!(pagina.total, 0);
    }

    #[actix_rt::test]
    async fn test_abono_en_venta_anulada_o_inexistente() {
        let esc = Escenario::nuevo().await;
        let venta = esc.vender(esc.lote_id, 800.0).await;
        VentaService::new(esc.pool.clone()).anular(venta.id).await.unwrap();

        let service = AbonoService::new(esc.pool.clone());
        let err = service.create(abono(venta.id, 10.0), esc.vendedor_id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = service.create(abono(9999, 10.0), esc.vendedor_id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service
            .list_por_venta(9999, &PaginationQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

//! tests/auth_tests.rs
//! Pruebas HTTP de autenticación y permisos sobre la app completa.

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use actix_web::{http::StatusCode, test, web, App};
    use serde_json::{json, Value};
    use sqlx::{Pool, Sqlite};

    use crate::app::init_app;
    use crate::errors::AppError;
    use crate::models::auth_model::{LoginRequest, TokenResponse};
    use crate::models::usuario_model::Rol;
    use crate::services::auth_service::{hash_password, verify_password, AuthService};
    use crate::services::cliente_service::ClienteService;
    use crate::services::proyecto_service::ProyectoService;
    use crate::services::usuario_service::UsuarioService;
    use crate::tests::test_pool;

    const SECRETO: &str = "secreto-de-pruebas";

    fn auth_service(pool: &Pool<Sqlite>) -> AuthService {
        AuthService::new(UsuarioService::new(pool.clone()), SECRETO, 1).expect("AuthService")
    }

    macro_rules! app_de_prueba {
        ($pool:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($pool.clone()))
                    .app_data(web::Data::new(UsuarioService::new($pool.clone())))
                    .app_data(web::Data::new(auth_service(&$pool)))
                    .app_data(web::Data::new(ProyectoService::new($pool.clone())))
                    .app_data(web::Data::new(ClienteService::new($pool.clone())))
                    .configure(init_app),
            )
            .await
        };
    }

    fn registro(username: &str) -> Value {
        json!({
            "username": username,
            "email": format!("{}@inmobiliaria.pe", username),
            "nombre_completo": format!("Nombre {}", username),
            "password": "clave-segura-1"
        })
    }

    #[actix_rt::test]
    async fn test_hash_y_verificacion_de_password() {
        let hash = hash_password("clave-segura-1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("clave-segura-1", &hash));
        assert!(!verify_password("otra-clave", &hash));
        assert!(!verify_password("clave-segura-1", "no-es-un-hash"));
    }

    #[actix_rt::test]
    async fn test_token_emitido_y_validado() {
        let pool = test_pool().await;
        let service = auth_service(&pool);
        let usuario = UsuarioService::new(pool.clone())
            .registrar("dueno", "dueno@inmobiliaria.pe", "Dueño", "clave-segura-1")
            .await
            .unwrap();

        let token = service.emitir_token(usuario.clone()).unwrap();
        assert_eq!(token.tipo, "Bearer");

        let claims = service.validar_token(&token.token).unwrap();
        assert_eq!(claims.sub, usuario.id);
        assert_eq!(claims.roles, vec![Rol::Propietario]);
        assert!(claims.exp > claims.iat);

        let otro = AuthService::new(UsuarioService::new(pool.clone()), "otro-secreto", 1)
            .expect("AuthService");
        assert!(otro.validar_token(&token.token).is_err());
        assert!(service.validar_token("basura").is_err());
    }

    #[actix_rt::test]
    async fn test_login_usuario_inexistente_tambien_verifica_hash() {
        let pool = test_pool().await;
        let service = auth_service(&pool);
        UsuarioService::new(pool.clone())
            .registrar("dueno", "dueno@inmobiliaria.pe", "Dueño", "clave-segura-1")
            .await
            .unwrap();
        let login = |usuario: &str| LoginRequest {
            usuario: usuario.to_string(),
            password: "clave-incorrecta".to_string(),
        };

        let inicio = Instant::now();
        let err_existente = service.login(login("dueno")).await.unwrap_err();
        let con_usuario = inicio.elapsed();

        let inicio = Instant::now();
        let err_inexistente = service.login(login("nadie")).await.unwrap_err();
        let sin_usuario = inicio.elapsed();

        assert!(matches!(err_inexistente, AppError::Unauthorized(_)));
        assert_eq!(err_inexistente.to_string(), err_existente.to_string());
        // Los dos caminos pasan por Argon2; sin señuelo el inexistente sería casi instantáneo
        assert!(
            sin_usuario * 4 >= con_usuario,
            "inexistente {:?} vs existente {:?}",
            sin_usuario,
            con_usuario
        );
    }

    #[actix_rt::test]
    async fn test_registro_login_y_me() {
        let pool = test_pool().await;
        let app = app_de_prueba!(pool);

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(registro("dueno"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let registrado: TokenResponse = test::read_body_json(resp).await;
        assert_eq!(registrado.usuario.roles, vec![Rol::Propietario]);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "usuario": "DUENO@inmobiliaria.pe", "password": "clave-segura-1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let login: TokenResponse = test::read_body_json(resp).await;

        let req = test::TestRequest::get()
            .uri("/auth/me")
            .insert_header(("Authorization", format!("Bearer {}", login.token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let me: Value = test::read_body_json(resp).await;
        assert_eq!(me["username"], "dueno");
        assert!(me.get("password_hash").is_none());
    }

    #[actix_rt::test]
    async fn test_credenciales_invalidas_y_sin_token() {
        let pool = test_pool().await;
        let app = app_de_prueba!(pool);

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(registro("dueno"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "usuario": "dueno", "password": "incorrecta" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "usuario": "fantasma", "password": "incorrecta" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let otro: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], otro["error"]);

        let req = test::TestRequest::get().uri("/api/proyectos").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/proyectos")
            .insert_header(("Authorization", "Bearer token.invalido.x"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_vendedor_no_escribe_proyectos_pero_si_clientes() {
        let pool = test_pool().await;
        let app = app_de_prueba!(pool);

        for username in ["dueno", "vende"] {
            let req = test::TestRequest::post()
                .uri("/auth/register")
                .set_json(registro(username))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "usuario": "vende", "password": "clave-segura-1" }))
            .to_request();
        let token: TokenResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(token.usuario.roles, vec![Rol::Vendedor]);
        let bearer = format!("Bearer {}", token.token);

        let req = test::TestRequest::post()
            .uri("/api/proyectos")
            .insert_header(("Authorization", bearer.clone()))
            .set_json(json!({ "nombre": "Las Palmeras" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri("/api/proyectos?page=1&page_size=5")
            .insert_header(("Authorization", bearer.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let pagina: Value = test::read_body_json(resp).await;
        assert_eq!(pagina["page_size"], 5);
        assert_eq!(pagina["total"], 0);

        let req = test::TestRequest::post()
            .uri("/api/clientes")
            .insert_header(("Authorization", bearer))
            .set_json(json!({
                "tipo_documento_id": 1,
                "numero_documento": "45678912",
                "nombres": "Carlos"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    #[actix_rt::test]
    async fn test_health() {
        let pool = test_pool().await;
        let app = app_de_prueba!(pool);

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }
}

//! Auth Router

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::AuthStore;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_admin, require_session};

/// Build the `/api/auth` router for any store implementation
pub fn auth_router<R: AuthStore>(repo: Arc<R>, config: Arc<AuthConfig>) -> Router {
    let state = AuthAppState {
        repo: repo.clone(),
        config: config.clone(),
    };
    let session = AuthMiddlewareState { repo, config };

    let admin = Router::new()
        .route(
            "/accounts",
            get(handlers::list_accounts::<R>).post(handlers::register_by_admin::<R>),
        )
        .route(
            "/accounts/{public_id}",
            get(handlers::get_account::<R>).patch(handlers::update_account::<R>),
        )
        .route_layer(from_fn(require_admin));

    let authenticated = Router::new()
        .route("/me", get(handlers::me::<R>))
        .merge(admin)
        .route_layer(from_fn_with_state(session, require_session::<R>));

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route("/status", get(handlers::session_status::<R>))
        .merge(authenticated)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{BootstrapAdminUseCase, RegisterInput, RegisterUseCase};
    use crate::domain::value_object::staff_role::StaffRole;
    use crate::testing::{InMemoryAuthStore, test_config};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    const ADMIN_PASSWORD: &str = "Sala-Kinesica-2024";

    async fn app() -> (Router, Arc<InMemoryAuthStore>) {
        let repo = Arc::new(InMemoryAuthStore::new());
        let config = test_config();
        BootstrapAdminUseCase::new(repo.clone(), config.clone())
            .execute("11.111.111-1", ADMIN_PASSWORD)
            .await
            .unwrap();
        (auth_router(repo.clone(), config), repo)
    }

    fn json(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn login(app: &Router, rut: &str, password: &str) -> String {
        let response = app
            .clone()
            .oneshot(json(
                "POST",
                "/login",
                serde_json::json!({ "rut": rut, "password": password }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::SET_COOKIE));
        body_json(response).await["token"].as_str().unwrap().to_string()
    }

    fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_then_login_with_other_format() {
        let (app, _repo) = app().await;

        let response = app
            .clone()
            .oneshot(json(
                "POST",
                "/register",
                serde_json::json!({
                    "rut": "19.976.194-3",
                    "firstName": "Camila",
                    "lastName": "Rojas",
                    "password": "Ultrasonido-Terapeutico",
                    "passwordConfirm": "Ultrasonido-Terapeutico"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["rut"], "19976194-3");
        assert_eq!(body["role"], "medical");

        let token = login(&app, "199761943", "Ultrasonido-Terapeutico").await;
        let response = app.clone().oneshot(authed("GET", "/me", &token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let me = body_json(response).await;
        assert_eq!(me["rutFormatted"], "19.976.194-3");
        assert_eq!(me["roleLabel"], "Cuerpo médico");
    }

    #[tokio::test]
    async fn test_invalid_rut_is_field_scoped() {
        let (app, _repo) = app().await;
        let response = app
            .oneshot(json(
                "POST",
                "/login",
                serde_json::json!({ "rut": "12.345.678-9", "password": "whatever-pass" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["field"], "rut");
    }

    #[tokio::test]
    async fn test_me_requires_session() {
        let (app, _repo) = app().await;
        let response = app
            .clone()
            .oneshot(Request::get("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app.oneshot(authed("GET", "/me", "forged.token")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_cookie_session_and_logout() {
        let (app, repo) = app().await;
        let token = login(&app, "11111111-1", ADMIN_PASSWORD).await;

        let with_cookie = |uri: &str, method: &str| {
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::COOKIE, format!("clinic_session={token}"))
                .body(Body::empty())
                .unwrap()
        };

        let response = app.clone().oneshot(with_cookie("/status", "GET")).await.unwrap();
        assert_eq!(body_json(response).await["authenticated"], true);

        let response = app.clone().oneshot(with_cookie("/logout", "POST")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(repo.session_count(), 0);

        let response = app.oneshot(with_cookie("/status", "GET")).await.unwrap();
        assert_eq!(body_json(response).await["authenticated"], false);
    }

    #[tokio::test]
    async fn test_account_admin_routes_are_gated() {
        let (app, repo) = app().await;
        RegisterUseCase::new(repo.clone(), test_config())
            .execute_by_admin(
                RegisterInput {
                    rut: "7654321-6".into(),
                    first_name: "Jorge".into(),
                    last_name: "Díaz".into(),
                    email: None,
                    password: "Pizarra-Tactica-44".into(),
                    password_confirm: "Pizarra-Tactica-44".into(),
                    phone: None,
                    position: Some("Director técnico".into()),
                },
                StaffRole::Technical,
            )
            .await
            .unwrap();

        let coach = login(&app, "7.654.321-6", "Pizarra-Tactica-44").await;
        let response = app.clone().oneshot(authed("GET", "/accounts", &coach)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let admin = login(&app, "11111111-1", ADMIN_PASSWORD).await;
        let response = app.clone().oneshot(authed("GET", "/accounts", &admin)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);
    }
}

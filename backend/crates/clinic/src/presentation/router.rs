//! Clinic Router

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use platform::storage::FileStore;
use std::sync::Arc;

use crate::application::config::ClinicConfig;
use crate::domain::repository::ClinicStore;
use crate::presentation::handlers::{
    self, ClinicAppState, checklists, divisions, injuries, matches, medical_files, players,
    treatments,
};

/// Build the clinic router, meant to be nested under `/api` behind the
/// session middleware
pub fn clinic_router<R: ClinicStore>(
    repo: Arc<R>,
    files: FileStore,
    config: Arc<ClinicConfig>,
) -> Router {
    let body_limit = config.multipart_body_limit();
    let state = ClinicAppState {
        repo,
        files,
        config,
    };

    let uploads = Router::new()
        .route(
            "/players/{id}/photo",
            get(players::photo::<R>).post(players::upload_photo::<R>),
        )
        .route(
            "/medical-files",
            get(medical_files::list::<R>).post(medical_files::upload::<R>),
        )
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .route("/choices", get(handlers::choices))
        .route(
            "/divisions",
            get(divisions::list::<R>).post(divisions::create::<R>),
        )
        .route(
            "/divisions/{id}",
            get(divisions::get::<R>)
                .patch(divisions::rename::<R>)
                .delete(divisions::delete::<R>),
        )
        .route("/players", get(players::list::<R>).post(players::create::<R>))
        .route(
            "/players/{id}",
            get(players::get::<R>)
                .patch(players::update::<R>)
                .delete(players::delete::<R>),
        )
        .route(
            "/treatments",
            get(treatments::list::<R>).post(treatments::create::<R>),
        )
        .route(
            "/treatments/{id}",
            get(treatments::get::<R>)
                .patch(treatments::update::<R>)
                .delete(treatments::delete::<R>),
        )
        .route("/injuries", get(injuries::list::<R>).post(injuries::create::<R>))
        .route(
            "/injuries/{id}",
            get(injuries::get::<R>)
                .patch(injuries::update::<R>)
                .delete(injuries::delete::<R>),
        )
        .route("/injuries/{id}/finish", post(injuries::finish::<R>))
        .route(
            "/injuries/{id}/daily-status",
            get(injuries::daily_history::<R>).post(injuries::record_daily_status::<R>),
        )
        .route(
            "/medical-files/{id}",
            get(medical_files::get::<R>).delete(medical_files::delete::<R>),
        )
        .route(
            "/medical-files/{id}/download",
            get(medical_files::download::<R>),
        )
        .route("/matches", get(matches::list::<R>).post(matches::create::<R>))
        .route(
            "/matches/{id}",
            get(matches::get::<R>)
                .patch(matches::update::<R>)
                .delete(matches::delete::<R>),
        )
        .route(
            "/matches/{id}/call-ups",
            get(matches::call_ups::<R>).put(matches::set_call_ups::<R>),
        )
        .route(
            "/checklists",
            get(checklists::list::<R>).post(checklists::create::<R>),
        )
        .route(
            "/checklists/{id}",
            get(checklists::get::<R>)
                .put(checklists::replace::<R>)
                .delete(checklists::delete::<R>),
        )
        .merge(uploads)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryClinicStore, coach, medic, test_config, test_files};
    use auth::CurrentUser;
    use axum::Extension;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct TestApp {
        _tmp: tempfile::TempDir,
        repo: Arc<InMemoryClinicStore>,
        files: FileStore,
    }

    impl TestApp {
        async fn new() -> Self {
            let (tmp, files) = test_files().await;
            Self {
                _tmp: tmp,
                repo: Arc::new(InMemoryClinicStore::new()),
                files,
            }
        }

        /// Router as seen by `user`, in place of the session middleware
        fn as_user(&self, user: CurrentUser) -> Router {
            self.anonymous().layer(Extension(user))
        }

        fn anonymous(&self) -> Router {
            clinic_router(self.repo.clone(), self.files.clone(), test_config())
        }
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn player_body(rut: &str) -> Value {
        json!({
            "rut": rut,
            "firstNames": "Matías Ignacio",
            "lastNames": "Fuentes Soto",
            "birthDate": "2001-03-15",
            "laterality": "left",
            "weightKg": 74.5,
            "heightCm": 181,
            "healthInsurance": "isapre"
        })
    }

    async fn create_player(app: &Router, rut: &str) -> String {
        let (status, body) = send(app, json_request("POST", "/players", player_body(rut))).await;
        assert_eq!(status, StatusCode::CREATED);
        body["playerId"].as_str().unwrap().to_string()
    }

    fn multipart_request(uri: &str, fields: &[(&str, &str)], file: (&str, &str, &[u8])) -> Request<Body> {
        const BOUNDARY: &str = "clinic-test-boundary";
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        let (field, file_name, bytes) = file;
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_requires_current_user() {
        let app = TestApp::new().await;
        let response = app.anonymous().oneshot(get_request("/players")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_player_lifecycle() {
        let app = TestApp::new().await;
        let medic = app.as_user(medic());

        let (status, created) =
            send(&medic, json_request("POST", "/players", player_body("19.976.194-3"))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["rut"], "19976194-3");
        assert_eq!(created["rutFormatted"], "19.976.194-3");
        assert_eq!(created["recordNumber"], "0001");
        assert_eq!(created["nationality"], "Chilena");
        assert_eq!(created["lateralityLabel"], "Zurdo");
        assert!(created["age"].as_i64().unwrap() >= 24);
        let id = created["playerId"].as_str().unwrap();

        let (status, body) =
            send(&medic, json_request("POST", "/players", player_body("199761943"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["field"], "rut");

        let (status, updated) = send(
            &medic,
            json_request("PATCH", &format!("/players/{id}"), json!({ "weightKg": null })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["weightKg"], Value::Null);
        assert_eq!(updated["heightCm"], 181);

        let coach = app.as_user(coach());
        let (status, list) = send(&coach, get_request("/players?search=fuentes&active=true")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let request = Request::delete(format!("/players/{id}")).body(Body::empty()).unwrap();
        let (status, _) = send(&coach, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let request = Request::delete(format!("/players/{id}")).body(Body::empty()).unwrap();
        let (status, _) = send(&medic, request).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_invalid_rut_is_field_scoped() {
        let app = TestApp::new().await;
        let (status, body) = send(
            &app.as_user(medic()),
            json_request("POST", "/players", player_body("12.345.678-9")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "rut");
    }

    #[tokio::test]
    async fn test_checklist_rules_over_http() {
        let app = TestApp::new().await;
        let medic = app.as_user(medic());
        let called = create_player(&medic, "12345678-5").await;
        let benched = create_player(&medic, "7654321-6").await;

        let (status, game) = send(
            &medic,
            json_request(
                "POST",
                "/matches",
                json!({
                    "date": "2025-07-06",
                    "opponent": "Santiago Morning",
                    "venue": "home",
                    "callUps": [called]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(game["venueLabel"], "Local");
        let match_id = game["matchId"].as_str().unwrap();

        let checklist = |player: &str| {
            json_request(
                "POST",
                "/checklists",
                json!({
                    "playerId": player,
                    "matchId": match_id,
                    "pain": false,
                    "painZone": "knee"
                }),
            )
        };

        let (status, body) = send(&medic, checklist(&benched)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "player");

        let (status, body) = send(&medic, checklist(&called)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["pain"], false);
        assert_eq!(body["painZone"], Value::Null);

        let (status, body) = send(&medic, checklist(&called)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["field"], "match");

        let (status, players) =
            send(&medic, get_request(&format!("/matches/{match_id}/call-ups"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(players[0]["playerId"], called);
    }

    #[tokio::test]
    async fn test_medical_file_upload_and_download() {
        let app = TestApp::new().await;
        let medic = app.as_user(medic());
        let player = create_player(&medic, "12345678-5").await;

        let request = multipart_request(
            "/medical-files",
            &[
                ("playerId", player.as_str()),
                ("kind", "report"),
                ("title", "Ecografía isquiotibial"),
                ("documentDate", "2025-05-02"),
            ],
            ("file", "eco final.pdf", &b"%PDF-1.4 test"[..]),
        );
        let (status, uploaded) = send(&medic, request).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(uploaded["kindLabel"], "Informe Médico");
        assert_eq!(uploaded["fileName"], "eco_final.pdf");
        assert_eq!(uploaded["sizeBytes"], 13);

        let url = uploaded["downloadUrl"].as_str().unwrap().trim_start_matches("/api");
        let response = app
            .as_user(coach())
            .oneshot(get_request(url))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.4 test");

        let request = multipart_request(
            "/medical-files",
            &[("playerId", player.as_str()), ("kind", "xray"), ("title", "RX")],
            ("file", "rx.png", &b"png"[..]),
        );
        let (status, body) = send(&medic, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "kind");
    }

    #[tokio::test]
    async fn test_injury_finish_and_daily_status() {
        let app = TestApp::new().await;
        let medic = app.as_user(medic());
        let player = create_player(&medic, "12345678-5").await;
        let today = chrono::Utc::now().date_naive();
        let injured_on = today - chrono::Duration::days(4);

        let (status, injury) = send(
            &medic,
            json_request(
                "POST",
                "/injuries",
                json!({
                    "playerId": player,
                    "injuredOn": injured_on,
                    "diagnosis": "Desgarro grado I bíceps femoral",
                    "injuryType": "muscular",
                    "bodyRegion": "thigh_back_right",
                    "mechanism": "non_contact",
                    "condition": "acute",
                    "sportStage": "competition",
                    "severity": "moderate",
                    "estimatedRecoveryDays": 21
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(injury["daysRemaining"], 17);
        let id = injury["injuryId"].as_str().unwrap();

        let (status, entry) = send(
            &medic,
            json_request(
                "POST",
                &format!("/injuries/{id}/daily-status"),
                json!({ "phase": "gym" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(entry["phaseLabel"], "Gimnasio");

        let (status, finished) = send(
            &medic,
            json_request("POST", &format!("/injuries/{id}/finish"), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(finished["isActive"], false);
        assert_eq!(finished["actualRecoveryDays"], 4);
        assert_eq!(finished["daysRemaining"], "recovered");

        let (status, _) = send(
            &medic,
            json_request(
                "POST",
                &format!("/injuries/{id}/daily-status"),
                json!({ "phase": "reintegration" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let response = medic
            .clone()
            .oneshot(get_request(&format!("/injuries/{id}/daily-status")))
            .await
            .unwrap();
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_choices_are_public_to_any_role() {
        let app = TestApp::new().await;
        let (status, body) = send(&app.as_user(coach()), get_request("/choices")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dailyPhase"].as_array().unwrap().len(), 3);
    }
}

//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use auth::application::{BootstrapAdminUseCase, BootstrapOutcome};
use auth::domain::repository::AuthSessionRepository;
use auth::middleware::{AuthMiddlewareState, require_session};
use auth::{AuthConfig, AuthStore, PgAuthRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
    middleware::from_fn_with_state,
};
use clinic::{ClinicConfig, PgClinicRepository, clinic_router};
use kernel::rut::{RutConfig, RutValidator};
use platform::storage::FileStore;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Session secret from `SESSION_SECRET` (base64, 32 bytes); random in debug builds
fn auth_config(rut: RutValidator) -> anyhow::Result<AuthConfig> {
    let base = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        let secret_b64 =
            env::var("SESSION_SECRET").context("SESSION_SECRET must be set in production")?;
        AuthConfig {
            session_secret: platform::crypto::decode_key(&secret_b64)
                .context("invalid SESSION_SECRET")?,
            ..AuthConfig::default()
        }
    };
    Ok(AuthConfig { rut, ..base })
}

async fn bootstrap_admin<R: AuthStore>(repo: Arc<R>, config: Arc<AuthConfig>) {
    let (Ok(rut), Ok(password)) = (
        env::var("BOOTSTRAP_ADMIN_RUT"),
        env::var("BOOTSTRAP_ADMIN_PASSWORD"),
    ) else {
        return;
    };

    match BootstrapAdminUseCase::new(repo, config)
        .execute(&rut, &password)
        .await
    {
        Ok(BootstrapOutcome::Created) => tracing::info!("Initial admin account created"),
        Ok(BootstrapOutcome::Promoted) => tracing::info!("Initial admin account promoted"),
        Ok(BootstrapOutcome::Unchanged) => tracing::debug!("Initial admin already present"),
        Err(e) => tracing::warn!(error = %e, "Admin bootstrap failed, continuing anyway"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,clinic=info,kernel=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // One RUT validator for the whole process
    let rut = RutValidator::new(RutConfig {
        trace: env_flag("RUT_TRACE"),
        strict: env_flag("RUT_STRICT"),
    });

    let auth_repo = Arc::new(PgAuthRepository::new(pool.clone()));
    let auth_config = Arc::new(auth_config(rut.clone())?);

    // Startup cleanup: errors here should not prevent server startup
    match auth_repo.cleanup_expired_sessions().await {
        Ok(sessions) => {
            tracing::info!(
                sessions_deleted = sessions,
                "Auth session cleanup completed"
            );
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Auth session cleanup failed, continuing anyway"
            );
        }
    }

    bootstrap_admin(auth_repo.clone(), auth_config.clone()).await;

    // Clinic configuration and media storage
    let media_root = env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_string());
    let clinic_config = Arc::new(ClinicConfig {
        media_root: media_root.clone().into(),
        rut,
        ..ClinicConfig::default()
    });
    let files = FileStore::open(&media_root)
        .await
        .with_context(|| format!("cannot open media root {media_root}"))?;
    let clinic_repo = Arc::new(PgClinicRepository::new(pool.clone()));

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Every clinic route needs a session; role checks happen in the use cases
    let session_state = AuthMiddlewareState {
        repo: auth_repo.clone(),
        config: auth_config.clone(),
    };
    let clinic = clinic_router(clinic_repo, files, clinic_config).layer(from_fn_with_state(
        session_state,
        require_session::<PgAuthRepository>,
    ));

    // Build router
    let app = Router::new()
        .nest("/api/auth", auth_router(auth_repo, auth_config))
        .nest("/api", clinic)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:31113".to_string())
        .parse()
        .context("BIND_ADDR must be host:port")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use platform::cookie::{delete_cookie_header, extract_session_token, set_cookie_header};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CheckSessionUseCase, CurrentUser, LoginInput, LoginUseCase, LogoutUseCase,
    ManageAccountsUseCase, RegisterInput, RegisterUseCase, UpdateAccountInput,
};
use crate::domain::repository::AuthStore;
use crate::domain::value_object::public_id::PublicId;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AccountResponse, AdminRegisterRequest, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse, SessionStatusResponse, UpdateAccountRequest,
};
use crate::presentation::middleware::Client;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R: AuthStore> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)> {
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(RegisterInput {
            rut: req.rut,
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
            password_confirm: req.password_confirm,
            phone: None,
            position: None,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            public_id: output.public_id.to_string(),
            rut: output.rut,
            role: output.role,
        }),
    ))
}

/// POST /api/auth/accounts (admin)
pub async fn register_by_admin<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    user: CurrentUser,
    Json(req): Json<AdminRegisterRequest>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)> {
    user.ensure_admin()?;
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute_by_admin(
            RegisterInput {
                rut: req.rut,
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                password: req.password,
                password_confirm: req.password_confirm,
                phone: req.phone,
                position: req.position,
            },
            req.role,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            public_id: output.public_id.to_string(),
            rut: output.rut,
            role: output.role,
        }),
    ))
}

// ============================================================================
// Login / Logout
// ============================================================================

/// POST /api/auth/login
///
/// Returns the token in the body (bearer clients) and sets it as cookie.
pub async fn login<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    Client(client): Client,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Response> {
    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case
        .execute(
            LoginInput {
                rut: req.rut,
                password: req.password,
            },
            client,
        )
        .await?;

    let body = Json(LoginResponse {
        token: output.session_token.clone(),
        token_type: "Bearer",
        expires_in: output.expires_in_secs,
        public_id: output.public_id.to_string(),
        role: output.role,
    });

    match set_cookie_header(&state.config.cookie(), &output.session_token) {
        Some(cookie) => Ok(([(header::SET_COOKIE, cookie)], body).into_response()),
        None => Ok(body.into_response()),
    }
}

/// POST /api/auth/logout
pub async fn logout<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Response> {
    if let Some(token) = extract_session_token(&headers, &state.config.session_cookie_name) {
        LogoutUseCase::new(state.repo.clone(), state.config.clone())
            .execute(&token)
            .await?;
    }

    let status = StatusCode::NO_CONTENT;
    match delete_cookie_header(&state.config.cookie()) {
        Some(cookie) => Ok((status, [(header::SET_COOKIE, cookie)]).into_response()),
        None => Ok(status.into_response()),
    }
}

// ============================================================================
// Session
// ============================================================================

/// GET /api/auth/status
///
/// Never fails: an invalid session is reported as `authenticated: false`.
pub async fn session_status<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> Json<SessionStatusResponse> {
    let Some(token) = extract_session_token(&headers, &state.config.session_cookie_name) else {
        return Json(SessionStatusResponse::anonymous());
    };

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());
    match use_case.execute(&token).await {
        Ok(ctx) => Json(SessionStatusResponse {
            authenticated: true,
            public_id: Some(ctx.account.public_id.to_string()),
            role: Some(ctx.account.role),
            expires_at: Some(ctx.session.expires_at),
        }),
        Err(_) => Json(SessionStatusResponse::anonymous()),
    }
}

/// GET /api/auth/me
pub async fn me<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    user: CurrentUser,
) -> AuthResult<Json<AccountResponse>> {
    let account = state
        .repo
        .find_account_by_id(&user.account_id)
        .await?
        .ok_or(AuthError::SessionInvalid)?;

    Ok(Json(AccountResponse::from(&account)))
}

// ============================================================================
// Account administration
// ============================================================================

/// GET /api/auth/accounts
pub async fn list_accounts<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    user: CurrentUser,
) -> AuthResult<Json<Vec<AccountResponse>>> {
    let accounts = ManageAccountsUseCase::new(state.repo.clone()).list(&user).await?;
    Ok(Json(accounts.iter().map(AccountResponse::from).collect()))
}

/// GET /api/auth/accounts/{public_id}
pub async fn get_account<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    user: CurrentUser,
    Path(public_id): Path<String>,
) -> AuthResult<Json<AccountResponse>> {
    let public_id = PublicId::parse_str(&public_id)?;
    let account = ManageAccountsUseCase::new(state.repo.clone())
        .get(&user, &public_id)
        .await?;
    Ok(Json(AccountResponse::from(&account)))
}

/// PATCH /api/auth/accounts/{public_id}
pub async fn update_account<R: AuthStore>(
    State(state): State<AuthAppState<R>>,
    user: CurrentUser,
    Path(public_id): Path<String>,
    Json(req): Json<UpdateAccountRequest>,
) -> AuthResult<Json<AccountResponse>> {
    let public_id = PublicId::parse_str(&public_id)?;
    let account = ManageAccountsUseCase::new(state.repo.clone())
        .update(
            &user,
            &public_id,
            UpdateAccountInput {
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                phone: req.phone,
                position: req.position,
                role: req.role,
                status: req.status,
            },
        )
        .await?;
    Ok(Json(AccountResponse::from(&account)))
}

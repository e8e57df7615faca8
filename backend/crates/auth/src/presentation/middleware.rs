//! Auth Middleware
//!
//! `require_session` resolves the bearer token (or session cookie) to a
//! [`CurrentUser`] and stores it in the request extensions. The role gates
//! run after it and read that extension.

use axum::extract::{ConnectInfo, FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::client::ClientInfo;
use platform::cookie::extract_session_token;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{CheckSessionUseCase, CurrentUser};
use crate::domain::repository::AuthStore;
use crate::error::AuthError;

#[derive(Clone)]
pub struct AuthMiddlewareState<R: AuthStore> {
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// Reject the request unless it carries a valid session
pub async fn require_session<R: AuthStore>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_session_token(req.headers(), &state.config.session_cookie_name)
    else {
        return AuthError::SessionInvalid.into_response();
    };

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());
    match use_case.execute(&token).await {
        Ok(ctx) => {
            req.extensions_mut().insert(ctx.current_user());
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

/// Only Admin and Medical may modify clinical data
pub async fn require_write(req: Request, next: Next) -> Response {
    match req.extensions().get::<CurrentUser>() {
        Some(user) if user.can_write() => next.run(req).await,
        Some(_) => AuthError::InsufficientRole.into_response(),
        None => AuthError::SessionInvalid.into_response(),
    }
}

/// Only Admin may manage accounts
pub async fn require_admin(req: Request, next: Next) -> Response {
    match req.extensions().get::<CurrentUser>() {
        Some(user) if user.is_admin() => next.run(req).await,
        Some(_) => AuthError::InsufficientRole.into_response(),
        None => AuthError::SessionInvalid.into_response(),
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::SessionInvalid)
    }
}

/// Client IP and User-Agent of the request
///
/// Works with or without `ConnectInfo` (tests and unix sockets have none).
pub struct Client(pub ClientInfo);

impl<S> FromRequestParts<S> for Client
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let direct_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());
        Ok(Client(ClientInfo::from_headers(&parts.headers, direct_ip)))
    }
}

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use auth::CurrentUser;
use kernel::id::DivisionId;

use super::ClinicAppState;
use crate::application::divisions::DivisionsUseCase;
use crate::domain::repository::ClinicStore;
use crate::error::ClinicResult;
use crate::presentation::dto::{DivisionRequest, DivisionResponse};

/// GET /api/divisions
pub async fn list<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
) -> ClinicResult<Json<Vec<DivisionResponse>>> {
    let divisions = DivisionsUseCase::new(state.repo).list(&user).await?;
    Ok(Json(divisions.iter().map(DivisionResponse::from).collect()))
}

/// GET /api/divisions/{id}
pub async fn get<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<DivisionId>,
) -> ClinicResult<Json<DivisionResponse>> {
    let division = DivisionsUseCase::new(state.repo).get(&user, &id).await?;
    Ok(Json(DivisionResponse::from(&division)))
}

/// POST /api/divisions
pub async fn create<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Json(req): Json<DivisionRequest>,
) -> ClinicResult<(StatusCode, Json<DivisionResponse>)> {
    let division = DivisionsUseCase::new(state.repo)
        .create(&user, &req.name)
        .await?;
    Ok((StatusCode::CREATED, Json(DivisionResponse::from(&division))))
}

/// PATCH /api/divisions/{id}
pub async fn rename<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<DivisionId>,
    Json(req): Json<DivisionRequest>,
) -> ClinicResult<Json<DivisionResponse>> {
    let division = DivisionsUseCase::new(state.repo)
        .rename(&user, &id, &req.name)
        .await?;
    Ok(Json(DivisionResponse::from(&division)))
}

/// DELETE /api/divisions/{id}
pub async fn delete<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<DivisionId>,
) -> ClinicResult<StatusCode> {
    DivisionsUseCase::new(state.repo).delete(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

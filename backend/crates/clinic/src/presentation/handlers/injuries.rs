use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use auth::CurrentUser;
use kernel::id::InjuryId;

use super::ClinicAppState;
use crate::application::injuries::InjuriesUseCase;
use crate::domain::repository::ClinicStore;
use crate::error::ClinicResult;
use crate::presentation::dto::{
    CreateInjuryRequest, DailyStatusRequest, DailyStatusResponse, FinishInjuryRequest,
    InjuryQuery, InjuryResponse, UpdateInjuryRequest,
};

/// GET /api/injuries?playerId=&injuryType=&active=
pub async fn list<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Query(query): Query<InjuryQuery>,
) -> ClinicResult<Json<Vec<InjuryResponse>>> {
    let injuries = InjuriesUseCase::new(state.repo)
        .list(&user, &query.into())
        .await?;
    Ok(Json(injuries.iter().map(InjuryResponse::from).collect()))
}

/// GET /api/injuries/{id}
pub async fn get<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<InjuryId>,
) -> ClinicResult<Json<InjuryResponse>> {
    let injury = InjuriesUseCase::new(state.repo).get(&user, &id).await?;
    Ok(Json(InjuryResponse::from(&injury)))
}

/// POST /api/injuries
pub async fn create<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Json(req): Json<CreateInjuryRequest>,
) -> ClinicResult<(StatusCode, Json<InjuryResponse>)> {
    let injury = InjuriesUseCase::new(state.repo)
        .create(&user, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(InjuryResponse::from(&injury))))
}

/// PATCH /api/injuries/{id}
pub async fn update<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<InjuryId>,
    Json(req): Json<UpdateInjuryRequest>,
) -> ClinicResult<Json<InjuryResponse>> {
    let injury = InjuriesUseCase::new(state.repo)
        .update(&user, &id, req.into())
        .await?;
    Ok(Json(InjuryResponse::from(&injury)))
}

/// POST /api/injuries/{id}/finish
pub async fn finish<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<InjuryId>,
    Json(req): Json<FinishInjuryRequest>,
) -> ClinicResult<Json<InjuryResponse>> {
    let injury = InjuriesUseCase::new(state.repo)
        .finish(&user, &id, req.into())
        .await?;
    Ok(Json(InjuryResponse::from(&injury)))
}

/// DELETE /api/injuries/{id}
pub async fn delete<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<InjuryId>,
) -> ClinicResult<StatusCode> {
    InjuriesUseCase::new(state.repo).delete(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/injuries/{id}/daily-status
pub async fn daily_history<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<InjuryId>,
) -> ClinicResult<Json<Vec<DailyStatusResponse>>> {
    let history = InjuriesUseCase::new(state.repo)
        .daily_history(&user, &id)
        .await?;
    Ok(Json(history.iter().map(DailyStatusResponse::from).collect()))
}

/// POST /api/injuries/{id}/daily-status
pub async fn record_daily_status<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<InjuryId>,
    Json(req): Json<DailyStatusRequest>,
) -> ClinicResult<(StatusCode, Json<DailyStatusResponse>)> {
    let status = InjuriesUseCase::new(state.repo)
        .record_daily_status(&user, &id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(DailyStatusResponse::from(&status))))
}

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use auth::CurrentUser;
use kernel::id::TreatmentId;

use super::ClinicAppState;
use crate::application::treatments::TreatmentsUseCase;
use crate::domain::repository::ClinicStore;
use crate::error::ClinicResult;
use crate::presentation::dto::{
    CreateTreatmentRequest, TreatmentQuery, TreatmentResponse, UpdateTreatmentRequest,
};

/// GET /api/treatments?playerId=&professionalId=&status=
pub async fn list<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Query(query): Query<TreatmentQuery>,
) -> ClinicResult<Json<Vec<TreatmentResponse>>> {
    let treatments = TreatmentsUseCase::new(state.repo)
        .list(&user, &query.into())
        .await?;
    Ok(Json(treatments.iter().map(TreatmentResponse::from).collect()))
}

/// GET /api/treatments/{id}
pub async fn get<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<TreatmentId>,
) -> ClinicResult<Json<TreatmentResponse>> {
    let treatment = TreatmentsUseCase::new(state.repo).get(&user, &id).await?;
    Ok(Json(TreatmentResponse::from(&treatment)))
}

/// POST /api/treatments
pub async fn create<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Json(req): Json<CreateTreatmentRequest>,
) -> ClinicResult<(StatusCode, Json<TreatmentResponse>)> {
    let treatment = TreatmentsUseCase::new(state.repo)
        .create(&user, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(TreatmentResponse::from(&treatment))))
}

/// PATCH /api/treatments/{id}
pub async fn update<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<TreatmentId>,
    Json(req): Json<UpdateTreatmentRequest>,
) -> ClinicResult<Json<TreatmentResponse>> {
    let treatment = TreatmentsUseCase::new(state.repo)
        .update(&user, &id, req.into())
        .await?;
    Ok(Json(TreatmentResponse::from(&treatment)))
}

/// DELETE /api/treatments/{id}
pub async fn delete<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<TreatmentId>,
) -> ClinicResult<StatusCode> {
    TreatmentsUseCase::new(state.repo).delete(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

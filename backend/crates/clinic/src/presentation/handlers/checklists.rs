use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use auth::CurrentUser;
use kernel::id::ChecklistId;

use super::ClinicAppState;
use crate::application::checklists::{ChecklistInput, ChecklistsUseCase};
use crate::domain::repository::ClinicStore;
use crate::error::ClinicResult;
use crate::presentation::dto::{
    ChecklistContentRequest, ChecklistQuery, ChecklistResponse, CreateChecklistRequest,
};

/// GET /api/checklists?playerId=&matchId=&pain=
pub async fn list<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Query(query): Query<ChecklistQuery>,
) -> ClinicResult<Json<Vec<ChecklistResponse>>> {
    let checklists = ChecklistsUseCase::new(state.repo)
        .list(&user, &query.into())
        .await?;
    Ok(Json(checklists.iter().map(ChecklistResponse::from).collect()))
}

/// GET /api/checklists/{id}
pub async fn get<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<ChecklistId>,
) -> ClinicResult<Json<ChecklistResponse>> {
    let checklist = ChecklistsUseCase::new(state.repo).get(&user, &id).await?;
    Ok(Json(ChecklistResponse::from(&checklist)))
}

/// POST /api/checklists
pub async fn create<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Json(req): Json<CreateChecklistRequest>,
) -> ClinicResult<(StatusCode, Json<ChecklistResponse>)> {
    let input = ChecklistInput {
        player_id: req.player_id,
        match_id: req.match_id,
        content: req.content.into(),
    };
    let checklist = ChecklistsUseCase::new(state.repo).create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(ChecklistResponse::from(&checklist))))
}

/// PUT /api/checklists/{id}
pub async fn replace<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<ChecklistId>,
    Json(req): Json<ChecklistContentRequest>,
) -> ClinicResult<Json<ChecklistResponse>> {
    let checklist = ChecklistsUseCase::new(state.repo)
        .update(&user, &id, req.into())
        .await?;
    Ok(Json(ChecklistResponse::from(&checklist)))
}

/// DELETE /api/checklists/{id}
pub async fn delete<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<ChecklistId>,
) -> ClinicResult<StatusCode> {
    ChecklistsUseCase::new(state.repo).delete(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use auth::CurrentUser;
use kernel::id::MatchId;

use super::ClinicAppState;
use crate::application::matches::MatchesUseCase;
use crate::domain::repository::ClinicStore;
use crate::error::ClinicResult;
use crate::presentation::dto::{
    CallUpsRequest, CreateMatchRequest, MatchQuery, MatchResponse, PlayerResponse,
    UpdateMatchRequest,
};

fn use_case<R: ClinicStore>(state: ClinicAppState<R>) -> MatchesUseCase<R> {
    MatchesUseCase::new(state.repo, state.config)
}

/// GET /api/matches?from=&to=
pub async fn list<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Query(query): Query<MatchQuery>,
) -> ClinicResult<Json<Vec<MatchResponse>>> {
    let matches = use_case(state).list(&user, &query.into()).await?;
    Ok(Json(matches.iter().map(MatchResponse::from).collect()))
}

/// GET /api/matches/{id}
pub async fn get<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<MatchId>,
) -> ClinicResult<Json<MatchResponse>> {
    let m = use_case(state).get(&user, &id).await?;
    Ok(Json(MatchResponse::from(&m)))
}

/// POST /api/matches
pub async fn create<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Json(req): Json<CreateMatchRequest>,
) -> ClinicResult<(StatusCode, Json<MatchResponse>)> {
    let m = use_case(state).create(&user, req.into()).await?;
    Ok((StatusCode::CREATED, Json(MatchResponse::from(&m))))
}

/// PATCH /api/matches/{id}
pub async fn update<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<MatchId>,
    Json(req): Json<UpdateMatchRequest>,
) -> ClinicResult<Json<MatchResponse>> {
    let m = use_case(state).update(&user, &id, req.into()).await?;
    Ok(Json(MatchResponse::from(&m)))
}

/// DELETE /api/matches/{id}
pub async fn delete<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<MatchId>,
) -> ClinicResult<StatusCode> {
    use_case(state).delete(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/matches/{id}/call-ups
pub async fn call_ups<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<MatchId>,
) -> ClinicResult<Json<Vec<PlayerResponse>>> {
    let players = use_case(state).call_ups(&user, &id).await?;
    Ok(Json(players.iter().map(PlayerResponse::from).collect()))
}

/// PUT /api/matches/{id}/call-ups
pub async fn set_call_ups<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<MatchId>,
    Json(req): Json<CallUpsRequest>,
) -> ClinicResult<Json<MatchResponse>> {
    let m = use_case(state)
        .set_call_ups(&user, &id, req.player_ids)
        .await?;
    Ok(Json(MatchResponse::from(&m)))
}

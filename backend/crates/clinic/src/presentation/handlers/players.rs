use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use auth::CurrentUser;
use kernel::id::PlayerId;

use super::{ClinicAppState, MultipartForm, file_response};
use crate::application::players::PlayersUseCase;
use crate::domain::repository::ClinicStore;
use crate::error::ClinicResult;
use crate::presentation::dto::{
    CreatePlayerRequest, PlayerQuery, PlayerResponse, UpdatePlayerRequest,
};

fn use_case<R: ClinicStore>(state: ClinicAppState<R>) -> PlayersUseCase<R> {
    PlayersUseCase::new(state.repo, state.files, state.config)
}

/// GET /api/players?divisionId=&active=&search=
pub async fn list<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Query(query): Query<PlayerQuery>,
) -> ClinicResult<Json<Vec<PlayerResponse>>> {
    let players = use_case(state).list(&user, &query.into()).await?;
    Ok(Json(players.iter().map(PlayerResponse::from).collect()))
}

/// GET /api/players/{id}
pub async fn get<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<PlayerId>,
) -> ClinicResult<Json<PlayerResponse>> {
    let player = use_case(state).get(&user, &id).await?;
    Ok(Json(PlayerResponse::from(&player)))
}

/// POST /api/players
pub async fn create<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Json(req): Json<CreatePlayerRequest>,
) -> ClinicResult<(StatusCode, Json<PlayerResponse>)> {
    let player = use_case(state).create(&user, req.into()).await?;
    Ok((StatusCode::CREATED, Json(PlayerResponse::from(&player))))
}

/// PATCH /api/players/{id}
pub async fn update<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<PlayerId>,
    Json(req): Json<UpdatePlayerRequest>,
) -> ClinicResult<Json<PlayerResponse>> {
    let player = use_case(state).update(&user, &id, req.into()).await?;
    Ok(Json(PlayerResponse::from(&player)))
}

/// DELETE /api/players/{id}
pub async fn delete<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<PlayerId>,
) -> ClinicResult<StatusCode> {
    use_case(state).delete(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/players/{id}/photo (multipart, field `photo`)
pub async fn upload_photo<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<PlayerId>,
    multipart: Multipart,
) -> ClinicResult<Json<PlayerResponse>> {
    let mut form = MultipartForm::read(multipart, "photo", &state.config).await?;
    let photo = form.take_file("photo")?;
    let player = use_case(state).upload_photo(&user, &id, photo).await?;
    Ok(Json(PlayerResponse::from(&player)))
}

/// GET /api/players/{id}/photo
pub async fn photo<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<PlayerId>,
) -> ClinicResult<Response> {
    let content = use_case(state).photo(&user, &id).await?;
    Ok(file_response(content))
}

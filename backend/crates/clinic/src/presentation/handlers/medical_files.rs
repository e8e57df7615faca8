use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use auth::CurrentUser;
use chrono::NaiveDate;
use kernel::id::{MedicalFileId, PlayerId};

use super::{ClinicAppState, MultipartForm, file_response};
use crate::application::medical_files::{MedicalFileInput, MedicalFilesUseCase};
use crate::domain::choices::FileKind;
use crate::domain::repository::ClinicStore;
use crate::error::{ClinicError, ClinicResult};
use crate::presentation::dto::{MedicalFileQuery, MedicalFileResponse};

fn use_case<R: ClinicStore>(state: ClinicAppState<R>) -> MedicalFilesUseCase<R> {
    MedicalFilesUseCase::new(state.repo, state.files, state.config)
}

/// GET /api/medical-files?playerId=&kind=
pub async fn list<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Query(query): Query<MedicalFileQuery>,
) -> ClinicResult<Json<Vec<MedicalFileResponse>>> {
    let files = use_case(state).list(&user, &query.into()).await?;
    Ok(Json(files.iter().map(MedicalFileResponse::from).collect()))
}

/// GET /api/medical-files/{id}
pub async fn get<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<MedicalFileId>,
) -> ClinicResult<Json<MedicalFileResponse>> {
    let file = use_case(state).get(&user, &id).await?;
    Ok(Json(MedicalFileResponse::from(&file)))
}

/// POST /api/medical-files
///
/// Multipart fields: `playerId`, `kind`, `title`, `documentDate`
/// (`YYYY-MM-DD`, optional), `notes` (optional) and the `file` part.
pub async fn upload<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    multipart: Multipart,
) -> ClinicResult<(StatusCode, Json<MedicalFileResponse>)> {
    let mut form = MultipartForm::read(multipart, "file", &state.config).await?;

    let player_id: PlayerId = form
        .text("playerId")
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| ClinicError::invalid("playerId", "A valid player is required"))?;
    let kind = form
        .text("kind")
        .and_then(FileKind::from_code)
        .ok_or_else(|| ClinicError::invalid("kind", "Unknown file kind"))?;
    let document_date = form
        .text("documentDate")
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d")
                .map_err(|_| ClinicError::invalid("documentDate", "Expected a YYYY-MM-DD date"))
        })
        .transpose()?;
    let input = MedicalFileInput {
        player_id,
        kind,
        title: form.text("title").unwrap_or_default().to_string(),
        document_date,
        notes: form.text("notes").map(str::to_string),
        file: form.take_file("file")?,
    };

    let file = use_case(state).upload(&user, input).await?;
    Ok((StatusCode::CREATED, Json(MedicalFileResponse::from(&file))))
}

/// GET /api/medical-files/{id}/download
pub async fn download<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<MedicalFileId>,
) -> ClinicResult<Response> {
    let content = use_case(state).download(&user, &id).await?;
    Ok(file_response(content))
}

/// DELETE /api/medical-files/{id}
pub async fn delete<R: ClinicStore>(
    State(state): State<ClinicAppState<R>>,
    user: CurrentUser,
    Path(id): Path<MedicalFileId>,
) -> ClinicResult<StatusCode> {
    use_case(state).delete(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

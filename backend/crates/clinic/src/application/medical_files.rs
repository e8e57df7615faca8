//! Medical File Use Cases
//!
//! Attachments are written to the file store first and recorded second; a
//! failed insert removes the orphaned file again.

use std::sync::Arc;

use auth::CurrentUser;
use chrono::{NaiveDate, Utc};
use kernel::id::{MedicalFileId, PlayerId};
use platform::storage::FileStore;

use crate::application::config::ClinicConfig;
use crate::application::players::FileContent;
use crate::application::upload::UploadedFile;
use crate::domain::choices::FileKind;
use crate::domain::entity::medical_file::MedicalFile;
use crate::domain::repository::{ClinicStore, MedicalFileFilter};
use crate::domain::text::{self, LONG_TEXT};
use crate::error::{ClinicError, ClinicResult};

const MAX_TITLE_LEN: usize = 255;

#[derive(Debug, Clone)]
pub struct MedicalFileInput {
    pub player_id: PlayerId,
    pub kind: FileKind,
    pub title: String,
    /// Defaults to today
    pub document_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub file: UploadedFile,
}

pub struct MedicalFilesUseCase<R: ClinicStore> {
    repo: Arc<R>,
    files: FileStore,
    config: Arc<ClinicConfig>,
}

impl<R: ClinicStore> MedicalFilesUseCase<R> {
    pub fn new(repo: Arc<R>, files: FileStore, config: Arc<ClinicConfig>) -> Self {
        Self {
            repo,
            files,
            config,
        }
    }

    pub async fn list(
        &self,
        _actor: &CurrentUser,
        filter: &MedicalFileFilter,
    ) -> ClinicResult<Vec<MedicalFile>> {
        self.repo.list_medical_files(filter).await
    }

    pub async fn get(&self, _actor: &CurrentUser, id: &MedicalFileId) -> ClinicResult<MedicalFile> {
        self.find(id).await
    }

    pub async fn upload(
        &self,
        actor: &CurrentUser,
        input: MedicalFileInput,
    ) -> ClinicResult<MedicalFile> {
        actor.ensure_can_write()?;
        input.file.check_size(self.config.max_upload_bytes)?;

        let title = text::required(&input.title, "title", MAX_TITLE_LEN)?;
        let notes = text::optional(input.notes.as_deref(), "notes", LONG_TEXT)?;
        let document_date = input.document_date.unwrap_or_else(|| Utc::now().date_naive());

        let player = self
            .repo
            .find_player(&input.player_id)
            .await?
            .ok_or_else(|| ClinicError::invalid("playerId", "Unknown player"))?;

        let stored_path = input.file.stored_path(&player.files_dir());
        self.files.write(&stored_path, &input.file.bytes).await?;

        let record = MedicalFile {
            file_id: MedicalFileId::new(),
            player_id: player.player_id,
            kind: input.kind,
            title,
            document_date,
            stored_path,
            original_name: input.file.sanitized_name(),
            size_bytes: input.file.bytes.len() as i64,
            notes,
            uploaded_by: Some(actor.account_id),
            created_at: Utc::now(),
        };
        if let Err(e) = self.repo.create_medical_file(&record).await {
            if let Err(cleanup) = self.files.delete(&record.stored_path).await {
                tracing::warn!(path = %record.stored_path, error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(e);
        }

        tracing::info!(
            file_id = %record.file_id,
            player_id = %record.player_id,
            kind = %record.kind,
            bytes = record.size_bytes,
            by = %actor.public_id,
            "Medical file uploaded"
        );
        Ok(record)
    }

    /// Stored bytes of an attachment
    pub async fn download(
        &self,
        _actor: &CurrentUser,
        id: &MedicalFileId,
    ) -> ClinicResult<FileContent> {
        let record = self.find(id).await?;
        let bytes = self.files.read(&record.stored_path).await?;
        Ok(FileContent {
            bytes,
            content_type: record.content_type(),
            file_name: record.original_name,
        })
    }

    pub async fn delete(&self, actor: &CurrentUser, id: &MedicalFileId) -> ClinicResult<()> {
        actor.ensure_can_write()?;
        let record = self.find(id).await?;
        self.repo.delete_medical_file(id).await?;

        // The record is gone; a file left behind is only logged
        match self.files.delete(&record.stored_path).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(path = %record.stored_path, "Stored file was already missing");
            }
            Err(e) => {
                tracing::warn!(
                    path = %record.stored_path,
                    error = %e,
                    "Failed to delete stored file"
                );
            }
        }
        tracing::info!(file_id = %id, by = %actor.public_id, "Medical file deleted");
        Ok(())
    }

    async fn find(&self, id: &MedicalFileId) -> ClinicResult<MedicalFile> {
        self.repo
            .find_medical_file(id)
            .await?
            .ok_or(ClinicError::NotFound("Medical file"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::players::{PlayerInput, PlayersUseCase};
    use crate::domain::entity::player::Player;
    use crate::testing::{InMemoryClinicStore, coach, date, medic, test_config, test_files};

    struct Fixture {
        _tmp: tempfile::TempDir,
        files: FileStore,
        uc: MedicalFilesUseCase<InMemoryClinicStore>,
        players: PlayersUseCase<InMemoryClinicStore>,
        player: Player,
    }

    async fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryClinicStore::new());
        let (tmp, files) = test_files().await;
        let players = PlayersUseCase::new(repo.clone(), files.clone(), test_config());
        let player = players
            .create(&medic(), PlayerInput::sample("12345678-5"))
            .await
            .unwrap();
        Fixture {
            _tmp: tmp,
            uc: MedicalFilesUseCase::new(repo, files.clone(), test_config()),
            files,
            players,
            player,
        }
    }

    fn input(player_id: PlayerId, kind: FileKind, name: &str, day: u32) -> MedicalFileInput {
        MedicalFileInput {
            player_id,
            kind,
            title: "Resonancia magnética rodilla".into(),
            document_date: Some(date(2025, 4, day)),
            notes: None,
            file: UploadedFile {
                file_name: name.into(),
                bytes: format!("contents of {name}").into_bytes(),
            },
        }
    }

    #[tokio::test]
    async fn test_upload_download_delete() {
        let f = fixture().await;
        let actor = medic();

        let record = f
            .uc
            .upload(&actor, input(f.player.player_id, FileKind::Image, "rm rodilla.png", 3))
            .await
            .unwrap();
        assert!(record.stored_path.starts_with(&f.player.files_dir()));
        assert!(record.stored_path.ends_with("_rm_rodilla.png"));
        assert!(f.files.exists(&record.stored_path).await.unwrap());

        let content = f.uc.download(&coach(), &record.file_id).await.unwrap();
        assert_eq!(content.bytes, b"contents of rm rodilla.png");
        assert_eq!(content.content_type, "image/png");
        assert_eq!(content.file_name, "rm_rodilla.png");

        assert_eq!(
            f.uc.delete(&coach(), &record.file_id).await.unwrap_err().status_code(),
            403
        );
        f.uc.delete(&actor, &record.file_id).await.unwrap();
        assert!(!f.files.exists(&record.stored_path).await.unwrap());
        assert_eq!(
            f.uc.download(&actor, &record.file_id).await.unwrap_err().status_code(),
            404
        );
    }

    #[tokio::test]
    async fn test_delete_succeeds_when_file_removal_fails() {
        let f = fixture().await;
        let actor = medic();
        let record = f
            .uc
            .upload(&actor, input(f.player.player_id, FileKind::Report, "alta.pdf", 4))
            .await
            .unwrap();

        // A directory in place of the file makes removal fail with an IO error
        let on_disk = f.files.resolve(&record.stored_path).await.unwrap();
        tokio::fs::remove_file(&on_disk).await.unwrap();
        tokio::fs::create_dir(&on_disk).await.unwrap();

        f.uc.delete(&actor, &record.file_id).await.unwrap();
        assert_eq!(
            f.uc.download(&actor, &record.file_id).await.unwrap_err().status_code(),
            404
        );
    }

    #[tokio::test]
    async fn test_filters_newest_document_first() {
        let f = fixture().await;
        let actor = medic();
        let pid = f.player.player_id;

        f.uc.upload(&actor, input(pid, FileKind::Report, "a.pdf", 1)).await.unwrap();
        f.uc.upload(&actor, input(pid, FileKind::Image, "b.jpg", 9)).await.unwrap();
        f.uc.upload(&actor, input(pid, FileKind::Report, "c.pdf", 5)).await.unwrap();

        let reports = f
            .uc
            .list(
                &coach(),
                &MedicalFileFilter {
                    player_id: Some(pid),
                    kind: Some(FileKind::Report),
                },
            )
            .await
            .unwrap();
        let names: Vec<_> = reports.iter().map(|r| r.original_name.as_str()).collect();
        assert_eq!(names, vec!["c.pdf", "a.pdf"]);
    }

    #[tokio::test]
    async fn test_rejections() {
        let f = fixture().await;
        let actor = medic();

        let mut big = input(f.player.player_id, FileKind::Other, "big.bin", 1);
        big.file.bytes = vec![0; test_config().max_upload_bytes + 1];
        assert_eq!(f.uc.upload(&actor, big).await.unwrap_err().status_code(), 413);

        let unknown = input(PlayerId::new(), FileKind::Other, "x.pdf", 1);
        let err = f.uc.upload(&actor, unknown).await.unwrap_err();
        assert_eq!(err.into_app_error().field(), Some("playerId"));

        let mut untitled = input(f.player.player_id, FileKind::Other, "x.pdf", 1);
        untitled.title = " ".into();
        let err = f.uc.upload(&actor, untitled).await.unwrap_err();
        assert_eq!(err.into_app_error().field(), Some("title"));
    }

    #[tokio::test]
    async fn test_player_deletion_removes_attachments() {
        let f = fixture().await;
        let actor = medic();
        let record = f
            .uc
            .upload(&actor, input(f.player.player_id, FileKind::Report, "informe.pdf", 2))
            .await
            .unwrap();

        f.players.delete(&actor, &f.player.player_id).await.unwrap();
        assert!(!f.files.exists(&record.stored_path).await.unwrap());
        assert!(f.uc.list(&actor, &MedicalFileFilter::default()).await.unwrap().is_empty());
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{AccountId, MedicalFileId, PlayerId};
use uuid::Uuid;

use super::{PgClinicRepository, choice};
use crate::domain::choices::FileKind;
use crate::domain::entity::medical_file::MedicalFile;
use crate::domain::repository::{MedicalFileFilter, MedicalFileRepository};
use crate::error::ClinicResult;

const FILE_COLUMNS: &str = r#"
    file_id,
    player_id,
    kind,
    title,
    document_date,
    stored_path,
    original_name,
    size_bytes,
    notes,
    uploaded_by,
    created_at
"#;

impl MedicalFileRepository for PgClinicRepository {
    async fn create_medical_file(&self, file: &MedicalFile) -> ClinicResult<()> {
        sqlx::query(
            r#"
            INSERT INTO medical_files (
                file_id,
                player_id,
                kind,
                title,
                document_date,
                stored_path,
                original_name,
                size_bytes,
                notes,
                uploaded_by,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(file.file_id.as_uuid())
        .bind(file.player_id.as_uuid())
        .bind(file.kind.code())
        .bind(&file.title)
        .bind(file.document_date)
        .bind(&file.stored_path)
        .bind(&file.original_name)
        .bind(file.size_bytes)
        .bind(file.notes.as_deref())
        .bind(file.uploaded_by.map(AccountId::into_uuid))
        .bind(file.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_medical_file(
        &self,
        file_id: &MedicalFileId,
    ) -> ClinicResult<Option<MedicalFile>> {
        let sql = format!("SELECT {FILE_COLUMNS} FROM medical_files WHERE file_id = $1");
        let row = sqlx::query_as::<_, MedicalFileRow>(&sql)
            .bind(file_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(MedicalFileRow::into_file).transpose()
    }

    async fn list_medical_files(
        &self,
        filter: &MedicalFileFilter,
    ) -> ClinicResult<Vec<MedicalFile>> {
        let sql = format!(
            r#"
            SELECT {FILE_COLUMNS} FROM medical_files
            WHERE ($1::uuid IS NULL OR player_id = $1)
              AND ($2::text IS NULL OR kind = $2)
            ORDER BY document_date DESC, created_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, MedicalFileRow>(&sql)
            .bind(filter.player_id.map(PlayerId::into_uuid))
            .bind(filter.kind.map(FileKind::code))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(MedicalFileRow::into_file).collect()
    }

    async fn delete_medical_file(&self, file_id: &MedicalFileId) -> ClinicResult<bool> {
        let deleted = sqlx::query("DELETE FROM medical_files WHERE file_id = $1")
            .bind(file_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

#[derive(sqlx::FromRow)]
struct MedicalFileRow {
    file_id: Uuid,
    player_id: Uuid,
    kind: String,
    title: String,
    document_date: NaiveDate,
    stored_path: String,
    original_name: String,
    size_bytes: i64,
    notes: Option<String>,
    uploaded_by: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl MedicalFileRow {
    fn into_file(self) -> ClinicResult<MedicalFile> {
        Ok(MedicalFile {
            file_id: MedicalFileId::from_uuid(self.file_id),
            player_id: PlayerId::from_uuid(self.player_id),
            kind: choice(&self.kind, "kind", FileKind::from_code)?,
            title: self.title,
            document_date: self.document_date,
            stored_path: self.stored_path,
            original_name: self.original_name,
            size_bytes: self.size_bytes,
            notes: self.notes,
            uploaded_by: self.uploaded_by.map(AccountId::from_uuid),
            created_at: self.created_at,
        })
    }
}

//! Player Use Cases
//!
//! Roster management: registration keyed by the canonical RUT, automatic
//! record numbers, profile photo and cascading deletion of uploads.

use std::sync::Arc;

use auth::CurrentUser;
use chrono::{NaiveDate, Utc};
use kernel::id::{DivisionId, PlayerId};
use platform::storage::FileStore;

use crate::application::config::ClinicConfig;
use crate::application::upload::UploadedFile;
use crate::domain::choices::{HealthInsurance, Laterality};
use crate::domain::entity::medical_file::content_type_for;
use crate::domain::entity::player::{DEFAULT_NATIONALITY, NewPlayer, Player, record_number_after};
use crate::domain::repository::{ClinicStore, MedicalFileFilter, PlayerFilter};
use crate::domain::text;
use crate::error::{ClinicError, ClinicResult};

const MAX_NAME_LEN: usize = 100;
const MAX_NATIONALITY_LEN: usize = 50;
const MAX_RECORD_NUMBER_LEN: usize = 20;
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

#[derive(Debug, Clone)]
pub struct PlayerInput {
    pub rut: String,
    pub first_names: String,
    pub last_names: String,
    pub birth_date: NaiveDate,
    /// Defaults to "Chilena"
    pub nationality: Option<String>,
    pub laterality: Laterality,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<i32>,
    pub health_insurance: HealthInsurance,
    /// Assigned automatically when blank
    pub record_number: Option<String>,
    pub division_id: Option<DivisionId>,
    /// Defaults to active
    pub is_active: Option<bool>,
}

/// Partial update; `None` leaves a field untouched, `Some(None)` clears it
#[derive(Debug, Clone, Default)]
pub struct UpdatePlayerInput {
    pub rut: Option<String>,
    pub first_names: Option<String>,
    pub last_names: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub laterality: Option<Laterality>,
    pub weight_kg: Option<Option<f64>>,
    pub height_cm: Option<Option<i32>>,
    pub health_insurance: Option<HealthInsurance>,
    pub record_number: Option<String>,
    pub division_id: Option<Option<DivisionId>>,
    pub is_active: Option<bool>,
}

/// Stored bytes and their MIME type
#[derive(Debug)]
pub struct FileContent {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

pub struct PlayersUseCase<R: ClinicStore> {
    repo: Arc<R>,
    files: FileStore,
    config: Arc<ClinicConfig>,
}

impl<R: ClinicStore> PlayersUseCase<R> {
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
        filter: &PlayerFilter,
    ) -> ClinicResult<Vec<Player>> {
        self.repo.list_players(filter).await
    }

    pub async fn get(&self, _actor: &CurrentUser, id: &PlayerId) -> ClinicResult<Player> {
        self.find(id).await
    }

    pub async fn create(&self, actor: &CurrentUser, input: PlayerInput) -> ClinicResult<Player> {
        actor.ensure_can_write()?;

        let rut = self.config.rut.validate(&input.rut)?;
        if self.repo.find_player_by_rut(&rut).await?.is_some() {
            return Err(ClinicError::conflict("rut", "A player with this RUT already exists"));
        }

        let first_names = text::required(&input.first_names, "firstNames", MAX_NAME_LEN)?;
        let last_names = text::required(&input.last_names, "lastNames", MAX_NAME_LEN)?;
        check_birth_date(input.birth_date)?;
        let nationality = text::optional(
            input.nationality.as_deref(),
            "nationality",
            MAX_NATIONALITY_LEN,
        )?
        .unwrap_or_else(|| DEFAULT_NATIONALITY.to_string());
        let weight_kg = check_weight(input.weight_kg)?;
        let height_cm = check_height(input.height_cm)?;
        self.check_division(input.division_id.as_ref()).await?;

        let record_number = match text::optional(
            input.record_number.as_deref(),
            "recordNumber",
            MAX_RECORD_NUMBER_LEN,
        )? {
            Some(number) => {
                if self.repo.record_number_taken(&number, None).await? {
                    return Err(ClinicError::conflict("recordNumber", "Record number already in use"));
                }
                number
            }
            None => record_number_after(self.repo.max_record_number().await?),
        };

        let player = Player::new(NewPlayer {
            rut,
            first_names,
            last_names,
            birth_date: input.birth_date,
            nationality,
            laterality: input.laterality,
            weight_kg,
            height_cm,
            health_insurance: input.health_insurance,
            record_number,
            division_id: input.division_id,
            is_active: input.is_active.unwrap_or(true),
        });
        self.repo.create_player(&player).await?;

        tracing::info!(
            player_id = %player.player_id,
            rut = %player.rut,
            record_number = %player.record_number,
            by = %actor.public_id,
            "Player registered"
        );
        Ok(player)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: &PlayerId,
        input: UpdatePlayerInput,
    ) -> ClinicResult<Player> {
        actor.ensure_can_write()?;
        let mut player = self.find(id).await?;

        if let Some(raw) = input.rut {
            let rut = self.config.rut.validate(&raw)?;
            if rut != player.rut {
                if self.repo.find_player_by_rut(&rut).await?.is_some() {
                    return Err(ClinicError::conflict("rut", "A player with this RUT already exists"));
                }
                player.rut = rut;
            }
        }
        if let Some(first_names) = input.first_names {
            player.first_names = text::required(&first_names, "firstNames", MAX_NAME_LEN)?;
        }
        if let Some(last_names) = input.last_names {
            player.last_names = text::required(&last_names, "lastNames", MAX_NAME_LEN)?;
        }
        if let Some(birth_date) = input.birth_date {
            check_birth_date(birth_date)?;
            player.birth_date = birth_date;
        }
        if let Some(nationality) = input.nationality {
            player.nationality =
                text::optional(Some(nationality.as_str()), "nationality", MAX_NATIONALITY_LEN)?
                    .unwrap_or_else(|| DEFAULT_NATIONALITY.to_string());
        }
        if let Some(laterality) = input.laterality {
            player.laterality = laterality;
        }
        if let Some(weight_kg) = input.weight_kg {
            player.weight_kg = check_weight(weight_kg)?;
        }
        if let Some(height_cm) = input.height_cm {
            player.height_cm = check_height(height_cm)?;
        }
        if let Some(insurance) = input.health_insurance {
            player.health_insurance = insurance;
        }
        if let Some(number) = input.record_number {
            let number = text::required(&number, "recordNumber", MAX_RECORD_NUMBER_LEN)?;
            if number != player.record_number
                && self.repo.record_number_taken(&number, Some(id)).await?
            {
                return Err(ClinicError::conflict("recordNumber", "Record number already in use"));
            }
            player.record_number = number;
        }
        if let Some(division_id) = input.division_id {
            self.check_division(division_id.as_ref()).await?;
            player.division_id = division_id;
        }
        if let Some(active) = input.is_active {
            player.is_active = active;
        }

        player.touch();
        self.repo.update_player(&player).await?;
        tracing::info!(player_id = %player.player_id, by = %actor.public_id, "Player updated");
        Ok(player)
    }

    /// Delete the player, its clinical records and every stored upload
    pub async fn delete(&self, actor: &CurrentUser, id: &PlayerId) -> ClinicResult<()> {
        actor.ensure_can_write()?;
        let player = self.find(id).await?;
        let attachments = self
            .repo
            .list_medical_files(&MedicalFileFilter {
                player_id: Some(*id),
                ..Default::default()
            })
            .await?;

        self.repo.delete_player(id).await?;

        let paths = attachments
            .into_iter()
            .map(|f| f.stored_path)
            .chain(player.photo_path.clone());
        for path in paths {
            // the records are gone; a leftover file is only logged
            if let Err(e) = self.files.delete(&path).await {
                tracing::warn!(path = %path, error = %e, "Failed to delete stored file");
            }
        }

        tracing::info!(player_id = %id, rut = %player.rut, by = %actor.public_id, "Player deleted");
        Ok(())
    }

    /// Store a new profile photo, replacing the previous one
    pub async fn upload_photo(
        &self,
        actor: &CurrentUser,
        id: &PlayerId,
        upload: UploadedFile,
    ) -> ClinicResult<Player> {
        actor.ensure_can_write()?;
        upload.check_size(self.config.max_photo_bytes)?;
        let is_image = upload
            .extension()
            .is_some_and(|ext| PHOTO_EXTENSIONS.contains(&ext.as_str()));
        if !is_image {
            return Err(ClinicError::invalid(
                "photo",
                "The photo must be a JPG, PNG, WEBP or GIF image",
            ));
        }

        let mut player = self.find(id).await?;
        let path = upload.stored_path(&player.photo_dir());
        self.files.write(&path, &upload.bytes).await?;

        let previous = player.photo_path.replace(path);
        player.touch();
        if let Err(e) = self.repo.update_player(&player).await {
            if let Some(new_path) = &player.photo_path {
                let _ = self.files.delete(new_path).await;
            }
            return Err(e);
        }
        if let Some(previous) = previous {
            if let Err(e) = self.files.delete(&previous).await {
                tracing::warn!(path = %previous, error = %e, "Failed to delete old photo");
            }
        }

        tracing::info!(player_id = %player.player_id, "Player photo updated");
        Ok(player)
    }

    pub async fn photo(&self, _actor: &CurrentUser, id: &PlayerId) -> ClinicResult<FileContent> {
        let player = self.find(id).await?;
        let path = player.photo_path.ok_or(ClinicError::NotFound("Photo"))?;
        let bytes = self.files.read(&path).await?;
        let file_name = path.rsplit('/').next().unwrap_or(&path).to_string();
        Ok(FileContent {
            bytes,
            content_type: content_type_for(&path),
            file_name,
        })
    }

    async fn find(&self, id: &PlayerId) -> ClinicResult<Player> {
        self.repo
            .find_player(id)
            .await?
            .ok_or(ClinicError::NotFound("Player"))
    }

    async fn check_division(&self, id: Option<&DivisionId>) -> ClinicResult<()> {
        if let Some(id) = id {
            if self.repo.find_division(id).await?.is_none() {
                return Err(ClinicError::invalid("divisionId", "Unknown division"));
            }
        }
        Ok(())
    }
}

fn check_birth_date(date: NaiveDate) -> ClinicResult<()> {
    let today = Utc::now().date_naive();
    let earliest = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN);
    if date > today || date < earliest {
        return Err(ClinicError::invalid("birthDate", "Birth date is out of range"));
    }
    Ok(())
}

fn check_weight(weight: Option<f64>) -> ClinicResult<Option<f64>> {
    match weight {
        Some(w) if !(w > 0.0 && w < 300.0) => {
            Err(ClinicError::invalid("weightKg", "Weight must be between 0 and 300 kg"))
        }
        // stored with two decimals
        Some(w) => Ok(Some((w * 100.0).round() / 100.0)),
        None => Ok(None),
    }
}

fn check_height(height: Option<i32>) -> ClinicResult<Option<i32>> {
    match height {
        Some(h) if !(50..=250).contains(&h) => {
            Err(ClinicError::invalid("heightCm", "Height must be between 50 and 250 cm"))
        }
        other => Ok(other),
    }
}

#[cfg(test)]
impl PlayerInput {
    pub(crate) fn sample(rut: &str) -> Self {
        Self {
            rut: rut.to_string(),
            first_names: "Diego Andrés".to_string(),
            last_names: format!("Valdés {rut}"),
            birth_date: NaiveDate::from_ymd_opt(2004, 8, 30).unwrap(),
            nationality: None,
            laterality: Laterality::Right,
            weight_kg: Some(71.456),
            height_cm: Some(177),
            health_insurance: HealthInsurance::Fonasa,
            record_number: None,
            division_id: None,
            is_active: None,
        }
    }
}

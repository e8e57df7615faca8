//! Player Entity

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use kernel::id::{DivisionId, PlayerId};
use kernel::rut::Rut;

use crate::domain::choices::{HealthInsurance, Laterality};

pub const DEFAULT_NATIONALITY: &str = "Chilena";

#[derive(Debug, Clone)]
pub struct Player {
    pub player_id: PlayerId,
    /// Canonical, unique
    pub rut: Rut,
    pub first_names: String,
    pub last_names: String,
    pub birth_date: NaiveDate,
    pub nationality: String,
    pub laterality: Laterality,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<i32>,
    pub health_insurance: HealthInsurance,
    /// Internal club file number, `0001` style, unique
    pub record_number: String,
    pub division_id: Option<DivisionId>,
    pub is_active: bool,
    /// Relative to the media root
    pub photo_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields of a new player
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub rut: Rut,
    pub first_names: String,
    pub last_names: String,
    pub birth_date: NaiveDate,
    pub nationality: String,
    pub laterality: Laterality,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<i32>,
    pub health_insurance: HealthInsurance,
    pub record_number: String,
    pub division_id: Option<DivisionId>,
    pub is_active: bool,
}

impl Player {
    pub fn new(data: NewPlayer) -> Self {
        let now = Utc::now();
        Self {
            player_id: PlayerId::new(),
            rut: data.rut,
            first_names: data.first_names,
            last_names: data.last_names,
            birth_date: data.birth_date,
            nationality: data.nationality,
            laterality: data.laterality,
            weight_kg: data.weight_kg,
            height_cm: data.height_cm,
            health_insurance: data.health_insurance,
            record_number: data.record_number,
            division_id: data.division_id,
            is_active: data.is_active,
            photo_path: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_names, self.last_names)
    }

    /// Completed years on `today`
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let birthday_pending =
            (today.month(), today.day()) < (self.birth_date.month(), self.birth_date.day());
        today.year() - self.birth_date.year() - i32::from(birthday_pending)
    }

    pub fn age(&self) -> i32 {
        self.age_on(Utc::now().date_naive())
    }

    /// Directory holding this player's uploads, relative to the media root
    pub fn photo_dir(&self) -> String {
        format!("players/photos/player_{}", self.player_id)
    }

    pub fn files_dir(&self) -> String {
        format!("medical_files/player_{}", self.player_id)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Value of a purely numeric record number
///
/// Hand-typed legacy values ("A-12") have none and never drive numbering.
pub fn numeric_record_number(number: &str) -> Option<u64> {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}

/// Record number that follows the numeric maximum in use
pub fn record_number_after(max: u64) -> String {
    format!("{:04}", max + 1)
}

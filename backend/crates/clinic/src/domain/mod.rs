//! Domain Layer
//!
//! Contains entities, closed vocabularies, and repository traits.

pub mod choices;
pub mod entity;
pub mod repository;
pub mod text;

// Re-exports
pub use entity::{
    checklist::{Checklist, PainDetail},
    division::{Division, DivisionSummary},
    injury::{DaysRemaining, Injury, InjuryDailyStatus},
    matches::Match,
    medical_file::MedicalFile,
    player::{NewPlayer, Player},
    treatment::Treatment,
};
pub use repository::{
    ChecklistFilter, ClinicStore, InjuryFilter, MatchFilter, MedicalFileFilter, PlayerFilter,
    TreatmentFilter,
};

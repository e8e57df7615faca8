//! Injury Entity
//!
//! An injury stays active until it is finished; while active the medical
//! staff log one rehabilitation phase per day against it.

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{AccountId, InjuryDailyStatusId, InjuryId, PlayerId};
use serde::Serialize;

use crate::domain::choices::{
    BodyRegion, DailyPhase, InjuryCondition, InjuryMechanism, InjuryType, Severity, SportStage,
};

#[derive(Debug, Clone)]
pub struct Injury {
    pub injury_id: InjuryId,
    pub player_id: PlayerId,
    pub injured_on: NaiveDate,
    pub diagnosis: String,
    pub injury_type: InjuryType,
    pub body_region: BodyRegion,
    pub mechanism: InjuryMechanism,
    pub condition: InjuryCondition,
    pub sport_stage: SportStage,
    pub severity: Severity,
    pub estimated_recovery_days: Option<i32>,
    pub actual_recovery_days: Option<i32>,
    pub notes: Option<String>,
    pub estimated_missed_matches: Option<i32>,
    pub is_active: bool,
    pub ended_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Recovery countdown shown next to an injury
///
/// Serialized as the number of days or as `"completed"` / `"recovered"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaysRemaining {
    Days(i64),
    Completed,
    Recovered,
}

impl Serialize for DaysRemaining {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DaysRemaining::Days(days) => serializer.serialize_i64(*days),
            DaysRemaining::Completed => serializer.serialize_str("completed"),
            DaysRemaining::Recovered => serializer.serialize_str("recovered"),
        }
    }
}

impl Injury {
    /// Estimated days minus days elapsed since the injury
    ///
    /// `None` without an estimate; an actual recovery time always wins.
    pub fn days_remaining_on(&self, today: NaiveDate) -> Option<DaysRemaining> {
        if self.actual_recovery_days.is_some() {
            return Some(DaysRemaining::Recovered);
        }
        let estimated = self.estimated_recovery_days.filter(|d| *d > 0)?;
        let elapsed = (today - self.injured_on).num_days();
        let left = i64::from(estimated) - elapsed;
        Some(if left > 0 {
            DaysRemaining::Days(left)
        } else {
            DaysRemaining::Completed
        })
    }

    pub fn days_remaining(&self) -> Option<DaysRemaining> {
        self.days_remaining_on(Utc::now().date_naive())
    }

    /// Close the injury; actual days default to the elapsed time
    pub fn finish(&mut self, ended_on: NaiveDate, actual_recovery_days: Option<i32>) {
        let elapsed = (ended_on - self.injured_on).num_days().max(0);
        self.is_active = false;
        self.ended_on = Some(ended_on);
        self.actual_recovery_days = Some(
            actual_recovery_days.unwrap_or_else(|| i32::try_from(elapsed).unwrap_or(i32::MAX)),
        );
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Rehabilitation phase of an active injury on one day
#[derive(Debug, Clone)]
pub struct InjuryDailyStatus {
    pub status_id: InjuryDailyStatusId,
    pub injury_id: InjuryId,
    /// Unique per injury
    pub date: NaiveDate,
    pub phase: DailyPhase,
    pub recorded_by: Option<AccountId>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl InjuryDailyStatus {
    pub fn new(
        injury_id: InjuryId,
        date: NaiveDate,
        phase: DailyPhase,
        recorded_by: Option<AccountId>,
        notes: Option<String>,
    ) -> Self {
        Self {
            status_id: InjuryDailyStatusId::new(),
            injury_id,
            date,
            phase,
            recorded_by,
            notes,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn injury(estimated: Option<i32>) -> Injury {
        let now = Utc::now();
        Injury {
            injury_id: InjuryId::new(),
            player_id: PlayerId::new(),
            injured_on: date(2025, 3, 1),
            diagnosis: "Desgarro isquiotibial grado I".into(),
            injury_type: InjuryType::Muscular,
            body_region: BodyRegion::ThighBackRight,
            mechanism: InjuryMechanism::NonContact,
            condition: InjuryCondition::Acute,
            sport_stage: SportStage::OfficialMatch,
            severity: Severity::Moderate,
            estimated_recovery_days: estimated,
            actual_recovery_days: None,
            notes: None,
            estimated_missed_matches: Some(2),
            is_active: true,
            ended_on: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_days_remaining() {
        let i = injury(Some(21));
        assert_eq!(i.days_remaining_on(date(2025, 3, 1)), Some(DaysRemaining::Days(21)));
        assert_eq!(i.days_remaining_on(date(2025, 3, 11)), Some(DaysRemaining::Days(11)));
        assert_eq!(i.days_remaining_on(date(2025, 3, 22)), Some(DaysRemaining::Completed));
        assert_eq!(i.days_remaining_on(date(2025, 5, 1)), Some(DaysRemaining::Completed));

        assert_eq!(injury(None).days_remaining_on(date(2025, 3, 5)), None);
        assert_eq!(injury(Some(0)).days_remaining_on(date(2025, 3, 5)), None);
    }

    #[test]
    fn test_finish_defaults_actual_days() {
        let mut i = injury(Some(21));
        i.finish(date(2025, 3, 19), None);
        assert!(!i.is_active);
        assert_eq!(i.ended_on, Some(date(2025, 3, 19)));
        assert_eq!(i.actual_recovery_days, Some(18));
        assert_eq!(i.days_remaining(), Some(DaysRemaining::Recovered));

        let mut i = injury(None);
        i.finish(date(2025, 3, 19), Some(25));
        assert_eq!(i.actual_recovery_days, Some(25));
    }

    #[test]
    fn test_days_remaining_json() {
        assert_eq!(serde_json::to_value(DaysRemaining::Days(4)).unwrap(), 4);
        assert_eq!(serde_json::to_value(DaysRemaining::Completed).unwrap(), "completed");
        assert_eq!(serde_json::to_value(DaysRemaining::Recovered).unwrap(), "recovered");
    }
}

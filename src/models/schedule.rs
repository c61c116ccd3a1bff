// SPDX-License-Identifier: MIT

//! Meal schedule singleton and its partial-update patch.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_LUNCH_TIME: &str = "12:00";
pub const DEFAULT_DINNER_TIME: &str = "19:00";

/// Household meal schedule. Exactly one document exists, created lazily on
/// first read (the accessor enforces the invariant, not the store).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    /// Lunch time, "HH:MM"
    pub lunch_time: String,
    /// Dinner time, "HH:MM"
    pub dinner_time: String,
    /// Local date ("YYYY-MM-DD") of the last daily reset that charged
    /// missed meals. Guards against double-counting when the scheduled
    /// job and the manual reset route fire on the same day.
    #[serde(default)]
    pub last_reset_date: Option<String>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            lunch_time: DEFAULT_LUNCH_TIME.to_string(),
            dinner_time: DEFAULT_DINNER_TIME.to_string(),
            last_reset_date: None,
        }
    }
}

/// Partial update for the schedule: only provided fields overwrite.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchedulePatch {
    pub lunch_time: Option<String>,
    pub dinner_time: Option<String>,
}

impl Schedule {
    /// Apply a patch, validating each provided field as strict HH:MM.
    pub fn apply_patch(&mut self, patch: SchedulePatch) -> Result<(), AppError> {
        if let Some(lunch) = patch.lunch_time {
            validate_time_string(&lunch)?;
            self.lunch_time = lunch;
        }
        if let Some(dinner) = patch.dinner_time {
            validate_time_string(&dinner)?;
            self.dinner_time = dinner;
        }
        Ok(())
    }
}

/// Validate a strict "HH:MM" wall-clock string (00-23 hours, 00-59 minutes).
pub fn validate_time_string(value: &str) -> Result<(), AppError> {
    let invalid = || {
        AppError::BadRequest(format!(
            "invalid time '{value}': expected HH:MM (00-23:00-59)"
        ))
    };

    let (hours, minutes) = value.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    if !hours.chars().chain(minutes.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;

    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_household_meals() {
        let schedule = Schedule::default();
        assert_eq!(schedule.lunch_time, "12:00");
        assert_eq!(schedule.dinner_time, "19:00");
        assert!(schedule.last_reset_date.is_none());
    }

    #[test]
    fn patch_updates_only_provided_fields() {
        let mut schedule = Schedule::default();

        schedule
            .apply_patch(SchedulePatch {
                lunch_time: Some("11:30".to_string()),
                dinner_time: None,
            })
            .unwrap();

        assert_eq!(schedule.lunch_time, "11:30");
        assert_eq!(schedule.dinner_time, "19:00");
    }

    #[test]
    fn patch_rejects_malformed_times() {
        let mut schedule = Schedule::default();

        for bad in ["24:00", "12:60", "7:00", "12:5", "noonish", "12-00", ""] {
            let err = schedule
                .apply_patch(SchedulePatch {
                    lunch_time: Some(bad.to_string()),
                    dinner_time: None,
                })
                .unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "accepted {bad:?}");
            assert_eq!(schedule.lunch_time, "12:00", "mutated on {bad:?}");
        }
    }

    #[test]
    fn validate_time_string_accepts_bounds() {
        assert!(validate_time_string("00:00").is_ok());
        assert!(validate_time_string("23:59").is_ok());
        assert!(validate_time_string("09:05").is_ok());
    }
}

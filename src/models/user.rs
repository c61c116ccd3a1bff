//! Household member model and the meal-state transitions that drive it.
//!
//! A user cycles through three states: present-and-hungry, present-and-fed,
//! and away. The daily reset moves everyone present back to hungry and
//! charges a missed meal to anyone who never marked themselves fed. Away
//! users are invisible to the accounting until they toggle back.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Meal slot derived from the hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealType {
    Lunch,
    Dinner,
}

impl MealType {
    /// Meal slot for a given local hour: [7, 17) is lunch, the rest dinner.
    ///
    /// The boundary is fixed rather than derived from the Schedule times.
    pub fn from_hour(hour: u32) -> Self {
        if (7..17).contains(&hour) {
            MealType::Lunch
        } else {
            MealType::Dinner
        }
    }

    /// Meal slot for a timestamp, read off its own wall clock. Callers
    /// pass the household's local time, not UTC.
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self::from_hour(now.hour())
    }
}

/// Outcome recorded for one reset cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealStatus {
    Eaten,
    Missed,
}

/// One entry in a user's meal history (append-only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecord {
    pub date: DateTime<Utc>,
    pub meal_type: MealType,
    pub eaten: bool,
    pub status: MealStatus,
}

/// Household member stored in Firestore (doc id = `uid`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Stable subject from the identity provider (also the document ID)
    pub uid: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// FCM device token, absent until the client registers one
    #[serde(default)]
    pub device_token: Option<String>,
    /// Whether this user has eaten in the current cycle
    #[serde(default)]
    pub has_eaten: bool,
    /// When the user last marked themselves as having eaten
    #[serde(default)]
    pub last_eaten_at: Option<DateTime<Utc>>,
    /// Whether the user is away (excluded from accounting and fan-out)
    #[serde(default)]
    pub is_away: bool,
    #[serde(default)]
    pub away_start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub away_end_date: Option<DateTime<Utc>>,
    /// Reset cycles this user sat out hungry
    #[serde(default)]
    pub missed_meals_count: u32,
    #[serde(default)]
    pub meal_history: Vec<MealRecord>,
    /// When the user first registered
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a freshly registered user.
    pub fn new(uid: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            email: email.into(),
            device_token: None,
            has_eaten: false,
            last_eaten_at: None,
            is_away: false,
            away_start_date: None,
            away_end_date: None,
            missed_meals_count: 0,
            meal_history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Mark this user as having eaten.
    ///
    /// Fails with `InvalidState` when the user is away; nothing is mutated
    /// in that case.
    pub fn mark_eaten(&mut self, now: DateTime<Utc>) -> Result<(), AppError> {
        if self.is_away {
            return Err(AppError::InvalidState(
                "cannot mark eaten while away".to_string(),
            ));
        }

        self.has_eaten = true;
        self.last_eaten_at = Some(now);
        Ok(())
    }

    /// Flip the away flag.
    ///
    /// Entering away clears the eaten flag and any previous end date;
    /// returning stamps the end date.
    pub fn toggle_away(&mut self, now: DateTime<Utc>) {
        self.is_away = !self.is_away;

        if self.is_away {
            self.away_start_date = Some(now);
            self.away_end_date = None;
            self.has_eaten = false;
        } else {
            self.away_end_date = Some(now);
        }
    }

    /// Apply one daily reset cycle to this user.
    ///
    /// Away users are untouched (away is sticky across resets). A present
    /// user who never ate gets a missed-meal increment and a history record;
    /// everyone present ends the cycle hungry again.
    ///
    /// Returns `true` if a missed meal was charged.
    ///
    /// `now` carries the household's wall-clock timezone so the missed
    /// record is labeled with the local meal slot; the stored date is UTC.
    pub fn apply_daily_reset<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> bool {
        if self.is_away {
            return false;
        }

        let missed = !self.has_eaten;
        if missed {
            self.missed_meals_count += 1;
            self.meal_history.push(MealRecord {
                date: now.with_timezone(&Utc),
                meal_type: MealType::at(now),
                eaten: false,
                status: MealStatus::Missed,
            });
        }

        self.has_eaten = false;
        missed
    }

    /// True when this user participates in meal accounting and fan-out.
    pub fn is_present(&self) -> bool {
        !self.is_away
    }
}

/// User as returned by roster-mutating endpoints: device token stripped.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedUser {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub has_eaten: bool,
    pub last_eaten_at: Option<DateTime<Utc>>,
    pub is_away: bool,
    pub away_start_date: Option<DateTime<Utc>>,
    pub away_end_date: Option<DateTime<Utc>>,
    pub missed_meals_count: u32,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for SanitizedUser {
    fn from(user: &User) -> Self {
        Self {
            uid: user.uid.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            has_eaten: user.has_eaten,
            last_eaten_at: user.last_eaten_at,
            is_away: user.is_away,
            away_start_date: user.away_start_date,
            away_end_date: user.away_end_date,
            missed_meals_count: user.missed_meals_count,
            created_at: user.created_at,
        }
    }
}

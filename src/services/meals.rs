// SPDX-License-Identifier: MIT

//! Meal-state orchestration: registration, eaten/away transitions, the
//! guarded daily reset, and food-finished notification fan-out.
//!
//! Per-user transition rules live on [`crate::models::User`]; this service
//! sequences them against the store and the push sender. Every operation is
//! an independent short-lived unit of work; users are visited one at a time
//! with one store write each.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::services::PushService;
use crate::time_utils::local_date_string;

/// Summary of one daily reset run.
#[derive(Debug, Clone, Serialize)]
pub struct ResetOutcome {
    /// True when missed meals were already charged for this date and the
    /// run only cleared eaten flags.
    pub already_ran: bool,
    /// Present users visited by this run.
    pub users_reset: u32,
    /// Missed meals charged by this run.
    pub meals_missed: u32,
}

/// Summary returned by the food-finished report.
#[derive(Debug, Clone, Serialize)]
pub struct FinishedReport {
    /// True when nobody was left to notify.
    pub all_done: bool,
    pub message: String,
    /// Present users who had not eaten when the report came in.
    pub remaining: u32,
    /// Present users who had eaten.
    pub ate: u32,
    pub notifications_sent: u32,
    pub notifications_failed: u32,
}

/// Business logic for the household meal tracker.
#[derive(Clone)]
pub struct MealService {
    db: FirestoreDb,
    push: Arc<PushService>,
}

impl MealService {
    pub fn new(db: FirestoreDb, push: Arc<PushService>) -> Self {
        Self { db, push }
    }

    /// Register the authenticated caller as a household member.
    ///
    /// Idempotent: an existing member is returned unchanged. New members
    /// beyond `max_users` are rejected with `Forbidden`.
    pub async fn register(
        &self,
        uid: &str,
        name: &str,
        email: &str,
        max_users: u32,
    ) -> Result<User> {
        if let Some(existing) = self.db.get_user(uid).await? {
            tracing::debug!(uid, "Registration for existing member");
            return Ok(existing);
        }

        let count = self.db.count_users().await?;
        if count >= max_users {
            return Err(AppError::Forbidden(format!(
                "household is full ({count} of {max_users} members)"
            )));
        }

        let user = User::new(uid, name, email);
        self.db.upsert_user(&user).await?;
        tracing::info!(uid, name = %user.name, "Registered new household member");
        Ok(user)
    }

    /// Store or replace the caller's FCM device token.
    pub async fn set_device_token(&self, uid: &str, token: &str) -> Result<User> {
        let mut user = self.require_user(uid).await?;
        user.device_token = Some(token.to_string());
        self.db.upsert_user(&user).await?;
        Ok(user)
    }

    /// Mark the caller as having eaten and return the updated roster.
    pub async fn mark_eaten(&self, uid: &str, now: DateTime<Utc>) -> Result<Vec<User>> {
        let mut user = self.require_user(uid).await?;
        user.mark_eaten(now)?;
        self.db.upsert_user(&user).await?;
        tracing::info!(uid, "Member marked as eaten");
        self.db.list_users().await
    }

    /// Toggle the caller's away state and return the updated roster.
    pub async fn toggle_away(&self, uid: &str, now: DateTime<Utc>) -> Result<Vec<User>> {
        let mut user = self.require_user(uid).await?;
        user.toggle_away(now);
        self.db.upsert_user(&user).await?;
        tracing::info!(uid, is_away = user.is_away, "Member toggled away state");
        self.db.list_users().await
    }

    /// Run one daily reset cycle.
    ///
    /// Both the midnight timer and the manual reset route land here. The
    /// schedule document carries the date of the last charged run, so a
    /// second invocation on the same calendar date clears eaten flags but
    /// never double-counts missed meals or appends duplicate history.
    ///
    /// The guard date and the meal-slot labeling both use the server's
    /// local clock, matching the timer that fires at local midnight.
    pub async fn daily_reset(&self, now: DateTime<Utc>) -> Result<ResetOutcome> {
        let mut schedule = self.db.get_or_create_schedule().await?;
        let local_now = now.with_timezone(&Local);
        let today = local_date_string(local_now);
        let already_ran = schedule.last_reset_date.as_deref() == Some(today.as_str());

        let users = self.db.list_users().await?;
        let mut users_reset = 0u32;
        let mut meals_missed = 0u32;

        for mut user in users {
            if !user.is_present() {
                continue;
            }

            users_reset += 1;
            let dirty = if already_ran {
                let was_fed = user.has_eaten;
                user.has_eaten = false;
                was_fed
            } else {
                let missed = user.apply_daily_reset(&local_now);
                if missed {
                    meals_missed += 1;
                }
                true
            };

            if dirty {
                self.db.upsert_user(&user).await?;
            }
        }

        if !already_ran {
            schedule.last_reset_date = Some(today);
            self.db.set_schedule(&schedule).await?;
        }

        tracing::info!(
            already_ran,
            users_reset,
            meals_missed,
            "Daily reset cycle complete"
        );

        Ok(ResetOutcome {
            already_ran,
            users_reset,
            meals_missed,
        })
    }

    /// Report that the food is finished and fan out notifications.
    ///
    /// Hungry members hear the food is gone (and who already ate); fed
    /// members hear who still needs to eat. Away members get nothing.
    pub async fn report_food_finished(&self, reporter_uid: &str) -> Result<FinishedReport> {
        let reporter = self.require_user(reporter_uid).await?;
        if reporter.is_away {
            return Err(AppError::InvalidState(
                "cannot report food finished while away".to_string(),
            ));
        }

        let users = self.db.list_users().await?;
        let (remaining, ate) = partition_present(users);
        Ok(self.notify_finished(remaining, ate).await)
    }

    /// Build the finished report for an already-partitioned roster.
    ///
    /// Nobody remaining means nothing to send; otherwise fan out to both
    /// groups and carry the per-recipient counts into the report.
    pub async fn notify_finished(&self, remaining: Vec<User>, ate: Vec<User>) -> FinishedReport {
        if remaining.is_empty() {
            return FinishedReport {
                all_done: true,
                message: "Everyone has eaten. No notifications sent.".to_string(),
                remaining: 0,
                ate: ate.len() as u32,
                notifications_sent: 0,
                notifications_failed: 0,
            };
        }

        let (sent, failed) = self.fan_out(&remaining, &ate).await;

        FinishedReport {
            all_done: false,
            message: format!(
                "Notified the household: {} still need to eat.",
                remaining.len()
            ),
            remaining: remaining.len() as u32,
            ate: ate.len() as u32,
            notifications_sent: sent,
            notifications_failed: failed,
        }
    }

    /// Send the food-finished notifications, one best-effort attempt per
    /// recipient. A failed send is logged and skipped; it never aborts the
    /// rest of the batch.
    pub async fn fan_out(&self, remaining: &[User], ate: &[User]) -> (u32, u32) {
        let mut sent = 0u32;
        let mut failed = 0u32;

        let (hungry_title, hungry_body) = hungry_notification(ate);
        for user in remaining {
            let Some(token) = &user.device_token else {
                continue;
            };
            match self.push.send(token, &hungry_title, &hungry_body).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    failed += 1;
                    tracing::warn!(uid = %user.uid, error = %e, "Push send failed; skipping recipient");
                }
            }
        }

        let (fed_title, fed_body) = fed_notification(remaining);
        for user in ate {
            let Some(token) = &user.device_token else {
                continue;
            };
            match self.push.send(token, &fed_title, &fed_body).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    failed += 1;
                    tracing::warn!(uid = %user.uid, error = %e, "Push send failed; skipping recipient");
                }
            }
        }

        (sent, failed)
    }

    async fn require_user(&self, uid: &str) -> Result<User> {
        self.db
            .get_user(uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {uid} not found")))
    }
}

/// Split the roster into (hungry, fed), dropping away members from both.
fn partition_present(users: Vec<User>) -> (Vec<User>, Vec<User>) {
    users
        .into_iter()
        .filter(User::is_present)
        .partition(|u| !u.has_eaten)
}

fn names(users: &[User]) -> String {
    users
        .iter()
        .map(|u| u.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Message for members who have not eaten yet.
fn hungry_notification(ate: &[User]) -> (String, String) {
    let body = if ate.is_empty() {
        "The food is finished and no one has eaten yet.".to_string()
    } else {
        format!("The food is finished. Already ate: {}.", names(ate))
    };
    ("Food Finished!".to_string(), body)
}

/// Message for members who already ate.
fn fed_notification(remaining: &[User]) -> (String, String) {
    (
        "Food Finished!".to_string(),
        format!("Still need to eat: {}.", names(remaining)),
    )
}

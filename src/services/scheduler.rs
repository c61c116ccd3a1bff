// SPDX-License-Identifier: MIT

//! Process-wide daily reset timer.
//!
//! Spawned once at startup and owned by the process lifecycle; it is never
//! cancelled. Fires at each local midnight and runs the guarded reset path,
//! so a crash-restart double fire cannot double-count missed meals.

use chrono::{Local, Utc};

use crate::services::MealService;
use crate::time_utils::until_next_midnight;

/// Spawn the midnight reset loop.
pub fn spawn_daily_reset(meals: MealService) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let wait = until_next_midnight(Local::now());
            tracing::info!(
                seconds_until_reset = wait.as_secs(),
                "Daily reset timer armed"
            );

            tokio::time::sleep(wait).await;

            match meals.daily_reset(Utc::now()).await {
                Ok(outcome) => {
                    tracing::info!(
                        users_reset = outcome.users_reset,
                        meals_missed = outcome.meals_missed,
                        already_ran = outcome.already_ran,
                        "Scheduled daily reset finished"
                    );
                }
                Err(e) => {
                    // The loop keeps running; the next midnight tries again.
                    tracing::error!(error = %e, "Scheduled daily reset failed");
                }
            }
        }
    })
}

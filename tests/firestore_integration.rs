// SPDX-License-Identifier: MIT

//! Firestore-backed flow tests.
//!
//! These run only against the emulator (FIRESTORE_EMULATOR_HOST set) and
//! exercise the meal-state engine end to end through the service layer.

use chrono::Utc;
use mealboard::models::User;
use mealboard::services::{MealService, PushService};
use std::sync::Arc;

mod common;

fn unique_uid(prefix: &str) -> String {
    format!(
        "{prefix}-{}",
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    )
}

async fn emulator_service() -> MealService {
    MealService::new(common::test_db().await, Arc::new(PushService::new_mock()))
}

#[tokio::test]
async fn register_is_idempotent() {
    require_emulator!();
    let service = emulator_service().await;
    let uid = unique_uid("reg");

    let first = service
        .register(&uid, "Ana", "ana@example.com", 100)
        .await
        .unwrap();
    let second = service
        .register(&uid, "Renamed", "other@example.com", 100)
        .await
        .unwrap();

    // Re-registration returns the existing record unchanged.
    assert_eq!(second.uid, first.uid);
    assert_eq!(second.name, "Ana");
    assert_eq!(second.email, "ana@example.com");
}

#[tokio::test]
async fn mark_eaten_while_away_is_rejected_and_unchanged() {
    require_emulator!();
    let service = emulator_service().await;
    let uid = unique_uid("away");

    service
        .register(&uid, "Bo", "bo@example.com", 100)
        .await
        .unwrap();
    service.toggle_away(&uid, Utc::now()).await.unwrap();

    let err = service.mark_eaten(&uid, Utc::now()).await.unwrap_err();
    assert!(matches!(
        err,
        mealboard::error::AppError::InvalidState(_)
    ));

    let db = common::test_db().await;
    let stored: User = db.get_user(&uid).await.unwrap().unwrap();
    assert!(!stored.has_eaten);
    assert!(stored.is_away);
}

#[tokio::test]
async fn away_reporter_cannot_report_food_finished() {
    require_emulator!();
    let service = emulator_service().await;
    let uid = unique_uid("rep");

    service
        .register(&uid, "Dee", "dee@example.com", 100)
        .await
        .unwrap();
    service.toggle_away(&uid, Utc::now()).await.unwrap();

    let err = service.report_food_finished(&uid).await.unwrap_err();
    assert!(matches!(
        err,
        mealboard::error::AppError::InvalidState(_)
    ));
}

#[tokio::test]
async fn daily_reset_charges_once_per_day() {
    require_emulator!();
    let service = emulator_service().await;
    let uid = unique_uid("reset");

    service
        .register(&uid, "Cal", "cal@example.com", 100)
        .await
        .unwrap();

    // Clear any guard date left behind by earlier runs.
    let db = common::test_db().await;
    let mut schedule = db.get_or_create_schedule().await.unwrap();
    schedule.last_reset_date = None;
    db.set_schedule(&schedule).await.unwrap();

    let now = Utc::now();
    let first = service.daily_reset(now).await.unwrap();
    let second = service.daily_reset(now).await.unwrap();

    assert!(!first.already_ran);
    assert!(second.already_ran);
    assert_eq!(second.meals_missed, 0);

    let stored: User = db.get_user(&uid).await.unwrap().unwrap();

    // Charged exactly once across both runs.
    assert_eq!(stored.missed_meals_count, 1);
    assert_eq!(stored.meal_history.len(), 1);
    assert!(!stored.has_eaten);
}

#[tokio::test]
async fn schedule_singleton_get_or_create() {
    require_emulator!();
    let db = common::test_db().await;

    let first = db.get_or_create_schedule().await.unwrap();
    let second = db.get_or_create_schedule().await.unwrap();

    assert_eq!(first.lunch_time, second.lunch_time);
    assert_eq!(first.dinner_time, second.dinner_time);
}

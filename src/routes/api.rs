// SPDX-License-Identifier: MIT

//! API routes for authenticated household members.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{SanitizedUser, Schedule, SchedulePatch, User};
use crate::services::FinishedReport;
use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// API routes (require authentication; the middleware is applied in
/// routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users/register", post(register))
        .route("/api/users/fcm-token", post(set_fcm_token))
        .route("/api/users", get(list_users))
        .route("/api/users/toggle-away", post(toggle_away))
        .route("/api/users/mark-eaten", post(mark_eaten))
        .route("/api/users/reset-eaten", post(reset_eaten))
        .route("/api/schedule", get(get_schedule).put(put_schedule))
        .route("/api/report-food-finished", post(report_food_finished))
}

// ─── Registration ────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

/// Register the caller as a household member (idempotent).
async fn register(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<User>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let registered = state
        .meals
        .register(&user.uid, &payload.name, &payload.email, state.config.max_users)
        .await?;

    Ok(Json(registered))
}

// ─── Device Tokens ───────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct FcmTokenRequest {
    #[validate(length(min = 1))]
    pub token: String,
}

#[derive(Serialize)]
pub struct FcmTokenResponse {
    pub success: bool,
    pub user: User,
}

/// Store the caller's FCM device token.
async fn set_fcm_token(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<FcmTokenRequest>,
) -> Result<Json<FcmTokenResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let updated = state
        .meals
        .set_device_token(&user.uid, &payload.token)
        .await?;

    Ok(Json(FcmTokenResponse {
        success: true,
        user: updated,
    }))
}

// ─── Roster ──────────────────────────────────────────────────

/// List all household members. Marked no-store so clients always see the
/// current eaten/away state.
async fn list_users(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let users = state.db.list_users().await?;
    Ok(([(header::CACHE_CONTROL, "no-store")], Json(users)))
}

/// Toggle the caller's away state. Device tokens are stripped from the
/// returned roster.
async fn toggle_away(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<SanitizedUser>>> {
    let users = state
        .meals
        .toggle_away(&user.uid, chrono::Utc::now())
        .await?;

    Ok(Json(users.iter().map(SanitizedUser::from).collect()))
}

/// Mark the caller as having eaten. 400 if the caller is away.
async fn mark_eaten(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<User>>> {
    let users = state
        .meals
        .mark_eaten(&user.uid, chrono::Utc::now())
        .await?;

    Ok(Json(users))
}

/// Manual trigger for the daily reset. Shares the guarded path with the
/// midnight timer, so repeating it within a day cannot double-charge.
async fn reset_eaten(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>> {
    let outcome = state.meals.daily_reset(chrono::Utc::now()).await?;
    tracing::info!(
        already_ran = outcome.already_ran,
        meals_missed = outcome.meals_missed,
        "Manual reset requested"
    );

    Ok(Json(state.db.list_users().await?))
}

// ─── Schedule ────────────────────────────────────────────────

/// Get the meal schedule (created with defaults on first read).
async fn get_schedule(State(state): State<Arc<AppState>>) -> Result<Json<Schedule>> {
    Ok(Json(state.db.get_or_create_schedule().await?))
}

/// Partially update the meal schedule. Provided fields must be HH:MM.
async fn put_schedule(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<SchedulePatch>,
) -> Result<Json<Schedule>> {
    // Reject malformed times before touching the store.
    for time in [&patch.lunch_time, &patch.dinner_time].into_iter().flatten() {
        crate::models::schedule::validate_time_string(time)?;
    }

    let mut schedule = state.db.get_or_create_schedule().await?;
    schedule.apply_patch(patch)?;
    state.db.set_schedule(&schedule).await?;

    Ok(Json(schedule))
}

// ─── Food Finished ───────────────────────────────────────────

/// Report that the food is finished and notify the household.
async fn report_food_finished(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<FinishedReport>> {
    let report = state.meals.report_food_finished(&user.uid).await?;
    Ok(Json(report))
}

// SPDX-License-Identifier: MIT

use mealboard::config::Config;
use mealboard::db::FirestoreDb;
use mealboard::routes::create_router;
use mealboard::services::{IdentityVerifier, MealService, PushService};
use mealboard::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection (emulator).
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Bearer token accepted by the mock identity verifier.
#[allow(dead_code)]
pub fn mock_token(uid: &str) -> String {
    format!("Bearer mock:{uid}")
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    build_test_app(test_db_offline())
}

/// Create a test app backed by the given database.
#[allow(dead_code)]
pub fn build_test_app(db: FirestoreDb) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let push = Arc::new(PushService::new_mock());
    let meals = MealService::new(db.clone(), push);

    let state = Arc::new(AppState {
        config,
        db,
        identity_verifier: Arc::new(IdentityVerifier::new_mock()),
        meals,
    });

    (create_router(state.clone()), state)
}

// SPDX-License-Identifier: MIT

//! Mealboard: track who in the household has eaten.
//!
//! This crate provides the backend API for marking meals as eaten, tracking
//! away periods and missed meals, and pushing "food finished" notifications.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use db::FirestoreDb;
use services::{IdentityVerifier, MealService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub identity_verifier: Arc<IdentityVerifier>,
    pub meals: MealService,
}

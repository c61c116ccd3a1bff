// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod schedule;
pub mod user;

pub use schedule::{Schedule, SchedulePatch};
pub use user::{MealRecord, MealStatus, MealType, SanitizedUser, User};

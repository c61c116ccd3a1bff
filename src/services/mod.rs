// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod identity;
pub mod meals;
pub mod push;
pub mod scheduler;

pub use identity::{IdentityError, IdentityVerifier, VerifiedIdentity};
pub use meals::{FinishedReport, MealService, ResetOutcome};
pub use push::PushService;

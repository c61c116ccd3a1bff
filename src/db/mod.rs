//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Singleton collection holding the one schedule document
    pub const SCHEDULE: &str = "schedule";
}

/// Document ID of the singleton schedule record.
pub const SCHEDULE_DOC_ID: &str = "current";

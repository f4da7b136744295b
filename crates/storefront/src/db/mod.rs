//! In-memory data stores for the storefront.
//!
//! Nothing here survives a restart. Each store is constructed once at
//! startup, owned by [`AppState`](crate::state::AppState) and guarded by its
//! own `RwLock`, so concurrent signups and bookings are serialized per store.
//!
//! ## Stores
//!
//! - [`users::UserRepository`] - accounts keyed by email, with password hashes
//! - [`appointments::AppointmentRepository`] - append-only repair bookings

pub mod appointments;
pub mod users;

use thiserror::Error;

/// Errors returned by the stores.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

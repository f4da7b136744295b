//! User domain types.

use mauro_core::{Email, UserId};

/// A registered storefront account (domain type).
///
/// The password hash lives only inside the user store and is never part of
/// this type.
#[derive(Debug, Clone)]
pub struct User {
    /// Sequential user ID.
    pub id: UserId,
    /// Email address, unique across accounts.
    pub email: Email,
}

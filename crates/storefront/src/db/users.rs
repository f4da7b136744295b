//! User store.
//!
//! Accounts are keyed by [`Email`]; the email is unique and an account is
//! never updated or deleted once created.

use std::collections::HashMap;

use tokio::sync::RwLock;

use mauro_core::{Email, UserId};

use super::RepositoryError;
use crate::models::user::User;

/// A stored account: the public user plus its password hash.
#[derive(Debug, Clone)]
struct UserRecord {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
struct UserTable {
    by_email: HashMap<Email, UserRecord>,
    next_id: u64,
}

/// Process-lifetime store of storefront accounts.
#[derive(Debug, Default)]
pub struct UserRepository {
    table: RwLock<UserTable>,
}

impl UserRepository {
    /// Create an empty user store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an account exists for this email.
    pub async fn exists(&self, email: &Email) -> bool {
        self.table.read().await.by_email.contains_key(email)
    }

    /// Create a new user with email and password hash.
    ///
    /// The existence check and the insert happen under one write lock, so two
    /// concurrent signups for the same email cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create_with_password(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut table = self.table.write().await;

        if table.by_email.contains_key(email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        table.next_id += 1;
        let user = User {
            id: UserId::new(table.next_id),
            email: email.clone(),
        };

        table.by_email.insert(
            email.clone(),
            UserRecord {
                user: user.clone(),
                password_hash: password_hash.to_owned(),
            },
        );

        Ok(user)
    }

    /// Get a user together with their password hash.
    ///
    /// Returns `None` if no account exists for the email.
    pub async fn get_password_hash(&self, email: &Email) -> Option<(User, String)> {
        self.table
            .read()
            .await
            .by_email
            .get(email)
            .map(|record| (record.user.clone(), record.password_hash.clone()))
    }

    /// Number of registered accounts.
    pub async fn len(&self) -> usize {
        self.table.read().await.by_email.len()
    }

    /// Whether no account has been registered yet.
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.by_email.is_empty()
    }
}

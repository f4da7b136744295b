//! Authentication service.
//!
//! Email + password accounts. Passwords are stored as Argon2id PHC strings;
//! verification succeeds only when the submitted password is exactly the one
//! given at signup.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use mauro_core::Email;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::User;

/// Authentication service.
///
/// Handles user registration and credential verification against the user store.
pub struct AuthService<'a> {
    users: &'a UserRepository,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a UserRepository) -> Self {
        Self { users }
    }

    /// Whether an account already exists for `email`.
    ///
    /// Unparseable input never matches an account.
    pub async fn exists(&self, email: &str) -> bool {
        match Email::parse(email) {
            Ok(email) => self.users.exists(&email).await,
            Err(_) => false,
        }
    }

    /// Register a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::MissingPassword` if the password is blank.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        // Skip the hashing cost for an email we already know is taken; the
        // insert below re-checks under the write lock.
        if self.users.exists(&email).await {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(password.to_owned()).await?;

        let user = self
            .users
            .create_with_password(&email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Verify an email/password pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown,
    /// malformed, or the password does not match.
    pub async fn verify(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;
        if password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password.to_owned(), password_hash).await?;

        Ok(user)
    }
}

/// Validate password meets requirements.
///
/// Only presence is required; any non-blank password is accepted.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.trim().is_empty() {
        return Err(AuthError::MissingPassword);
    }
    Ok(())
}

/// Hash a password using Argon2id on the blocking pool.
async fn hash_password(password: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)
    })
    .await
    .map_err(|_| AuthError::PasswordHash)?
}

/// Verify a password against a hash on the blocking pool.
async fn verify_password(password: String, hash: String) -> Result<(), AuthError> {
    tokio::task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&hash).map_err(|_| AuthError::InvalidCredentials)?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)
    })
    .await
    .map_err(|_| AuthError::PasswordHash)?
}

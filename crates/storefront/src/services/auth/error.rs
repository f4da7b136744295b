//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] mauro_core::EmailError),

    /// Password field left empty.
    #[error("password is required")]
    MissingPassword,

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Whether this is a problem with the submitted form rather than the server.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self, Self::PasswordHash)
    }

    /// One-shot notice shown to the visitor after a rejected form.
    #[must_use]
    pub const fn flash_message(&self) -> &'static str {
        match self {
            Self::InvalidEmail(_) => "Informe um e-mail válido.",
            Self::MissingPassword => "Informe uma senha.",
            Self::InvalidCredentials => "Credenciais inválidas!",
            Self::UserAlreadyExists => "E-mail já cadastrado!",
            Self::PasswordHash => "Não foi possível concluir a operação. Tente novamente.",
        }
    }
}

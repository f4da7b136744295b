//! Shared page shell.
//!
//! Every HTML page renders `templates/base.html`: the navbar (which depends on
//! whether someone is logged in), the location banner, the pending flash
//! messages and the route's own content block. Route templates embed a
//! [`PageShell`] built by [`PageShell::load`] and only add their own fields.

use tower_sessions::Session;

use crate::middleware::{CspNonce, take_flashes};
use crate::models::CurrentUser;

/// Banner on the signup page.
pub const SIGNUP_BANNER: &str = "Mauro Business Store";

/// Banner on the login page.
pub const LOGIN_BANNER: &str = "Área de Acesso";

/// Banner on the booking page.
pub const SCHEDULE_BANNER: &str = "Setor de Agendamentos";

/// Data the base template needs on every page.
#[derive(Debug, Clone)]
pub struct PageShell {
    /// Logged-in user, if any.
    pub user: Option<CurrentUser>,
    /// Location banner text.
    pub location: String,
    /// Flash messages drained from the session for this render.
    pub flashes: Vec<String>,
    /// CSP nonce for the inline style and script.
    pub nonce: String,
}

impl PageShell {
    /// Build the shell, consuming the session's pending flash messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the flash queue cannot be read from the session.
    pub async fn load(
        session: &Session,
        user: Option<CurrentUser>,
        location: impl Into<String>,
        nonce: &CspNonce,
    ) -> Result<Self, tower_sessions::session::Error> {
        Ok(Self {
            user,
            location: location.into(),
            flashes: take_flashes(session).await?,
            nonce: nonce.value().to_owned(),
        })
    }

    /// Whether the navbar shows the logged-in links.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

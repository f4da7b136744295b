//! One-shot flash messages stored in the session.
//!
//! Handlers queue a notice with [`push_flash`]; the next page render drains
//! the queue with [`take_flashes`], so each message is shown exactly once.

use tower_sessions::Session;

use crate::models::session_keys;

/// Queue a message for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn push_flash(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let mut messages: Vec<String> = session
        .get(session_keys::FLASH_MESSAGES)
        .await?
        .unwrap_or_default();
    messages.push(message.into());
    session.insert(session_keys::FLASH_MESSAGES, messages).await
}

/// Drain all queued messages, oldest first.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn take_flashes(session: &Session) -> Result<Vec<String>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<String>>(session_keys::FLASH_MESSAGES)
        .await?
        .unwrap_or_default())
}

//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /          - Home page (product showcase, location banner)
//! GET  /health    - Health check
//!
//! # Auth
//! GET  /signup    - Signup page
//! POST /signup    - Signup action
//! GET  /login     - Login page
//! POST /login     - Login action
//! GET  /logout    - Logout action (requires auth)
//!
//! # Booking (requires auth)
//! GET  /agendar   - Booking form and the user's bookings
//! POST /agendar   - Book an appointment
//! ```

pub mod auth;
pub mod home;
pub mod schedule;

use axum::{Form, Router, extract::rejection::FormRejection, routing::get};

use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route(
            "/agendar",
            get(schedule::schedule_page).post(schedule::schedule),
        )
        .route("/health", get(health))
}

/// Unwrap a submitted form, treating an unreadable body as an empty form.
///
/// A missing or wrong `Content-Type` then gets the same flash and re-render
/// as blank fields instead of a bare 415.
pub(crate) fn form_or_default<T: Default>(form: Result<Form<T>, FormRejection>) -> T {
    match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::info!(error = %rejection, "Unreadable form submission");
            T::default()
        }
    }
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}

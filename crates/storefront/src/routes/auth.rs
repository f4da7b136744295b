//! Authentication route handlers.
//!
//! Signup, login and logout. Rejected forms are re-rendered with a flash
//! message; they never produce an error page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{
    CspNonce, LOGIN_PATH, OptionalAuth, RequireAuth, clear_current_user, push_flash,
    set_current_user,
};
use crate::models::CurrentUser;
use crate::page::{LOGIN_BANNER, PageShell, SIGNUP_BANNER};
use crate::routes::form_or_default;
use crate::state::AppState;

/// Flash shown after a successful signup.
pub const SIGNUP_SUCCESS: &str = "Cadastro realizado! Faça login.";

// =============================================================================
// Form Types
// =============================================================================

/// Signup form data. Missing fields arrive as empty strings.
#[derive(Debug, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login form data. Missing fields arrive as empty strings.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub shell: PageShell,
    /// Previously typed email, kept when the form is re-rendered.
    pub email: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub shell: PageShell,
    /// Previously typed email, kept when the form is re-rendered.
    pub email: String,
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page(
    OptionalAuth(user): OptionalAuth,
    session: Session,
    nonce: CspNonce,
) -> Result<SignupTemplate> {
    Ok(SignupTemplate {
        shell: PageShell::load(&session, user, SIGNUP_BANNER, &nonce).await?,
        email: String::new(),
    })
}

/// Handle signup form submission.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    nonce: CspNonce,
    form: std::result::Result<Form<SignupForm>, FormRejection>,
) -> Result<Response> {
    let form = form_or_default(form);
    match state.auth().register(&form.email, &form.password).await {
        Ok(_) => {
            push_flash(&session, SIGNUP_SUCCESS).await?;
            Ok(Redirect::to(LOGIN_PATH).into_response())
        }
        Err(e) if e.is_user_error() => {
            tracing::info!(error = %e, "Signup rejected");
            push_flash(&session, e.flash_message()).await?;

            Ok(SignupTemplate {
                shell: PageShell::load(&session, user, SIGNUP_BANNER, &nonce).await?,
                email: form.email,
            }
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    session: Session,
    nonce: CspNonce,
) -> Result<LoginTemplate> {
    Ok(LoginTemplate {
        shell: PageShell::load(&session, user, LOGIN_BANNER, &nonce).await?,
        email: String::new(),
    })
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    nonce: CspNonce,
    form: std::result::Result<Form<LoginForm>, FormRejection>,
) -> Result<Response> {
    let form = form_or_default(form);
    match state.auth().verify(&form.email, &form.password).await {
        Ok(verified) => {
            set_current_user(&session, &CurrentUser::from(&verified)).await?;
            set_sentry_user(&verified.id, Some(verified.email.as_str()));
            tracing::info!(user_id = %verified.id, "User logged in");

            Ok(Redirect::to("/").into_response())
        }
        Err(e) if e.is_user_error() => {
            tracing::info!(error = %e, "Login rejected");
            push_flash(&session, e.flash_message()).await?;

            Ok(LoginTemplate {
                shell: PageShell::load(&session, user, LOGIN_BANNER, &nonce).await?,
                email: form.email,
            }
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Removes the user and destroys the whole session.
pub async fn logout(RequireAuth(user): RequireAuth, session: Session) -> Redirect {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session user: {}", e);
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    clear_sentry_user();
    tracing::info!(user_id = %user.id, "User logged out");

    Redirect::to("/")
}

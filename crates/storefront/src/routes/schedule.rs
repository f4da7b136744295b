//! Appointment booking route handlers.
//!
//! Both handlers require a logged-in user; anonymous visitors are sent to
//! the login page by [`RequireAuth`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::{IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tower_sessions::Session;
use tracing::instrument;

use mauro_core::ServiceType;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::{CspNonce, RequireAuth, push_flash};
use crate::models::{Appointment, CurrentUser};
use crate::page::{PageShell, SCHEDULE_BANNER};
use crate::routes::form_or_default;
use crate::state::AppState;

/// Date format of the HTML `<input type="date">` value.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Booking form data. Missing fields arrive as empty strings.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleForm {
    #[serde(default)]
    pub servico: String,
    #[serde(default)]
    pub data: String,
}

/// A booking form that could not be accepted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("unknown or missing service")]
    InvalidService,
    #[error("missing or malformed date")]
    InvalidDate,
}

impl BookingError {
    /// Flash message shown above the re-rendered form.
    #[must_use]
    pub const fn flash_message(&self) -> &'static str {
        match self {
            Self::InvalidService => "Selecione um serviço válido.",
            Self::InvalidDate => "Informe uma data válida.",
        }
    }
}

impl ScheduleForm {
    /// Validate the submitted service and date.
    ///
    /// # Errors
    ///
    /// Returns the first field that is blank or not understood.
    pub fn parse(&self) -> std::result::Result<(ServiceType, NaiveDate), BookingError> {
        let service =
            ServiceType::parse(&self.servico).map_err(|_| BookingError::InvalidService)?;
        let date = NaiveDate::parse_from_str(self.data.trim(), DATE_FORMAT)
            .map_err(|_| BookingError::InvalidDate)?;
        Ok((service, date))
    }
}

/// Booking page template.
#[derive(Template, WebTemplate)]
#[template(path = "schedule.html")]
pub struct ScheduleTemplate {
    pub shell: PageShell,
    pub services: [ServiceType; 3],
    /// The logged-in user's bookings, oldest first.
    pub appointments: Vec<Appointment>,
}

impl ScheduleTemplate {
    async fn load(
        state: &AppState,
        session: &Session,
        user: CurrentUser,
        nonce: &CspNonce,
    ) -> Result<Self> {
        let appointments = state.appointments().list_for_owner(&user.email).await;

        Ok(Self {
            shell: PageShell::load(session, Some(user), SCHEDULE_BANNER, nonce).await?,
            services: ServiceType::ALL,
            appointments,
        })
    }
}

/// Display the booking form.
pub async fn schedule_page(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    nonce: CspNonce,
) -> Result<ScheduleTemplate> {
    ScheduleTemplate::load(&state, &session, user, &nonce).await
}

/// Handle booking form submission.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn schedule(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    nonce: CspNonce,
    form: std::result::Result<Form<ScheduleForm>, FormRejection>,
) -> Result<Response> {
    let (service, date) = match form_or_default(form).parse() {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::info!(error = %e, "Booking rejected");
            push_flash(&session, e.flash_message()).await?;
            let page = ScheduleTemplate::load(&state, &session, user, &nonce).await?;
            return Ok(page.into_response());
        }
    };

    let appointment = state.appointments().append(&user.email, service, date).await;
    tracing::info!(appointment_id = %appointment.id, %service, %date, "Appointment booked");

    let date = date.format(DATE_FORMAT).to_string();
    add_breadcrumb(
        "booking",
        "Appointment booked",
        Some(&[("service", service.label()), ("date", date.as_str())]),
    );
    push_flash(
        &session,
        format!("Agendamento de {service} confirmado para {date}!"),
    )
    .await?;

    Ok(Redirect::to("/").into_response())
}

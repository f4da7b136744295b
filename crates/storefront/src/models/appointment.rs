//! Appointment domain types.

use chrono::{DateTime, NaiveDate, Utc};

use mauro_core::{AppointmentId, Email, ServiceType};

/// A booked technical-assistance appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    /// Sequential ID, also the insertion order.
    pub id: AppointmentId,
    /// Email of the account that booked it.
    pub owner: Email,
    /// Requested service.
    pub service: ServiceType,
    /// Requested calendar date.
    pub date: NaiveDate,
    /// When the booking was made.
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// When the booking was made, as listed under "Meus agendamentos".
    #[must_use]
    pub fn booked_at(&self) -> String {
        self.created_at.format("%d/%m/%Y %H:%M UTC").to_string()
    }
}

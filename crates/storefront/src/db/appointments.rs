//! Appointment store.
//!
//! Append-only: bookings are never updated or removed, and no validation
//! happens here (past dates, duplicates and capacity are all accepted).

use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use mauro_core::{AppointmentId, Email, ServiceType};

use crate::models::Appointment;

/// Process-lifetime list of appointments, in insertion order.
#[derive(Debug, Default)]
pub struct AppointmentRepository {
    appointments: RwLock<Vec<Appointment>>,
}

impl AppointmentRepository {
    /// Create an empty appointment store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a booking for `owner`.
    pub async fn append(&self, owner: &Email, service: ServiceType, date: NaiveDate) -> Appointment {
        let mut appointments = self.appointments.write().await;

        let appointment = Appointment {
            id: AppointmentId::new(appointments.len() as u64 + 1),
            owner: owner.clone(),
            service,
            date,
            created_at: Utc::now(),
        };
        appointments.push(appointment.clone());

        appointment
    }

    /// Bookings made by `owner`, oldest first.
    pub async fn list_for_owner(&self, owner: &Email) -> Vec<Appointment> {
        self.appointments
            .read()
            .await
            .iter()
            .filter(|a| &a.owner == owner)
            .cloned()
            .collect()
    }

    /// All bookings, oldest first.
    pub async fn list(&self) -> Vec<Appointment> {
        self.appointments.read().await.clone()
    }

    /// Number of bookings.
    pub async fn len(&self) -> usize {
        self.appointments.read().await.len()
    }

    /// Whether nothing has been booked yet.
    pub async fn is_empty(&self) -> bool {
        self.appointments.read().await.is_empty()
    }
}

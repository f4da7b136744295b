//! Technical-assistance services that can be booked.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a form value does not name a known service.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown service: {0:?}")]
pub struct ServiceTypeError(pub String);

/// A bookable assistance service.
///
/// The booking form submits the customer-facing label (e.g. `Troca de
/// Bateria`), so [`ServiceType::parse`] and [`fmt::Display`] both use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    ScreenReplacement,
    BatteryReplacement,
    SoftwareSetup,
}

impl ServiceType {
    /// All services, in the order the booking form lists them.
    pub const ALL: [Self; 3] = [
        Self::ScreenReplacement,
        Self::BatteryReplacement,
        Self::SoftwareSetup,
    ];

    /// Customer-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ScreenReplacement => "Troca de Tela",
            Self::BatteryReplacement => "Troca de Bateria",
            Self::SoftwareSetup => "Configuração de Software",
        }
    }

    /// Parse a service from its label as submitted by the booking form.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceTypeError`] if the trimmed input matches no label.
    pub fn parse(s: &str) -> Result<Self, ServiceTypeError> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|service| service.label() == s)
            .ok_or_else(|| ServiceTypeError(s.to_owned()))
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

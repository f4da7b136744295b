//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::db::appointments::AppointmentRepository;
use crate::db::users::UserRepository;
use crate::services::auth::AuthService;
use crate::services::geolocation::GeoLocator;

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to build geolocation client: {0}")]
    Geolocation(#[from] reqwest::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The stores inside are created
/// once here and live for the whole process.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    users: UserRepository,
    appointments: AppointmentRepository,
    geo: GeoLocator,
}

impl AppState {
    /// Create a new application state with empty stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the geolocation HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let geo = GeoLocator::new(&config.geolocation)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                users: UserRepository::new(),
                appointments: AppointmentRepository::new(),
                geo,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the user store.
    #[must_use]
    pub fn users(&self) -> &UserRepository {
        &self.inner.users
    }

    /// Get a reference to the appointment store.
    #[must_use]
    pub fn appointments(&self) -> &AppointmentRepository {
        &self.inner.appointments
    }

    /// Get a reference to the geolocation client.
    #[must_use]
    pub fn geo(&self) -> &GeoLocator {
        &self.inner.geo
    }

    /// Authentication service over this state's user store.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.users())
    }
}

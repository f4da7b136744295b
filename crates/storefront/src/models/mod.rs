//! Domain models for the storefront.
//!
//! - [`user::User`] - a registered account
//! - [`session::CurrentUser`] - the identity bound to a browser session
//! - [`appointment::Appointment`] - a booked repair/setup service
//! - [`product::Product`] - an entry of the static showcase catalog

pub mod appointment;
pub mod product;
pub mod session;
pub mod user;

pub use appointment::Appointment;
pub use product::Product;
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;

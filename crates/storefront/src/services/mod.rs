//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Account registration and credential verification
//! - `geolocation` - Visitor location lookup for the page banner

pub mod auth;
pub mod geolocation;

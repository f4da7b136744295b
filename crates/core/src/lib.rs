//! Mauro Business Core - Shared domain types.
//!
//! Types used by the storefront binary and its tests:
//! - [`Email`] - validated identity key for accounts
//! - [`ServiceType`] - bookable technical-assistance services
//! - [`Price`] - decimal prices with pt-BR formatting
//! - [`UserId`], [`AppointmentId`] - type-safe sequential IDs
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP, no shared state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

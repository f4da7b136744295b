//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded on the span and Sentry scope)
//! 4. CSP nonce (generated per request)
//! 5. Security headers (CSP built with that nonce)
//! 6. Session layer (tower-sessions, in-memory store, signed cookie)
//!
//! Authentication is enforced per handler by the `RequireAuth` extractor.

pub mod auth;
pub mod csp;
pub mod flash;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{LOGIN_PATH, OptionalAuth, RequireAuth, clear_current_user, set_current_user};
pub use csp::{CspNonce, csp_nonce_middleware};
pub use flash::{push_flash, take_flashes};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;

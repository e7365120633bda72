//! HTTP middleware and extractors for the portal.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with in-memory store)
//!
//! Access control is done with extractors rather than layers: role guards
//! for the HTML dashboards, bearer tokens for the JSON API.

pub mod auth;
pub mod bearer;
pub mod session;

pub use auth::{
    OptionalUser, RequireAdmin, RequireStoreOwner, RequireUser, clear_current_user,
    set_current_user,
};
pub use bearer::{BearerAdmin, BearerUser, bearer_token};
pub use session::create_session_layer;

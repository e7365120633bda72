//! Admin area: dashboard plus user and store management.
//!
//! Every handler takes [`RequireAdmin`](crate::middleware::RequireAdmin),
//! so non-admins are redirected to the login page.

pub mod dashboard;
pub mod stores;
pub mod users;

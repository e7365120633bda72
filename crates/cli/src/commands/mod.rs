//! Subcommand implementations.
//!
//! Each command returns the text to print on success. Failures come back as
//! [`CliError`] and `main` reports them and exits with status 1.

pub mod auth;
pub mod local;
pub mod ratings;
pub mod stores;
pub mod users;

use thiserror::Error;

use store_ratings_client::{ApiClient, ApiError, ClientConfig, ConfigError, FileStorage};
use store_ratings_core::stars::{STAR_COUNT, StarGlyph, StarRangeError, render_stars, to_text};
use store_ratings_core::validation::FieldErrors;

/// Client used by every networked command.
pub type Client = ApiClient<FileStorage>;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{}", api_message(.0))]
    Api(#[from] ApiError),

    /// Client-side validation failed; nothing was sent.
    #[error("Validation failed")]
    Invalid(FieldErrors),

    #[error("Not logged in. Run `sr-cli login` first.")]
    NotLoggedIn,

    #[error(transparent)]
    Stars(#[from] StarRangeError),
}

impl CliError {
    /// Per-field messages, from local validation or a 422 response.
    #[must_use]
    pub fn field_messages(&self) -> Vec<(String, String)> {
        match self {
            Self::Invalid(errors) => errors
                .iter()
                .map(|(field, message)| (field.key().to_string(), message.to_string()))
                .collect(),
            Self::Api(e) => e.field_errors(),
            _ => Vec::new(),
        }
    }
}

fn api_message(error: &ApiError) -> String {
    match (error.status(), error.server_message()) {
        (Some(status), Some(message)) => format!("{message} (HTTP {status})"),
        _ => error.to_string(),
    }
}

/// Build the client from `STORE_RATINGS_*` environment variables.
///
/// # Errors
///
/// Returns `CliError::Config` for an invalid API URL.
pub fn connect() -> Result<Client, CliError> {
    let config = ClientConfig::from_env()?;
    tracing::debug!(
        api_url = %config.api_url,
        session = %config.session_file.display(),
        "Using API"
    );
    Ok(ApiClient::new(
        &config.api_url,
        FileStorage::new(config.session_file),
    )?)
}

/// Fail with the collected messages unless `errors` is empty.
fn ensure_valid(errors: FieldErrors) -> Result<(), CliError> {
    errors.into_result().map_err(CliError::Invalid)
}

/// Glyph row for an average, empty stars when it cannot be rendered.
fn star_text(rating: f64) -> String {
    to_text(&render_stars(rating).unwrap_or([StarGlyph::Empty; STAR_COUNT]))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use store_ratings_core::validation::Field;

    #[test]
    fn test_star_text() {
        assert_eq!(star_text(4.5), "★★★★⯪");
        assert_eq!(star_text(9.0), "☆☆☆☆☆");
    }

    #[test]
    fn test_field_messages_from_local_validation() {
        let mut errors = FieldErrors::new();
        errors.insert(Field::Rating, "Please select a rating between 1 and 5");
        let messages = CliError::Invalid(errors).field_messages();
        assert_eq!(
            messages,
            [(
                "rating".to_string(),
                "Please select a rating between 1 and 5".to_string()
            )]
        );
    }

    #[test]
    fn test_api_error_message() {
        let err = CliError::from(ApiError::Api {
            status: 409,
            body: json!({ "message": "A user with this email already exists" }),
        });
        assert_eq!(
            err.to_string(),
            "A user with this email already exists (HTTP 409)"
        );
    }
}

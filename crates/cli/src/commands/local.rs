//! Offline commands: field validation and star rendering.

use store_ratings_core::stars::{StarCounts, render_stars, to_text};
use store_ratings_core::validation::{FormMode, UserDraft, validate_user};

use super::{CliError, ensure_valid};

/// Check user form fields the way the portal does.
///
/// Without `--password` the fields are checked as an edit, which never
/// looks at the password.
///
/// # Errors
///
/// Returns `CliError::Invalid` listing every failing field.
pub fn validate_user_fields(
    name: &str,
    email: &str,
    address: &str,
    password: Option<&str>,
) -> Result<String, CliError> {
    let mode = if password.is_some() {
        FormMode::Create
    } else {
        FormMode::Edit
    };
    ensure_valid(validate_user(
        &UserDraft {
            name,
            email: email.trim(),
            address,
            password,
        },
        mode,
    ))?;
    Ok("All fields are valid".to_string())
}

/// Render `rating` as a row of five glyphs.
///
/// # Errors
///
/// Returns `CliError::Stars` for values outside 0 to 5.
pub fn stars(rating: f64) -> Result<String, CliError> {
    let glyphs = render_stars(rating)?;
    let counts = StarCounts::of(&glyphs);
    Ok(format!(
        "{}  ({} full, {} half, {} empty)",
        to_text(&glyphs),
        counts.full,
        counts.half,
        counts.empty
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use store_ratings_core::validation::Field;

    #[test]
    fn test_valid_user() {
        let output = validate_user_fields(
            "Alexandra Montgomery-Smith",
            "alex@example.com",
            "",
            Some("Abc12345!"),
        )
        .unwrap();
        assert_eq!(output, "All fields are valid");
    }

    #[test]
    fn test_invalid_user_lists_fields() {
        let err = validate_user_fields("short", "a@b", "", Some("weak")).unwrap_err();
        let CliError::Invalid(errors) = err else {
            panic!("expected validation failure");
        };
        assert!(errors.contains(Field::Name));
        assert!(errors.contains(Field::Email));
        assert!(errors.contains(Field::Password));
    }

    #[test]
    fn test_password_skipped_without_flag() {
        validate_user_fields("Alexandra Montgomery-Smith", "alex@example.com", "", None).unwrap();
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(3.5).unwrap(), "★★★⯪☆  (3 full, 1 half, 1 empty)");
        assert!(matches!(stars(5.5), Err(CliError::Stars(_))));
    }
}

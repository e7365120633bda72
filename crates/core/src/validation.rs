//! Field validation for the user, signup, store and rating forms.
//!
//! Every rule runs independently and all failures are collected into a
//! [`FieldErrors`] map, so a form can show every problem at once. An empty
//! map means the input is valid.
//!
//! ```
//! use store_ratings_core::validation::{Field, FormMode, UserDraft, validate_user};
//!
//! let draft = UserDraft {
//!     name: "short",
//!     email: "a@b",
//!     address: "",
//!     password: Some("Abc12345!"),
//! };
//! let errors = validate_user(&draft, FormMode::Create);
//! assert_eq!(errors.get(Field::Name), Some("Name must be at least 20 characters"));
//! assert_eq!(errors.get(Field::Email), Some("Please enter a valid email address"));
//! assert!(errors.get(Field::Password).is_none());
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::RatingValue;
use crate::types::{Email, StoreCategory, UserId};

pub const NAME_MIN_CHARS: usize = 20;
pub const NAME_MAX_CHARS: usize = 60;
pub const ADDRESS_MAX_CHARS: usize = 400;
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*";

/// Allowed alphabet and length; the uppercase and special-character
/// requirements are checked separately.
static PASSWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9!@#$%^&*]{8,16}$").expect("Invalid regex"));

/// User-facing messages, one per rule.
pub mod messages {
    pub const NAME_TOO_SHORT: &str = "Name must be at least 20 characters";
    pub const NAME_TOO_LONG: &str = "Name cannot exceed 60 characters";
    pub const ADDRESS_TOO_LONG: &str = "Address cannot exceed 400 characters";
    pub const INVALID_EMAIL: &str = "Please enter a valid email address";
    pub const WEAK_PASSWORD: &str = "Password must be 8-16 characters with at least one uppercase letter and one special character";
    pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
    pub const MISSING_CATEGORY: &str = "Please select a category";
    pub const MISSING_OWNER: &str = "Please select a store owner";
    pub const INVALID_RATING: &str = "Please select a rating between 1 and 5";
}

/// Form fields that can carry an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Email,
    Address,
    Password,
    ConfirmPassword,
    Category,
    OwnerId,
    Rating,
}

impl Field {
    /// Form/JSON key of the field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Address => "address",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::Category => "category",
            Self::OwnerId => "ownerId",
            Self::Rating => "rating",
        }
    }
}

/// Field name to error message. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Record an error, keeping the first message if the field already has one.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// `Ok(())` when empty, otherwise the errors.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    fn check(&mut self, field: Field, outcome: Option<&'static str>) {
        if let Some(message) = outcome {
            self.insert(field, message);
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {message}", field.key())?;
            first = false;
        }
        Ok(())
    }
}

/// Whether a form creates a record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

// =============================================================================
// Single-field rules
// =============================================================================

/// Name must be 20-60 characters.
#[must_use]
pub fn check_name(name: &str) -> Option<&'static str> {
    let len = name.chars().count();
    if len < NAME_MIN_CHARS {
        Some(messages::NAME_TOO_SHORT)
    } else if len > NAME_MAX_CHARS {
        Some(messages::NAME_TOO_LONG)
    } else {
        None
    }
}

/// Address may be empty but not longer than 400 characters.
#[must_use]
pub fn check_address(address: &str) -> Option<&'static str> {
    (address.chars().count() > ADDRESS_MAX_CHARS).then_some(messages::ADDRESS_TOO_LONG)
}

#[must_use]
pub fn check_email(email: &str) -> Option<&'static str> {
    Email::parse(email).err().map(|_| messages::INVALID_EMAIL)
}

/// 8-16 characters from `[a-zA-Z0-9!@#$%^&*]`, at least one uppercase
/// letter and one special character.
#[must_use]
pub fn check_password(password: &str) -> Option<&'static str> {
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_special = password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c));

    if PASSWORD_RE.is_match(password) && has_upper && has_special {
        None
    } else {
        Some(messages::WEAK_PASSWORD)
    }
}

// =============================================================================
// Form validators
// =============================================================================

/// Fields of the user form (admin create/edit, signup).
#[derive(Debug, Clone, Copy)]
pub struct UserDraft<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub address: &'a str,
    /// Ignored in [`FormMode::Edit`]; a missing password fails creation.
    pub password: Option<&'a str>,
}

/// Validate a user form. The password is only checked when creating.
#[must_use]
pub fn validate_user(draft: &UserDraft<'_>, mode: FormMode) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check(Field::Name, check_name(draft.name));
    errors.check(Field::Address, check_address(draft.address));
    errors.check(Field::Email, check_email(draft.email));
    if mode == FormMode::Create {
        errors.check(Field::Password, check_password(draft.password.unwrap_or("")));
    }
    errors
}

/// Validate the signup form: the user rules plus password confirmation.
#[must_use]
pub fn validate_signup(draft: &UserDraft<'_>, confirm_password: &str) -> FieldErrors {
    let mut errors = validate_user(draft, FormMode::Create);
    if draft.password.unwrap_or("") != confirm_password {
        errors.insert(Field::ConfirmPassword, messages::PASSWORD_MISMATCH);
    }
    errors
}

/// Fields of the store form.
#[derive(Debug, Clone, Copy)]
pub struct StoreDraft<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub category: &'a str,
    pub owner_id: Option<UserId>,
}

/// Validate a store form.
///
/// `is_store_owner` decides whether the selected owner exists and has the
/// store owner role.
#[must_use]
pub fn validate_store(
    draft: &StoreDraft<'_>,
    is_store_owner: impl Fn(UserId) -> bool,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.check(Field::Name, check_name(draft.name));
    errors.check(Field::Address, check_address(draft.address));

    if draft.category.trim().parse::<StoreCategory>().is_err() {
        errors.insert(Field::Category, messages::MISSING_CATEGORY);
    }

    if !draft.owner_id.is_some_and(is_store_owner) {
        errors.insert(Field::OwnerId, messages::MISSING_OWNER);
    }

    errors
}

/// Validate a rating picker value.
///
/// # Errors
///
/// Returns a map with the `rating` field set when the value is not 1-5.
pub fn validate_rating(value: i64) -> Result<RatingValue, FieldErrors> {
    RatingValue::new(value).map_err(|_| {
        let mut errors = FieldErrors::new();
        errors.insert(Field::Rating, messages::INVALID_RATING);
        errors
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const GOOD_NAME: &str = "Alexandra Montgomery-Smith";

    fn draft<'a>(name: &'a str, email: &'a str, address: &'a str) -> UserDraft<'a> {
        UserDraft {
            name,
            email,
            address,
            password: Some("Abc12345!"),
        }
    }

    #[test]
    fn test_name_bounds() {
        for len in NAME_MIN_CHARS..=NAME_MAX_CHARS {
            assert_eq!(check_name(&"a".repeat(len)), None, "length {len}");
        }
        assert_eq!(check_name(&"a".repeat(19)), Some(messages::NAME_TOO_SHORT));
        assert_eq!(check_name(&"a".repeat(61)), Some(messages::NAME_TOO_LONG));
        assert_eq!(check_name(""), Some(messages::NAME_TOO_SHORT));
    }

    #[test]
    fn test_name_counts_characters_not_bytes() {
        assert_eq!(check_name(&"é".repeat(20)), None);
        assert_eq!(check_name(&"é".repeat(61)), Some(messages::NAME_TOO_LONG));
    }

    #[test]
    fn test_address_bounds() {
        assert_eq!(check_address(""), None);
        assert_eq!(check_address(&"x".repeat(400)), None);
        assert_eq!(
            check_address(&"x".repeat(401)),
            Some(messages::ADDRESS_TOO_LONG)
        );
    }

    #[test]
    fn test_email_rules() {
        assert_eq!(check_email("a@b.c"), None);
        assert_eq!(check_email("a@b"), Some(messages::INVALID_EMAIL));
        assert_eq!(check_email("a b@c.com"), Some(messages::INVALID_EMAIL));
        assert_eq!(check_email(""), Some(messages::INVALID_EMAIL));
    }

    #[test]
    fn test_password_rules() {
        assert_eq!(check_password("Abc12345!"), None);
        assert_eq!(check_password("abc12345!"), Some(messages::WEAK_PASSWORD));
        assert_eq!(check_password("ABCDEFGH1"), Some(messages::WEAK_PASSWORD));
        assert_eq!(check_password("Ab1!"), Some(messages::WEAK_PASSWORD));
    }

    #[test]
    fn test_password_length_limits() {
        assert_eq!(check_password("Abcdefg!"), None);
        assert_eq!(check_password("Abcdefghijklmno!"), None);
        assert_eq!(
            check_password("Abcdefghijklmnop!"),
            Some(messages::WEAK_PASSWORD)
        );
    }

    #[test]
    fn test_password_rejects_characters_outside_alphabet() {
        assert_eq!(check_password("Abc 12345!"), Some(messages::WEAK_PASSWORD));
        assert_eq!(check_password("Abc12345!?"), Some(messages::WEAK_PASSWORD));
        assert_eq!(check_password("Äbc12345!"), Some(messages::WEAK_PASSWORD));
    }

    #[test]
    fn test_valid_user_has_no_errors() {
        let errors = validate_user(&draft(GOOD_NAME, "a@b.c", "1 Main St"), FormMode::Create);
        assert!(errors.is_empty(), "{errors}");
    }

    #[test]
    fn test_all_failures_reported_together() {
        let bad = UserDraft {
            name: "short",
            email: "not-an-email",
            address: &"x".repeat(401),
            password: Some("weak"),
        };
        let errors = validate_user(&bad, FormMode::Create);
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(Field::Name));
        assert!(errors.contains(Field::Email));
        assert!(errors.contains(Field::Address));
        assert!(errors.contains(Field::Password));
    }

    #[test]
    fn test_edit_never_checks_password() {
        let mut input = draft(GOOD_NAME, "a@b.c", "");
        input.password = Some("weak");
        assert!(validate_user(&input, FormMode::Edit).is_empty());
        input.password = None;
        assert!(validate_user(&input, FormMode::Edit).is_empty());
    }

    #[test]
    fn test_create_requires_password() {
        let mut input = draft(GOOD_NAME, "a@b.c", "");
        input.password = None;
        let errors = validate_user(&input, FormMode::Create);
        assert_eq!(errors.get(Field::Password), Some(messages::WEAK_PASSWORD));
    }

    #[test]
    fn test_signup_confirmation() {
        let input = draft(GOOD_NAME, "a@b.c", "");
        assert!(validate_signup(&input, "Abc12345!").is_empty());
        let errors = validate_signup(&input, "Abc12345?");
        assert_eq!(
            errors.get(Field::ConfirmPassword),
            Some(messages::PASSWORD_MISMATCH)
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_store_requires_category_and_owner() {
        let store = StoreDraft {
            name: "Tech Gadgets Plus Superstore",
            address: "123 Tech Blvd",
            category: "",
            owner_id: None,
        };
        let errors = validate_store(&store, |_| true);
        assert_eq!(errors.get(Field::Category), Some(messages::MISSING_CATEGORY));
        assert_eq!(errors.get(Field::OwnerId), Some(messages::MISSING_OWNER));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_store_owner_must_have_owner_role() {
        let store = StoreDraft {
            name: "Tech Gadgets Plus Superstore",
            address: "",
            category: "Electronics",
            owner_id: Some(UserId::new(1)),
        };
        assert!(validate_store(&store, |id| id == UserId::new(1)).is_empty());
        assert!(validate_store(&store, |_| false).contains(Field::OwnerId));
    }

    #[test]
    fn test_rating_picker() {
        assert_eq!(validate_rating(3).unwrap().get(), 3);
        let errors = validate_rating(0).unwrap_err();
        assert_eq!(errors.get(Field::Rating), Some(messages::INVALID_RATING));
    }

    #[test]
    fn test_field_errors_serialize_as_object() {
        let mut errors = FieldErrors::new();
        errors.insert(Field::OwnerId, "x");
        errors.insert(Field::ConfirmPassword, "y");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["ownerId"], "x");
        assert_eq!(json["confirmPassword"], "y");

        let back: FieldErrors = serde_json::from_value(json).unwrap();
        assert_eq!(back, errors);
    }

    #[test]
    fn test_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.insert(Field::Name, "first");
        errors.insert(Field::Name, "second");
        assert_eq!(errors.get(Field::Name), Some("first"));
    }
}

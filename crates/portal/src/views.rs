//! View models shared by the HTML templates.
//!
//! Handlers convert repository rows into these structs so templates only
//! deal with display-ready values.

use store_ratings_core::session::SessionUser;
use store_ratings_core::stars::{STAR_COUNT, StarGlyph, render_stars};
use store_ratings_core::validation::FieldErrors;
use store_ratings_core::{Rating, Store, User};

use crate::routes::MessageQuery;

/// Values every page needs: the logged-in user and the flash banners.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub user: Option<SessionUser>,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl Page {
    #[must_use]
    pub fn new(user: Option<SessionUser>, query: MessageQuery) -> Self {
        Self {
            user,
            error: query.error.filter(|m| !m.is_empty()),
            success: query.success.filter(|m| !m.is_empty()),
        }
    }

    #[must_use]
    pub fn for_user(user: SessionUser, query: MessageQuery) -> Self {
        Self::new(Some(user), query)
    }

    /// Page with an error banner and no query messages.
    #[must_use]
    pub fn with_error(user: Option<SessionUser>, error: impl Into<String>) -> Self {
        Self {
            user,
            error: Some(error.into()),
            success: None,
        }
    }
}

/// Five star glyphs plus the one-decimal average they stand for.
#[derive(Debug, Clone)]
pub struct StarRow {
    pub glyphs: [StarGlyph; STAR_COUNT],
    pub average: String,
}

impl StarRow {
    /// Render `rating`, falling back to five empty stars when it is out of
    /// range.
    #[must_use]
    pub fn new(rating: f64) -> Self {
        let glyphs = render_stars(rating).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Rendering empty star row");
            [StarGlyph::Empty; STAR_COUNT]
        });
        Self {
            glyphs,
            average: format!("{rating:.1}"),
        }
    }
}

/// Store row for listings and detail pages.
#[derive(Debug, Clone)]
pub struct StoreView {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub category: &'static str,
    pub phone: String,
    pub website: String,
    pub owner_id: i32,
    pub total_ratings: u32,
    pub stars: StarRow,
}

impl From<&Store> for StoreView {
    fn from(store: &Store) -> Self {
        Self {
            id: store.id.as_i32(),
            name: store.name.clone(),
            address: store.address.clone(),
            category: store.category.name(),
            phone: store.phone.clone(),
            website: store.website.clone(),
            owner_id: store.owner_id.as_i32(),
            total_ratings: store.total_ratings,
            stars: StarRow::new(store.avg_rating),
        }
    }
}

/// User row for admin listings.
#[derive(Debug, Clone)]
pub struct UserView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub address: String,
    pub role: &'static str,
    pub role_label: &'static str,
    pub stores_rated: u32,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_i32(),
            name: user.name.clone(),
            email: user.email.to_string(),
            address: user.address.clone(),
            role: user.role.as_str(),
            role_label: user.role.label(),
            stores_rated: user.stores_rated,
        }
    }
}

/// A single rating with the name of whoever (or whatever) it belongs to.
#[derive(Debug, Clone)]
pub struct RatingView {
    pub id: i32,
    /// Rater name on store pages, store name on user pages.
    pub subject: String,
    pub subject_id: i32,
    pub value: u8,
    pub label: &'static str,
    pub comment: Option<String>,
    pub date: String,
    pub stars: StarRow,
}

impl RatingView {
    #[must_use]
    pub fn new(rating: &Rating, subject: &str, subject_id: i32) -> Self {
        Self {
            id: rating.id.as_i32(),
            subject: subject.to_string(),
            subject_id,
            value: rating.rating.get(),
            label: rating.rating.label(),
            comment: rating.comment.clone(),
            date: rating.created_at.format("%b %-d, %Y").to_string(),
            stars: StarRow::new(f64::from(rating.rating.get())),
        }
    }
}

/// Entry of a `<select>` picker.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>, selected: &str) -> Self {
        let value = value.into();
        Self {
            selected: value == selected,
            label: label.into(),
            value,
        }
    }
}

/// Field messages for a re-rendered form.
#[derive(Debug, Clone, Default)]
pub struct FormErrors(FieldErrors);

impl FormErrors {
    /// Message for the field with form key `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(field, _)| field.key() == key)
            .map(|(_, message)| message)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<FieldErrors> for FormErrors {
    fn from(errors: FieldErrors) -> Self {
        Self(errors)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use store_ratings_core::stars::StarCounts;
    use store_ratings_core::validation::Field;

    #[test]
    fn test_star_row_half() {
        let row = StarRow::new(3.5);
        let counts = StarCounts::of(&row.glyphs);
        assert_eq!((counts.full, counts.half, counts.empty), (3, 1, 1));
        assert_eq!(row.average, "3.5");
    }

    #[test]
    fn test_star_row_rounds_text_not_glyphs() {
        let row = StarRow::new(45.0 / 13.0);
        let counts = StarCounts::of(&row.glyphs);
        assert_eq!((counts.full, counts.half, counts.empty), (3, 0, 2));
        assert_eq!(row.average, "3.5");
    }

    #[test]
    fn test_star_row_out_of_range_is_empty() {
        for bad in [-1.0, 5.5, f64::NAN] {
            let row = StarRow::new(bad);
            assert_eq!(row.glyphs, [StarGlyph::Empty; STAR_COUNT]);
        }
    }

    #[test]
    fn test_form_errors_lookup_by_key() {
        let mut errors = FieldErrors::new();
        errors.insert(Field::OwnerId, "Please select a store owner");
        let errors = FormErrors::from(errors);
        assert_eq!(errors.get("ownerId"), Some("Please select a store owner"));
        assert_eq!(errors.get("name"), None);
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_page_drops_empty_messages() {
        let page = Page::new(
            None,
            MessageQuery {
                error: Some(String::new()),
                success: Some("Saved".to_string()),
            },
        );
        assert!(page.error.is_none());
        assert_eq!(page.success.as_deref(), Some("Saved"));
    }
}

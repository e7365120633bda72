//! Star-rating rendering.
//!
//! A rating in `[0, 5]` becomes exactly five glyphs: `floor(r)` full stars,
//! one half star when the fractional part is at least 0.5, and empty stars
//! for the rest.

use serde::Serialize;

/// Number of glyphs in a rendered rating.
pub const STAR_COUNT: usize = 5;

/// Highest renderable rating.
pub const MAX_RATING: f64 = 5.0;

/// One star position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StarGlyph {
    Full,
    Half,
    Empty,
}

impl StarGlyph {
    /// CSS modifier used by the templates.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Full => "star-full",
            Self::Half => "star-half",
            Self::Empty => "star-empty",
        }
    }

    /// Plain-text rendering for terminals.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Full => '★',
            Self::Half => '⯪',
            Self::Empty => '☆',
        }
    }
}

/// Rating outside `[0, 5]` or not a number.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("rating {0} is outside the renderable range 0-5")]
pub struct StarRangeError(pub f64);

/// Render `rating` as five glyphs.
///
/// # Errors
///
/// Returns `StarRangeError` for NaN, infinities, negatives and values above 5.
///
/// # Example
///
/// ```
/// use store_ratings_core::stars::{render_stars, StarGlyph::*};
///
/// assert_eq!(render_stars(3.5).unwrap(), [Full, Full, Full, Half, Empty]);
/// assert!(render_stars(5.5).is_err());
/// ```
pub fn render_stars(rating: f64) -> Result<[StarGlyph; STAR_COUNT], StarRangeError> {
    if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
        return Err(StarRangeError(rating));
    }

    let whole = rating.floor();
    let has_half = rating - whole >= 0.5;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // 0 <= whole <= 5
    let full = whole as usize;

    let mut glyphs = [StarGlyph::Empty; STAR_COUNT];
    for (i, glyph) in glyphs.iter_mut().enumerate() {
        if i < full {
            *glyph = StarGlyph::Full;
        } else if i == full && has_half {
            *glyph = StarGlyph::Half;
        }
    }
    Ok(glyphs)
}

/// Full, half and empty glyph counts of a rendered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StarCounts {
    pub full: usize,
    pub half: usize,
    pub empty: usize,
}

impl StarCounts {
    #[must_use]
    pub fn of(glyphs: &[StarGlyph]) -> Self {
        glyphs.iter().fold(Self::default(), |mut counts, glyph| {
            match glyph {
                StarGlyph::Full => counts.full += 1,
                StarGlyph::Half => counts.half += 1,
                StarGlyph::Empty => counts.empty += 1,
            }
            counts
        })
    }
}

/// Glyph row as a string, e.g. `★★★⯪☆`.
#[must_use]
pub fn to_text(glyphs: &[StarGlyph]) -> String {
    glyphs.iter().map(|g| g.symbol()).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn counts(rating: f64) -> (usize, usize, usize) {
        let c = StarCounts::of(&render_stars(rating).unwrap());
        (c.full, c.half, c.empty)
    }

    #[test]
    fn test_reference_values() {
        assert_eq!(counts(4.5), (4, 1, 0));
        assert_eq!(counts(3.0), (3, 0, 2));
        assert_eq!(counts(0.0), (0, 0, 5));
        assert_eq!(counts(5.0), (5, 0, 0));
    }

    #[test]
    fn test_half_threshold() {
        assert_eq!(counts(3.49), (3, 0, 2));
        assert_eq!(counts(3.5), (3, 1, 1));
        assert_eq!(counts(0.5), (0, 1, 4));
        assert_eq!(counts(4.99), (4, 1, 0));
    }

    #[test]
    fn test_always_five_glyphs_in_order() {
        let mut r = 0.0;
        while r <= 5.0 {
            let glyphs = render_stars(r).unwrap();
            let c = StarCounts::of(&glyphs);
            assert_eq!(c.full + c.half + c.empty, STAR_COUNT);
            // full stars first, then at most one half, then empties
            let mut sorted = glyphs;
            sorted.sort_by_key(|g| match g {
                StarGlyph::Full => 0,
                StarGlyph::Half => 1,
                StarGlyph::Empty => 2,
            });
            assert_eq!(sorted, glyphs, "rating {r}");
            r += 0.1;
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(render_stars(-0.1).is_err());
        assert!(render_stars(5.01).is_err());
        assert!(render_stars(f64::NAN).is_err());
        assert!(render_stars(f64::INFINITY).is_err());
    }

    #[test]
    fn test_text_rendering() {
        assert_eq!(to_text(&render_stars(2.5).unwrap()), "★★⯪☆☆");
    }
}

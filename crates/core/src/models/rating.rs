//! Store ratings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{RatingId, StoreId, UserId};

/// Errors for rating values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RatingError {
    /// Value outside 1..=5.
    #[error("rating must be between 1 and 5 (got {0})")]
    OutOfRange(i64),
}

/// A whole-star rating between 1 and 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RatingValue(u8);

impl RatingValue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Validate a raw rating.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::OutOfRange` unless `value` is in 1..=5.
    pub fn new(value: i64) -> Result<Self, RatingError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or(RatingError::OutOfRange(value))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Word shown next to the picker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self.0 {
            1 => "Poor",
            2 => "Fair",
            3 => "Good",
            4 => "Very Good",
            _ => "Excellent",
        }
    }
}

impl TryFrom<i64> for RatingValue {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RatingValue> for u8 {
    fn from(value: RatingValue) -> Self {
        value.0
    }
}

impl std::fmt::Display for RatingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user's rating of one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: RatingId,
    pub store_id: StoreId,
    pub user_id: UserId,
    pub rating: RatingValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for `POST /ratings`. The author comes from the bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingCreate {
    pub store_id: StoreId,
    pub rating: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Payload for `PATCH /ratings/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Average and count over a set of ratings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingSummary {
    /// Exact mean rating, `0.0` when there are none. Views round it for
    /// display only.
    pub average: f64,
    pub count: u32,
}

impl RatingSummary {
    /// Summarize a set of rating values.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = RatingValue>) -> Self {
        let (sum, count) = values
            .into_iter()
            .fold((0u32, 0u32), |(sum, count), v| (sum + u32::from(v.get()), count + 1));

        if count == 0 {
            return Self::default();
        }

        Self {
            average: f64::from(sum) / f64::from(count),
            count,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn values(raw: &[i64]) -> Vec<RatingValue> {
        raw.iter().map(|v| RatingValue::new(*v).unwrap()).collect()
    }

    #[test]
    fn test_rating_value_bounds() {
        assert!(RatingValue::new(0).is_err());
        assert!(RatingValue::new(6).is_err());
        assert!(RatingValue::new(-1).is_err());
        assert_eq!(RatingValue::new(1).unwrap().get(), 1);
        assert_eq!(RatingValue::new(5).unwrap().get(), 5);
    }

    #[test]
    fn test_labels() {
        let labels: Vec<_> = values(&[1, 2, 3, 4, 5])
            .into_iter()
            .map(RatingValue::label)
            .collect();
        assert_eq!(labels, ["Poor", "Fair", "Good", "Very Good", "Excellent"]);
    }

    #[test]
    fn test_summary_empty() {
        let summary = RatingSummary::from_values(Vec::new());
        assert_eq!(summary.count, 0);
        assert!(summary.average.abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_keeps_exact_mean() {
        let summary = RatingSummary::from_values(values(&[5, 4, 4]));
        assert_eq!(summary.count, 3);
        assert!((summary.average - 13.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_summary_stars_use_unrounded_mean() {
        use crate::stars::{StarGlyph::{Empty, Full}, render_stars};

        let mut raw = vec![4; 6];
        raw.extend([3; 7]);
        let summary = RatingSummary::from_values(values(&raw));
        assert_eq!(summary.count, 13);
        assert!((summary.average - 45.0 / 13.0).abs() < 1e-12);
        assert_eq!(
            render_stars(summary.average).unwrap(),
            [Full, Full, Full, Empty, Empty]
        );
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<RatingValue>("7").is_err());
        assert_eq!(
            serde_json::from_str::<RatingValue>("4").unwrap().get(),
            4
        );
    }
}

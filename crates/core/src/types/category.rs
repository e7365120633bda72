//! Store categories.

use serde::{Deserialize, Serialize};

/// Error returned when a category name is not in the closed list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown store category: {0}")]
pub struct CategoryError(pub String);

/// The closed list of store categories.
///
/// Serialized as the display name (e.g. `"Food & Dining"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum StoreCategory {
    Electronics,
    Grocery,
    Clothing,
    HomeGoods,
    Books,
    SportingGoods,
    PetSupplies,
    FoodAndDining,
    HealthAndBeauty,
    ToysAndGames,
    Furniture,
    Automotive,
    Jewelry,
    OfficeSupplies,
    Other,
}

impl StoreCategory {
    /// Every category, in picker order.
    pub const ALL: [Self; 15] = [
        Self::Electronics,
        Self::Grocery,
        Self::Clothing,
        Self::HomeGoods,
        Self::Books,
        Self::SportingGoods,
        Self::PetSupplies,
        Self::FoodAndDining,
        Self::HealthAndBeauty,
        Self::ToysAndGames,
        Self::Furniture,
        Self::Automotive,
        Self::Jewelry,
        Self::OfficeSupplies,
        Self::Other,
    ];

    /// Display name, also the wire value.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Grocery => "Grocery",
            Self::Clothing => "Clothing",
            Self::HomeGoods => "Home Goods",
            Self::Books => "Books",
            Self::SportingGoods => "Sporting Goods",
            Self::PetSupplies => "Pet Supplies",
            Self::FoodAndDining => "Food & Dining",
            Self::HealthAndBeauty => "Health & Beauty",
            Self::ToysAndGames => "Toys & Games",
            Self::Furniture => "Furniture",
            Self::Automotive => "Automotive",
            Self::Jewelry => "Jewelry",
            Self::OfficeSupplies => "Office Supplies",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for StoreCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for StoreCategory {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}

impl TryFrom<String> for StoreCategory {
    type Error = CategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StoreCategory> for &'static str {
    fn from(category: StoreCategory) -> Self {
        category.name()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_names() {
        assert_eq!(
            "Food & Dining".parse::<StoreCategory>().unwrap(),
            StoreCategory::FoodAndDining
        );
        assert_eq!(
            "home goods".parse::<StoreCategory>().unwrap(),
            StoreCategory::HomeGoods
        );
        assert!("Bakery".parse::<StoreCategory>().is_err());
    }

    #[test]
    fn test_serde_uses_display_name() {
        let json = serde_json::to_string(&StoreCategory::PetSupplies).unwrap();
        assert_eq!(json, "\"Pet Supplies\"");
        let back: StoreCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StoreCategory::PetSupplies);
    }

    #[test]
    fn test_closed_list_order() {
        assert_eq!(StoreCategory::ALL.first(), Some(&StoreCategory::Electronics));
        assert_eq!(StoreCategory::ALL.last(), Some(&StoreCategory::Other));
    }
}

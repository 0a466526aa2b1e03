use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ClassifierError;

/// The closed set of social-service categories a query can be routed to.
///
/// Declaration order is significant: it is the order used for the
/// probability map, for feature/coefficient rows and for breaking ties
/// between equally likely categories (first one wins).
///
/// ```
/// use referral::Category;
///
/// let category: Category = "SHELTER".parse().unwrap();
/// assert_eq!(category, Category::Shelter);
/// assert_eq!(category.as_str(), "SHELTER");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    FoodBank,
    Shelter,
    Medical,
    Education,
    Recreation,
    CommunityCenter,
    Other,
}

impl Category {
    /// Every category, in enumeration order.
    pub const ALL: [Category; 7] = [
        Category::FoodBank,
        Category::Shelter,
        Category::Medical,
        Category::Education,
        Category::Recreation,
        Category::CommunityCenter,
        Category::Other,
    ];

    /// Number of categories.
    pub const COUNT: usize = Self::ALL.len();

    /// Wire label, e.g. `"FOOD_BANK"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoodBank => "FOOD_BANK",
            Self::Shelter => "SHELTER",
            Self::Medical => "MEDICAL",
            Self::Education => "EDUCATION",
            Self::Recreation => "RECREATION",
            Self::CommunityCenter => "COMMUNITY_CENTER",
            Self::Other => "OTHER",
        }
    }

    /// Position of this category in [`Category::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Inverse of [`Category::index`].
    pub fn from_index(index: usize) -> Option<Category> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ClassifierError::ValidationError(format!("Unknown category '{}'", s)))
    }
}

//! Category filter parsed from the listing drop-down.

use core::fmt;

/// Filter applied to the catalog query.
///
/// The drop-down submits either a category name or a sentinel meaning
/// "no filter". Both the empty string and `any` (case-insensitive) are
/// accepted as the sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// Every product, regardless of category.
    #[default]
    Any,
    /// Only products whose category name equals this value exactly.
    Named(String),
}

impl CategoryFilter {
    /// Value submitted by the "Any category" option.
    pub const ANY_SENTINEL: &'static str = "any";

    /// Parse a filter from a submitted form value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(Self::ANY_SENTINEL) {
            Self::Any
        } else {
            Self::Named(trimmed.to_owned())
        }
    }

    /// The category name, if this filter restricts the listing.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Any => None,
            Self::Named(name) => Some(name),
        }
    }

    /// Whether a product in `category` passes this filter.
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Named(name) => name == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(Self::ANY_SENTINEL),
            Self::Named(name) => f.write_str(name),
        }
    }
}

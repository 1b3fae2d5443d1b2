//! Filter set for product searches

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort orders understood by the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    Relevance,
    PriceAsc,
    PriceDesc,
    Newest,
    Oldest,
    NameAsc,
    NameDesc,
    Stock,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::PriceAsc => "price_asc",
            SortBy::PriceDesc => "price_desc",
            SortBy::Newest => "newest",
            SortBy::Oldest => "oldest",
            SortBy::NameAsc => "name_asc",
            SortBy::NameDesc => "name_desc",
            SortBy::Stock => "stock",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(SortBy::Relevance),
            "price_asc" => Ok(SortBy::PriceAsc),
            "price_desc" => Ok(SortBy::PriceDesc),
            "newest" => Ok(SortBy::Newest),
            "oldest" => Ok(SortBy::Oldest),
            "name_asc" => Ok(SortBy::NameAsc),
            "name_desc" => Ok(SortBy::NameDesc),
            "stock" => Ok(SortBy::Stock),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// User-editable search filters.
///
/// Zero price bounds, empty strings and blank category names count as unset:
/// they are dropped from the query string and from the cache key, so
/// `{q: "reloj", minPrice: 0}` and `{q: "reloj"}` are the same search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, rename = "category", skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text query
    pub fn with_query(mut self, q: &str) -> Self {
        self.q = Some(q.to_string());
        self
    }

    /// Add a category to filter on
    pub fn with_category(mut self, category: &str) -> Self {
        self.categories.push(category.to_string());
        self
    }

    /// Replace the category list
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_min_price(mut self, price: Decimal) -> Self {
        self.min_price = Some(price);
        self
    }

    pub fn with_max_price(mut self, price: Decimal) -> Self {
        self.max_price = Some(price);
        self
    }

    pub fn with_price_range(self, min: Decimal, max: Decimal) -> Self {
        self.with_min_price(min).with_max_price(max)
    }

    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    /// True when no filter survives normalisation ("browse all").
    pub fn is_empty(&self) -> bool {
        self.normalized() == SearchFilters::default()
    }

    /// Overlay `other` on top of `self`. Set fields of `other` win.
    pub fn merged(&self, other: &SearchFilters) -> SearchFilters {
        SearchFilters {
            q: other.q.clone().or_else(|| self.q.clone()),
            categories: if other.categories.is_empty() {
                self.categories.clone()
            } else {
                other.categories.clone()
            },
            min_price: other.min_price.or(self.min_price),
            max_price: other.max_price.or(self.max_price),
            sort_by: other.sort_by.or(self.sort_by),
        }
    }

    /// Drop unset-equivalent values: empty query, blank categories and zero
    /// price bounds.
    pub fn normalized(&self) -> SearchFilters {
        SearchFilters {
            q: self.q.clone().filter(|q| !q.trim().is_empty()),
            categories: self
                .categories
                .iter()
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
            min_price: self.min_price.filter(|p| !p.is_zero()).map(|p| p.normalize()),
            max_price: self.max_price.filter(|p| !p.is_zero()).map(|p| p.normalize()),
            sort_by: self.sort_by,
        }
    }

    /// Query-string pairs in a fixed order. Categories are comma-joined.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let filters = self.normalized();
        let mut pairs = Vec::new();

        if let Some(q) = filters.q {
            pairs.push(("q", q));
        }
        if !filters.categories.is_empty() {
            pairs.push(("category", filters.categories.join(",")));
        }
        if let Some(min) = filters.min_price {
            pairs.push(("minPrice", min.to_string()));
        }
        if let Some(max) = filters.max_price {
            pairs.push(("maxPrice", max.to_string()));
        }
        if let Some(sort_by) = filters.sort_by {
            pairs.push(("sortBy", sort_by.as_str().to_string()));
        }

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_price_bounds_are_unset() {
        let with_zeros = SearchFilters::new()
            .with_query("reloj")
            .with_price_range(Decimal::ZERO, Decimal::ZERO);
        let plain = SearchFilters::new().with_query("reloj");

        assert_eq!(with_zeros.to_query_pairs(), plain.to_query_pairs());
        assert_eq!(with_zeros.normalized(), plain.normalized());
        assert_eq!(plain.to_query_pairs(), vec![("q", "reloj".to_string())]);
    }

    #[test]
    fn categories_are_comma_joined() {
        let filters = SearchFilters::new()
            .with_categories(["Relojes", " ", "Joyas "])
            .with_min_price(Decimal::new(15000, 2))
            .with_sort(SortBy::PriceDesc);

        assert_eq!(
            filters.to_query_pairs(),
            vec![
                ("category", "Relojes,Joyas".to_string()),
                ("minPrice", "150".to_string()),
                ("sortBy", "price_desc".to_string()),
            ]
        );
    }

    #[test]
    fn empty_filters_browse_all() {
        assert!(SearchFilters::new().is_empty());
        assert!(SearchFilters::new().with_query("  ").is_empty());
        assert!(SearchFilters::new().to_query_pairs().is_empty());
        assert!(!SearchFilters::new().with_sort(SortBy::Newest).is_empty());
    }

    #[test]
    fn merge_prefers_newer_values() {
        let current = SearchFilters::new()
            .with_query("bolso")
            .with_category("Bolsos")
            .with_max_price(Decimal::from(900));
        let update = SearchFilters::new().with_query("cartera");

        let merged = current.merged(&update);
        assert_eq!(merged.q.as_deref(), Some("cartera"));
        assert_eq!(merged.categories, vec!["Bolsos".to_string()]);
        assert_eq!(merged.max_price, Some(Decimal::from(900)));
    }

    #[test]
    fn sort_round_trips_through_str() {
        for sort in [SortBy::Relevance, SortBy::NameDesc, SortBy::Stock] {
            assert_eq!(sort.as_str().parse::<SortBy>(), Ok(sort));
        }
        assert!("cheapest".parse::<SortBy>().is_err());
    }
}

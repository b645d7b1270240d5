//! Query inputs and aggregate outputs over the catalog.

use serde::{Deserialize, Serialize};

use nexus_core::{DomainError, DomainResult};

/// Conjunctive list filter. Every criterion is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    category: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
}

impl ProductFilter {
    /// Build a filter. A blank category is treated as "no category filter".
    ///
    /// Price bounds are inclusive. Bounds that cross (`min > max`) are accepted
    /// and simply match nothing.
    pub fn new(
        category: Option<String>,
        min_price: Option<f64>,
        max_price: Option<f64>,
    ) -> DomainResult<Self> {
        for (label, bound) in [("min_price", min_price), ("max_price", max_price)] {
            if let Some(v) = bound {
                if !v.is_finite() || v < 0.0 {
                    return Err(DomainError::validation(format!(
                        "{label} must be a non-negative number"
                    )));
                }
            }
        }

        let category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(Self {
            category,
            min_price,
            max_price,
        })
    }

    /// Case-insensitive substring to look for in the stored category.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn min_price(&self) -> Option<f64> {
        self.min_price
    }

    pub fn max_price(&self) -> Option<f64> {
        self.max_price
    }
}

/// Case-folded form of a category used for substring matching.
///
/// Full Unicode lowercase, so `ELETRÔNICOS` and `eletrônicos` share a key.
pub fn category_key(category: &str) -> String {
    category.to_lowercase()
}

/// Per-category roll-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub count: u64,
    /// Mean price, rounded to 2 decimal places.
    pub avg_price: f64,
    pub total_stock: u64,
}

/// Whole-catalog KPIs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryOverview {
    pub product_count: u64,
    pub category_count: u64,
    pub total_units: u64,
    /// `Σ price * stock`, rounded to 2 decimal places.
    pub inventory_value: f64,
    /// Mean unit price, rounded to 2 decimal places (0 on an empty catalog).
    pub average_price: f64,
}

/// Round half away from zero to 2 decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_category_is_no_filter() {
        let f = ProductFilter::new(Some("   ".to_string()), None, None).unwrap();
        assert_eq!(f, ProductFilter::default());
    }

    #[test]
    fn category_key_folds_accented_capitals() {
        assert_eq!(category_key("ELETRÔNICOS"), "eletrônicos");
        assert_eq!(category_key("Informática"), category_key("INFORMÁTICA"));
    }

    #[test]
    fn category_is_trimmed() {
        let f = ProductFilter::new(Some(" gamer ".to_string()), Some(10.0), None).unwrap();
        assert_eq!(f.category(), Some("gamer"));
        assert_eq!(f.min_price(), Some(10.0));
        assert_eq!(f.max_price(), None);
    }

    #[test]
    fn rejects_negative_or_nan_bounds() {
        assert!(ProductFilter::new(None, Some(-1.0), None).is_err());
        assert!(ProductFilter::new(None, None, Some(f64::NAN)).is_err());
    }

    #[test]
    fn crossed_bounds_are_accepted() {
        assert!(ProductFilter::new(None, Some(50.0), Some(10.0)).is_ok());
    }

    #[test]
    fn round_cents_rounds_to_two_places() {
        assert_eq!(round_cents(15.0), 15.0);
        assert_eq!(round_cents(10.0 / 3.0), 3.33);
        assert_eq!(round_cents(2.675_000_1), 2.68);
    }
}

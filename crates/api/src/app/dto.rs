use serde::Deserialize;
use serde_json::json;

use nexus_core::{DomainError, DomainResult, Page, PageRequest};
use nexus_products::{CategorySummary, InventoryOverview, Product, ProductFilter, LOW_STOCK_THRESHOLD};

pub const DEFAULT_LOW_STOCK_LIMIT: u32 = 50;
pub const MAX_LOW_STOCK_LIMIT: u32 = 500;

// -------------------------
// Request DTOs
// -------------------------

/// `GET /products/` query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsQuery {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListProductsQuery {
    pub fn into_parts(self) -> DomainResult<(ProductFilter, PageRequest)> {
        let filter = ProductFilter::new(self.category, self.min_price, self.max_price)?;
        let page = PageRequest::new(self.page, self.page_size)?;
        Ok((filter, page))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<u32>,
    pub limit: Option<u32>,
}

impl LowStockQuery {
    /// `(threshold, limit)` with defaults applied.
    pub fn resolve(&self) -> DomainResult<(u32, u32)> {
        let threshold = self.threshold.unwrap_or(LOW_STOCK_THRESHOLD);
        let limit = self.limit.unwrap_or(DEFAULT_LOW_STOCK_LIMIT);
        if !(1..=MAX_LOW_STOCK_LIMIT).contains(&limit) {
            return Err(DomainError::validation(format!(
                "limit must be between 1 and {MAX_LOW_STOCK_LIMIT}"
            )));
        }
        Ok((threshold, limit))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SkuSuggestionQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
}

// -------------------------
// Response mapping
// -------------------------

pub fn product_to_json(p: Product) -> serde_json::Value {
    json!({
        "sku": p.sku.as_str(),
        "name": p.name,
        "category": p.category,
        "price": p.price,
        "stock": p.stock,
        "stock_status": p.stock_status(),
        "image_url": p.image_url,
        "specifications": p.specifications,
    })
}

pub fn page_to_json(page: Page<Product>) -> serde_json::Value {
    let page = page.map(product_to_json);
    json!({
        "items": page.items,
        "total": page.total,
        "page": page.page,
        "page_size": page.page_size,
    })
}

pub fn category_summary_to_json(s: CategorySummary) -> serde_json::Value {
    json!({
        "category": s.category,
        "count": s.count,
        "avg_price": s.avg_price,
        "total_stock": s.total_stock,
    })
}

pub fn overview_to_json(o: InventoryOverview) -> serde_json::Value {
    json!({
        "product_count": o.product_count,
        "category_count": o.category_count,
        "total_units": o.total_units,
        "inventory_value": o.inventory_value,
        "average_price": o.average_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_products::{NewProduct, DEFAULT_IMAGE_URL};

    #[test]
    fn product_json_carries_stock_status() {
        let product = NewProduct {
            sku: "MOU-LOG-123".to_string(),
            name: "Mouse Logitech".to_string(),
            category: "Perifericos".to_string(),
            price: 99.9,
            stock: 2,
            image_url: None,
            specifications: Default::default(),
        }
        .validate(DEFAULT_IMAGE_URL)
        .unwrap();

        let body = product_to_json(product);
        assert_eq!(body["sku"], "MOU-LOG-123");
        assert_eq!(body["stock_status"], "low");
        assert_eq!(body["image_url"], DEFAULT_IMAGE_URL);
        assert_eq!(body["specifications"], json!({}));
    }

    #[test]
    fn list_query_rejects_oversized_page() {
        let query = ListProductsQuery {
            page_size: Some(101),
            ..Default::default()
        };
        assert!(matches!(query.into_parts(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn low_stock_defaults_and_bounds() {
        assert_eq!(LowStockQuery::default().resolve().unwrap(), (LOW_STOCK_THRESHOLD, DEFAULT_LOW_STOCK_LIMIT));

        let query = LowStockQuery { threshold: Some(2), limit: Some(0) };
        assert!(query.resolve().is_err());
    }
}

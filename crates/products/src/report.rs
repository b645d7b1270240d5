//! Inventory report: the tabular stock valuation behind the spreadsheet export.

use crate::product::Product;
use crate::query::round_cents;

/// One table line: a product and the value of its units on hand.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryReportRow {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub unit_price: f64,
    pub stock: u32,
    /// `unit_price * stock`, rounded to 2 decimal places.
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryReport {
    pub rows: Vec<InventoryReportRow>,
    /// Units on hand across all products.
    pub total_units: u64,
    pub sku_count: u64,
    /// Sum of every row total, rounded to 2 decimal places.
    pub grand_total: f64,
}

impl InventoryReport {
    /// Build the report from products in the order given.
    pub fn from_products(products: &[Product]) -> Self {
        let rows: Vec<InventoryReportRow> = products
            .iter()
            .map(|p| InventoryReportRow {
                sku: p.sku.to_string(),
                name: p.name.clone(),
                category: p.category.clone(),
                unit_price: p.price,
                stock: p.stock,
                total: round_cents(p.stock_value()),
            })
            .collect();

        Self {
            total_units: products.iter().map(|p| u64::from(p.stock)).sum(),
            sku_count: rows.len() as u64,
            grand_total: round_cents(products.iter().map(Product::stock_value).sum()),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{NewProduct, Specifications, DEFAULT_IMAGE_URL};

    fn product(sku: &str, price: f64, stock: i64) -> Product {
        NewProduct {
            sku: sku.to_string(),
            name: format!("Produto {sku}"),
            category: "Geral".to_string(),
            price,
            stock,
            image_url: None,
            specifications: Specifications::new(),
        }
        .validate(DEFAULT_IMAGE_URL)
        .unwrap()
    }

    #[test]
    fn rows_carry_line_totals() {
        let report = InventoryReport::from_products(&[
            product("SKU-001", 10.0, 3),
            product("SKU-002", 2.5, 0),
            product("SKU-003", 19.99, 2),
        ]);

        assert_eq!(report.sku_count, 3);
        assert_eq!(report.total_units, 5);
        assert_eq!(report.rows[0].total, 30.0);
        assert_eq!(report.rows[1].total, 0.0);
        assert_eq!(report.rows[2].total, 39.98);
        assert_eq!(report.grand_total, 69.98);
        assert_eq!(report.rows[2].sku, "SKU-003");
    }

    #[test]
    fn empty_catalog_gives_empty_report() {
        let report = InventoryReport::from_products(&[]);
        assert!(report.is_empty());
        assert_eq!(report, InventoryReport::default());
    }
}

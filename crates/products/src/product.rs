use serde::{Deserialize, Serialize};

use nexus_core::{DomainError, DomainResult, Sku};

/// Placeholder shown for products registered without a usable photo.
pub const DEFAULT_IMAGE_URL: &str = "https://placehold.co/600x400/1e1e1e/FFF?text=Produto+sem+Foto";

/// Products with fewer units than this are flagged as running low.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

const MIN_NAME_LEN: usize = 2;
const MIN_IMAGE_URL_LEN: usize = 5;

/// Free-form key/value attributes (colour, voltage, size, ...).
pub type Specifications = serde_json::Map<String, serde_json::Value>;

/// A catalog record. Flat: no relationships to other entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: Sku,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: u32,
    pub image_url: String,
    #[serde(default)]
    pub specifications: Specifications,
}

impl Product {
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::from_stock(self.stock)
    }

    /// Value of the units on hand (`price * stock`).
    pub fn stock_value(&self) -> f64 {
        self.price * f64::from(self.stock)
    }
}

/// Availability badge derived from the stock level. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    Low,
    Available,
}

impl StockStatus {
    pub fn from_stock(stock: u32) -> Self {
        match stock {
            0 => StockStatus::OutOfStock,
            s if s < LOW_STOCK_THRESHOLD => StockStatus::Low,
            _ => StockStatus::Available,
        }
    }
}

/// Create payload, as received from clients.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub specifications: Specifications,
}

impl NewProduct {
    /// Validate the payload and produce the record to persist.
    ///
    /// `image_placeholder` replaces a missing or unusable `image_url`.
    pub fn validate(self, image_placeholder: &str) -> DomainResult<Product> {
        let sku = Sku::parse(&self.sku)?;
        let name = validate_name(&self.name)?;
        let category = validate_category(&self.category)?;
        validate_price(self.price)?;
        let stock = validate_stock(self.stock)?;

        Ok(Product {
            sku,
            name,
            category,
            price: self.price,
            stock,
            image_url: resolve_image_url(self.image_url.as_deref(), image_placeholder),
            specifications: self.specifications,
        })
    }
}

/// Sparse update payload.
///
/// Absent means unchanged. An explicit JSON `null` is read the same way, so a
/// field can never be cleared through a patch. `sku` is not part of the patch:
/// it is immutable once created.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub specifications: Option<Specifications>,
}

impl ProductPatch {
    /// Validate every supplied field with the same rules used on create.
    pub fn validate(self, image_placeholder: &str) -> DomainResult<ProductChanges> {
        let name = self.name.as_deref().map(validate_name).transpose()?;
        let category = self.category.as_deref().map(validate_category).transpose()?;
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        let stock = self.stock.map(validate_stock).transpose()?;
        let image_url = self
            .image_url
            .as_deref()
            .map(|url| resolve_image_url(Some(url), image_placeholder));

        Ok(ProductChanges {
            name,
            category,
            price: self.price,
            stock,
            image_url,
            specifications: self.specifications,
        })
    }
}

/// A validated change set. Only obtainable through [`ProductPatch::validate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    name: Option<String>,
    category: Option<String>,
    price: Option<f64>,
    stock: Option<u32>,
    image_url: Option<String>,
    specifications: Option<Specifications>,
}

impl ProductChanges {
    /// True when no field was supplied (the update is a no-op).
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.image_url.is_none()
            && self.specifications.is_none()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn stock(&self) -> Option<u32> {
        self.stock
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Replacement map. Replaces the stored map wholesale; keys are never merged.
    pub fn specifications(&self) -> Option<&Specifications> {
        self.specifications.as_ref()
    }
}

/// Substitute `placeholder` for a missing, too-short or Swagger-default image URL.
pub fn resolve_image_url(candidate: Option<&str>, placeholder: &str) -> String {
    match candidate.map(str::trim) {
        Some(url) if url != "string" && url.chars().count() >= MIN_IMAGE_URL_LEN => url.to_string(),
        _ => placeholder.to_string(),
    }
}

fn validate_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.chars().count() < MIN_NAME_LEN {
        return Err(DomainError::validation(format!(
            "name must have at least {MIN_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_category(category: &str) -> DomainResult<String> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("category cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn validate_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(DomainError::validation("price must be greater than zero"));
    }
    Ok(())
}

fn validate_stock(stock: i64) -> DomainResult<u32> {
    if stock < 0 {
        return Err(DomainError::validation("stock cannot be negative"));
    }
    u32::try_from(stock).map_err(|_| DomainError::validation("stock is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_product() -> NewProduct {
        NewProduct {
            sku: "NB-DELL-G15".to_string(),
            name: "Notebook Dell G15".to_string(),
            category: "Eletronicos".to_string(),
            price: 5200.0,
            stock: 3,
            image_url: Some("https://img.example.com/g15.png".to_string()),
            specifications: Specifications::new(),
        }
    }

    #[test]
    fn validate_produces_product_with_same_fields() {
        let product = new_product().validate(DEFAULT_IMAGE_URL).unwrap();
        assert_eq!(product.sku.as_str(), "NB-DELL-G15");
        assert_eq!(product.name, "Notebook Dell G15");
        assert_eq!(product.category, "Eletronicos");
        assert_eq!(product.price, 5200.0);
        assert_eq!(product.stock, 3);
        assert_eq!(product.image_url, "https://img.example.com/g15.png");
        assert!(product.specifications.is_empty());
    }

    #[test]
    fn validate_rejects_non_positive_price() {
        for price in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut p = new_product();
            p.price = price;
            assert!(matches!(p.validate(DEFAULT_IMAGE_URL), Err(DomainError::Validation(_))));
        }
    }

    #[test]
    fn validate_rejects_negative_stock() {
        let mut p = new_product();
        p.stock = -1;
        assert!(matches!(p.validate(DEFAULT_IMAGE_URL), Err(DomainError::Validation(_))));
    }

    #[test]
    fn validate_rejects_short_sku_and_name() {
        let mut p = new_product();
        p.sku = "AB".to_string();
        assert!(p.validate(DEFAULT_IMAGE_URL).is_err());

        let mut p = new_product();
        p.name = " X ".to_string();
        assert!(p.validate(DEFAULT_IMAGE_URL).is_err());
    }

    #[test]
    fn missing_or_unusable_image_gets_placeholder() {
        for image in [None, Some(""), Some("abc"), Some("string")] {
            let mut p = new_product();
            p.image_url = image.map(str::to_string);
            let product = p.validate("https://cdn.example.com/none.png").unwrap();
            assert_eq!(product.image_url, "https://cdn.example.com/none.png");
        }
    }

    #[test]
    fn create_payload_defaults_stock_and_specifications() {
        let p: NewProduct = serde_json::from_value(json!({
            "sku": "MS-LOGI-01",
            "name": "Mouse",
            "category": "Perifericos",
            "price": 99.9
        }))
        .unwrap();
        let product = p.validate(DEFAULT_IMAGE_URL).unwrap();
        assert_eq!(product.stock, 0);
        assert_eq!(product.image_url, DEFAULT_IMAGE_URL);
        assert!(product.specifications.is_empty());
    }

    #[test]
    fn empty_patch_is_empty() {
        let patch: ProductPatch = serde_json::from_value(json!({})).unwrap();
        assert!(patch.validate(DEFAULT_IMAGE_URL).unwrap().is_empty());
    }

    #[test]
    fn null_fields_in_patch_mean_unchanged() {
        let patch: ProductPatch =
            serde_json::from_value(json!({ "name": null, "specifications": null })).unwrap();
        assert!(patch.validate(DEFAULT_IMAGE_URL).unwrap().is_empty());
    }

    #[test]
    fn patch_ignores_sku() {
        let patch: ProductPatch = serde_json::from_value(json!({ "sku": "OTHER-1", "stock": 5 })).unwrap();
        let changes = patch.validate(DEFAULT_IMAGE_URL).unwrap();
        assert_eq!(changes.stock(), Some(5));
        assert_eq!(changes.name(), None);
    }

    #[test]
    fn patch_validates_supplied_fields() {
        let patch = ProductPatch {
            price: Some(0.0),
            ..Default::default()
        };
        assert!(matches!(patch.validate(DEFAULT_IMAGE_URL), Err(DomainError::Validation(_))));

        let patch = ProductPatch {
            stock: Some(-3),
            ..Default::default()
        };
        assert!(matches!(patch.validate(DEFAULT_IMAGE_URL), Err(DomainError::Validation(_))));
    }

    #[test]
    fn patch_image_gets_placeholder() {
        let patch = ProductPatch {
            image_url: Some("".to_string()),
            ..Default::default()
        };
        let changes = patch.validate(DEFAULT_IMAGE_URL).unwrap();
        assert_eq!(changes.image_url(), Some(DEFAULT_IMAGE_URL));
    }

    #[test]
    fn stock_status_thresholds() {
        assert_eq!(StockStatus::from_stock(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_stock(1), StockStatus::Low);
        assert_eq!(StockStatus::from_stock(4), StockStatus::Low);
        assert_eq!(StockStatus::from_stock(5), StockStatus::Available);
    }

    #[test]
    fn product_json_shape() {
        let mut product = new_product().validate(DEFAULT_IMAGE_URL).unwrap();
        product.specifications.insert("cor".to_string(), json!("preto"));
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["sku"], "NB-DELL-G15");
        assert_eq!(value["stock"], 3);
        assert_eq!(value["specifications"]["cor"], "preto");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: any record that validates satisfies the catalog invariants.
            #[test]
            fn validated_products_respect_invariants(
                sku in "[A-Z0-9-]{0,12}",
                name in "[A-Za-z ]{0,20}",
                price in -1_000.0f64..10_000.0,
                stock in -50i64..500,
            ) {
                let candidate = NewProduct {
                    sku,
                    name,
                    category: "Geral".to_string(),
                    price,
                    stock,
                    image_url: None,
                    specifications: Specifications::new(),
                };

                if let Ok(product) = candidate.validate(DEFAULT_IMAGE_URL) {
                    prop_assert!(product.price > 0.0);
                    prop_assert!(product.sku.as_str().chars().count() >= Sku::MIN_LEN);
                    prop_assert!(product.name.chars().count() >= 2);
                    prop_assert_eq!(product.image_url.as_str(), DEFAULT_IMAGE_URL);
                }
            }

            /// Property: a patch touching only stock never carries other fields.
            #[test]
            fn stock_only_patch_changes_only_stock(stock in 0i64..100_000) {
                let patch = ProductPatch { stock: Some(stock), ..Default::default() };
                let changes = patch.validate(DEFAULT_IMAGE_URL).unwrap();
                prop_assert!(!changes.is_empty());
                prop_assert_eq!(changes.stock(), Some(stock as u32));
                prop_assert!(changes.name().is_none());
                prop_assert!(changes.category().is_none());
                prop_assert!(changes.price().is_none());
                prop_assert!(changes.image_url().is_none());
                prop_assert!(changes.specifications().is_none());
            }
        }
    }
}

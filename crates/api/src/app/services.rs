use std::sync::Arc;

use nexus_infra::{CatalogConfig, CatalogStore, SqliteCatalogStore, StoreError};

/// Shared handler state: the catalog store plus request-level policy inputs.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn CatalogStore>,
    image_placeholder: String,
}

impl AppServices {
    pub fn new(store: Arc<dyn CatalogStore>, image_placeholder: impl Into<String>) -> Self {
        Self {
            store,
            image_placeholder: image_placeholder.into(),
        }
    }

    pub fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }

    /// Image URL substituted when a product has no usable photo.
    pub fn image_placeholder(&self) -> &str {
        &self.image_placeholder
    }
}

/// Connect the configured database and wire the services used by the router.
pub async fn build_services(config: &CatalogConfig) -> Result<AppServices, StoreError> {
    let store = SqliteCatalogStore::connect(&config.database_url, config.max_connections).await?;
    Ok(AppServices::new(Arc::new(store), config.default_image_url.clone()))
}

use crate::{catalog::CatalogService, config::Config, store::CatalogStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Initialize the document store
        let store = CatalogStore::new(&config.database.url).await?;
        store.init().await?;
        let store = Arc::new(store);

        // Catalog service owns the store handle
        let catalog = CatalogService::new(store);

        Ok(Self { catalog, config })
    }
}

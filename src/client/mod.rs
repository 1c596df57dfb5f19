// Client-side catalog: HTTP bindings plus an in-memory state store.
//
// Each operation is a single request-response pair; state changes only after
// the server confirms. Nothing here retries, cancels, or coordinates
// overlapping requests - whichever response lands last wins.

pub mod api;
pub mod state;

pub use api::{CatalogApi, ClientError};
pub use state::{CatalogState, RequestStatus, SortOrder};

use uuid::Uuid;

use crate::models::{Comment, NewComment, NewProduct, Product};

// Front type binding the API client to the state it reconciles into. Owned
// and passed explicitly by callers; there is no ambient global store.
pub struct ProductStore {
    api: CatalogApi,
    state: CatalogState,
}

impl ProductStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: CatalogApi::new(base_url),
            state: CatalogState::new(),
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    // Fetch-all drives the status flag; a failure is recorded in state as
    // well as returned.
    pub async fn fetch_products(&mut self) -> Result<(), ClientError> {
        self.state.begin_fetch();
        match self.api.fetch_products().await {
            Ok(products) => {
                self.state.finish_fetch(products);
                Ok(())
            }
            Err(err) => {
                self.state.fail_fetch(err.to_string());
                Err(err)
            }
        }
    }

    // Fetch one product, fold it into the list, and select it.
    pub async fn fetch_product(&mut self, id: Uuid) -> Result<(), ClientError> {
        let product = self.api.fetch_product(id).await?;
        self.state.product_fetched(product);
        self.state.select_product(Some(id));
        Ok(())
    }

    pub async fn create_product(&mut self, new: NewProduct) -> Result<Product, ClientError> {
        let product = self.api.create_product(&new).await?;
        self.state.product_created(product.clone());
        Ok(product)
    }

    pub async fn update_product(&mut self, product: Product) -> Result<Product, ClientError> {
        let updated = self.api.update_product(&product).await?;
        self.state.product_updated(updated.clone());
        Ok(updated)
    }

    pub async fn delete_product(&mut self, id: Uuid) -> Result<(), ClientError> {
        self.api.delete_product(id).await?;
        self.state.product_removed(id);
        Ok(())
    }

    pub async fn add_comment(
        &mut self,
        product_id: Uuid,
        new: NewComment,
    ) -> Result<Comment, ClientError> {
        let comment = self.api.add_comment(product_id, &new).await?;
        self.state.comment_added(product_id, comment.clone());
        Ok(comment)
    }

    pub async fn delete_comment(
        &mut self,
        product_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), ClientError> {
        match self.api.delete_comment(product_id, comment_id).await {
            Ok(()) => {
                self.state.comment_removed(product_id, comment_id);
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Failed to delete comment {}: {}", comment_id, err);
                Err(err)
            }
        }
    }

    // Selection is caller-supplied, not re-fetched.
    pub fn select_product(&mut self, id: Option<Uuid>) {
        self.state.select_product(id);
    }
}

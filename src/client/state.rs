use uuid::Uuid;

use crate::models::{Comment, Product};

// Lifecycle of the fetch-all request. Mutations never touch this; only the
// full fetch drives it, and `error` is populated iff the status is Failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    NameAsc,
    NameDesc,
    CountAsc,
    CountDesc,
}

// In-memory catalog state. The current selection is held as an id and
// resolved against `products` on read, so comment mutations have a single
// copy to keep correct.
#[derive(Debug, Default)]
pub struct CatalogState {
    products: Vec<Product>,
    current_product_id: Option<Uuid>,
    status: RequestStatus,
    error: Option<String>,
}

impl Default for RequestStatus {
    fn default() -> Self {
        RequestStatus::Idle
    }
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current_product_id(&self) -> Option<Uuid> {
        self.current_product_id
    }

    // Derived selection; None when nothing is selected or the selected
    // product has since been removed.
    pub fn current_product(&self) -> Option<&Product> {
        self.current_product_id
            .and_then(|id| self.products.iter().find(|p| p.id == id))
    }

    pub fn select_product(&mut self, id: Option<Uuid>) {
        self.current_product_id = id;
    }

    // Non-mutating sorted view. Stable, so equal keys keep their list order
    // after the tie-break.
    pub fn sorted_products(&self, order: SortOrder) -> Vec<&Product> {
        let mut sorted: Vec<&Product> = self.products.iter().collect();
        match order {
            SortOrder::NameAsc => {
                sorted.sort_by(|a, b| a.name.cmp(&b.name).then(a.count.cmp(&b.count)))
            }
            SortOrder::NameDesc => {
                sorted.sort_by(|a, b| b.name.cmp(&a.name).then(a.count.cmp(&b.count)))
            }
            SortOrder::CountAsc => {
                sorted.sort_by(|a, b| a.count.cmp(&b.count).then(a.name.cmp(&b.name)))
            }
            SortOrder::CountDesc => {
                sorted.sort_by(|a, b| b.count.cmp(&a.count).then(a.name.cmp(&b.name)))
            }
        }
        sorted
    }

    // Reducers - one per confirmed request outcome. State only changes here,
    // after the server has answered.

    pub(crate) fn begin_fetch(&mut self) {
        self.status = RequestStatus::Loading;
        self.error = None;
    }

    pub(crate) fn finish_fetch(&mut self, products: Vec<Product>) {
        self.status = RequestStatus::Succeeded;
        self.error = None;
        self.products = products;
    }

    pub(crate) fn fail_fetch(&mut self, message: String) {
        self.status = RequestStatus::Failed;
        self.error = Some(message);
    }

    pub(crate) fn product_created(&mut self, product: Product) {
        self.products.push(product);
    }

    pub(crate) fn product_fetched(&mut self, product: Product) {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => *slot = product,
            None => self.products.push(product),
        }
    }

    // No-op when the id is absent from the list.
    pub(crate) fn product_updated(&mut self, product: Product) {
        if let Some(slot) = self.products.iter_mut().find(|p| p.id == product.id) {
            *slot = product;
        }
    }

    pub(crate) fn product_removed(&mut self, id: Uuid) {
        self.products.retain(|p| p.id != id);
    }

    pub(crate) fn comment_added(&mut self, product_id: Uuid, comment: Comment) {
        if let Some(product) = self.products.iter_mut().find(|p| p.id == product_id) {
            product.comments.push(comment);
        }
    }

    pub(crate) fn comment_removed(&mut self, product_id: Uuid, comment_id: Uuid) {
        if let Some(product) = self.products.iter_mut().find(|p| p.id == product_id) {
            product.comments.retain(|c| c.id != comment_id);
        }
    }
}

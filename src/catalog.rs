// Unified catalog interface - service operations, HTTP handlers, and router

use std::sync::Arc;

use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Comment, CommentDocument, NewComment, NewProduct, Product, ProductDocument},
    store::CatalogStore,
};

// Per-request operations over the document store. Each operation validates
// and mutates a single document; there is no cross-request coordination.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let products = self.store.list_products().await?;
        Ok(products
            .into_iter()
            .map(|(id, doc)| doc.into_product(id))
            .collect())
    }

    pub async fn get_product(&self, id: Uuid) -> AppResult<Product> {
        match self.store.get_product(id).await? {
            Some(doc) => Ok(doc.into_product(id)),
            None => Err(AppError::NotFound("Product not found".to_string())),
        }
    }

    pub async fn create_product(&self, new: NewProduct) -> AppResult<Product> {
        new.validate().map_err(AppError::Validation)?;

        let doc = ProductDocument::from_new(new);
        let id = self.store.insert_product(&doc).await?;
        Ok(doc.into_product(id))
    }

    pub async fn update_product(&self, id: Uuid, update: NewProduct) -> AppResult<Product> {
        let mut doc = match self.store.get_product(id).await? {
            Some(doc) => doc,
            None => return Err(AppError::NotFound("Product not found".to_string())),
        };

        update.validate().map_err(AppError::Validation)?;
        doc.apply_update(update);

        if !self.store.replace_product(id, &doc).await? {
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        Ok(doc.into_product(id))
    }

    pub async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        if !self.store.delete_product(id).await? {
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        Ok(())
    }

    // Appends to the parent's comment sequence; the store assigns the
    // comment identity and the back-reference to the owner.
    pub async fn add_comment(&self, product_id: Uuid, new: NewComment) -> AppResult<Comment> {
        let mut doc = match self.store.get_product(product_id).await? {
            Some(doc) => doc,
            None => return Err(AppError::NotFound("Product not found".to_string())),
        };

        new.validate().map_err(AppError::Validation)?;

        let comment = CommentDocument {
            comment_id: Uuid::new_v4(),
            product_id,
            description: new.description,
            date: new.date,
        };
        doc.comments.push(comment.clone());

        if !self.store.replace_product(product_id, &doc).await? {
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        Ok(comment.into_comment())
    }

    pub async fn delete_comment(&self, product_id: Uuid, comment_id: Uuid) -> AppResult<()> {
        let mut doc = match self.store.get_product(product_id).await? {
            Some(doc) => doc,
            None => return Err(AppError::NotFound("Product not found".to_string())),
        };

        if !doc.comments.iter().any(|c| c.comment_id == comment_id) {
            return Err(AppError::NotFound("Comment not found".to_string()));
        }

        doc.comments.retain(|c| c.comment_id != comment_id);

        if !self.store.replace_product(product_id, &doc).await? {
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        Ok(())
    }
}

// Helper functions to reject malformed path ids before touching the store.
// The literal "undefined" a stale client may send fails the parse like any
// other junk and comes back as a 400.
fn parse_product_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid product ID".to_string()))
}

fn parse_comment_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid comment ID".to_string()))
}

// HTTP Handlers

pub async fn list_products_handler(
    State(catalog): State<CatalogService>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(catalog.list_products().await?))
}

pub async fn get_product_handler(
    State(catalog): State<CatalogService>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<Product>, AppError> {
    let id = parse_product_id(&id)?;
    Ok(Json(catalog.get_product(id).await?))
}

pub async fn create_product_handler(
    State(catalog): State<CatalogService>,
    Json(new): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = catalog.create_product(new).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product_handler(
    State(catalog): State<CatalogService>,
    AxumPath(id): AxumPath<String>,
    Json(update): Json<NewProduct>,
) -> Result<Json<Product>, AppError> {
    let id = parse_product_id(&id)?;
    Ok(Json(catalog.update_product(id, update).await?))
}

pub async fn delete_product_handler(
    State(catalog): State<CatalogService>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_product_id(&id)?;
    catalog.delete_product(id).await?;
    Ok(Json(json!({ "message": "Product deleted" })))
}

pub async fn add_comment_handler(
    State(catalog): State<CatalogService>,
    AxumPath(id): AxumPath<String>,
    Json(new): Json<NewComment>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let id = parse_product_id(&id)?;
    let comment = catalog.add_comment(id, new).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn delete_comment_handler(
    State(catalog): State<CatalogService>,
    AxumPath((id, comment_id)): AxumPath<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let comment_id = parse_comment_id(&comment_id)?;
    let id = parse_product_id(&id)?;
    catalog.delete_comment(id, comment_id).await?;
    Ok(Json(json!({ "message": "Comment deleted" })))
}

// Create unified router; mounted under /api/products by the server binary
pub fn create_catalog_router(catalog: CatalogService) -> Router {
    Router::new()
        // Collection operations
        .route("/", get(list_products_handler).post(create_product_handler))
        // Item operations
        .route(
            "/{id}",
            get(get_product_handler)
                .put(update_product_handler)
                .delete(delete_product_handler),
        )
        // Embedded comment operations
        .route("/{id}/comments", post(add_comment_handler))
        .route("/{id}/comments/{comment_id}", delete(delete_comment_handler))
        .with_state(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn app(dir: &TempDir) -> Router {
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("catalog.db").display()
        );
        let store = CatalogStore::new(&url).await.unwrap();
        store.init().await.unwrap();
        let catalog = CatalogService::new(Arc::new(store));
        Router::new().nest("/api/products", create_catalog_router(catalog))
    }

    #[tokio::test]
    async fn list_responds_on_the_bare_collection_path() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir).await;

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/products")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"[]");
    }

    #[tokio::test]
    async fn unknown_product_yields_a_message_body() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir).await;

        let uri = format!("/api/products/{}", Uuid::new_v4());
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Product not found");
    }

    #[tokio::test]
    async fn malformed_item_id_is_rejected_at_the_boundary() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir).await;

        let resp = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/products/undefined")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Invalid product ID");
    }
}

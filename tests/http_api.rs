//! Full HTTP round-trips: a real server on a random port, driven by the
//! client-side ProductStore.

use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;
use tokio::net::TcpListener;
use uuid::Uuid;

use product_catalog::catalog::{create_catalog_router, CatalogService};
use product_catalog::client::{ClientError, ProductStore, RequestStatus, SortOrder};
use product_catalog::models::{NewComment, NewProduct, Size};
use product_catalog::store::CatalogStore;

async fn spawn_server(dir: &TempDir) -> String {
    let db_path = dir.path().join("catalog.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    let store = CatalogStore::new(&url).await.unwrap();
    store.init().await.unwrap();
    let catalog = CatalogService::new(Arc::new(store));

    let app = Router::new().nest("/api/products", create_catalog_router(catalog));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn widget() -> NewProduct {
    NewProduct {
        name: "Widget".into(),
        count: 5,
        image_url: "u".into(),
        size: Size { width: 10, height: 20 },
        weight: "1kg".into(),
    }
}

#[tokio::test]
async fn full_product_roundtrip() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;
    let mut store = ProductStore::new(base_url.as_str());

    store.fetch_products().await.unwrap();
    assert_eq!(store.state().status(), RequestStatus::Succeeded);
    assert!(store.state().products().is_empty());

    // POST -> 201 with an assigned id
    let created = store.create_product(widget()).await.unwrap();
    assert!(!created.id.is_nil());
    assert_eq!(store.state().products().len(), 1);

    // PUT count 5 -> 7
    let mut edited = created.clone();
    edited.count = 7;
    let updated = store.update_product(edited).await.unwrap();
    assert_eq!(updated.count, 7);

    // A fresh fetch reflects the update
    store.fetch_products().await.unwrap();
    assert_eq!(store.state().products().len(), 1);
    assert_eq!(store.state().products()[0].count, 7);

    // DELETE removes it from subsequent fetches
    store.delete_product(created.id).await.unwrap();
    store.fetch_products().await.unwrap();
    assert!(store.state().products().is_empty());
}

#[tokio::test]
async fn comment_lifecycle_through_the_client() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;
    let mut store = ProductStore::new(base_url.as_str());

    let created = store.create_product(widget()).await.unwrap();
    store.select_product(Some(created.id));

    let comment = store
        .add_comment(
            created.id,
            NewComment {
                description: "solid".into(),
                date: "2024-05-01 10:00".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(comment.product_id, created.id);
    assert_eq!(comment.description, "solid");

    // The selection observes the same list entry
    let current = store.state().current_product().unwrap();
    assert_eq!(current.comments.len(), 1);
    assert_eq!(current.comments[0].id, comment.id);

    // The server has it appended too
    store.fetch_product(created.id).await.unwrap();
    let fetched = store.state().current_product().unwrap();
    assert_eq!(fetched.comments.len(), 1);

    store.delete_comment(created.id, comment.id).await.unwrap();
    assert!(store.state().current_product().unwrap().comments.is_empty());
}

#[tokio::test]
async fn deleting_unknown_comment_is_404_and_state_is_untouched() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;
    let mut store = ProductStore::new(base_url.as_str());

    let created = store.create_product(widget()).await.unwrap();
    store
        .add_comment(
            created.id,
            NewComment {
                description: "keep".into(),
                date: "2024-05-01 10:00".into(),
            },
        )
        .await
        .unwrap();

    let err = store
        .delete_comment(created.id, Uuid::new_v4())
        .await
        .unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Comment not found");
        }
        other => panic!("expected API error, got {}", other),
    }

    assert_eq!(store.state().products()[0].comments.len(), 1);
}

#[tokio::test]
async fn malformed_comment_id_is_400() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let mut store = ProductStore::new(base_url.as_str());
    let created = store.create_product(widget()).await.unwrap();

    // A stale client can end up sending the literal string "undefined"
    let resp = client
        .delete(format!(
            "{}/api/products/{}/comments/undefined",
            base_url, created.id
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid comment ID");
}

#[tokio::test]
async fn malformed_product_id_is_400() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/api/products/not-a-uuid", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid product ID");
}

#[tokio::test]
async fn missing_product_is_404() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;
    let mut store = ProductStore::new(base_url.as_str());

    let err = store.fetch_product(Uuid::new_v4()).await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Product not found");
        }
        other => panic!("expected API error, got {}", other),
    }
}

#[tokio::test]
async fn validation_failure_leaves_client_state_unchanged() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;
    let mut store = ProductStore::new(base_url.as_str());

    let mut nameless = widget();
    nameless.name = "".into();
    let err = store.create_product(nameless).await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("name"));
        }
        other => panic!("expected API error, got {}", other),
    }

    assert!(store.state().products().is_empty());
    // Mutation failures never drive the fetch status
    assert_eq!(store.state().status(), RequestStatus::Idle);
    assert!(store.state().error().is_none());
}

#[tokio::test]
async fn wire_format_is_camel_case_with_message_bodies() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/products", base_url))
        .json(&serde_json::json!({
            "name": "Widget",
            "count": 5,
            "imageUrl": "u",
            "size": { "width": 10, "height": 20 },
            "weight": "1kg"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["id"].as_str().is_some());
    assert_eq!(body["imageUrl"], "u");
    assert_eq!(body["comments"], serde_json::json!([]));

    let resp = client
        .delete(format!("{}/api/products/{}", base_url, body["id"].as_str().unwrap()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Product deleted");
}

#[tokio::test]
async fn fetch_failure_is_recorded_in_state() {
    // Nothing is listening here
    let mut store = ProductStore::new("http://127.0.0.1:9");
    let err = store.fetch_products().await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));

    assert_eq!(store.state().status(), RequestStatus::Failed);
    assert!(store.state().error().is_some());
}

#[tokio::test]
async fn sorted_view_over_fetched_products() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;
    let mut store = ProductStore::new(base_url.as_str());

    for (name, count) in [("Widget", 7), ("Anvil", 3), ("Widget", 2)] {
        let mut p = widget();
        p.name = name.into();
        p.count = count;
        store.create_product(p).await.unwrap();
    }
    store.fetch_products().await.unwrap();

    let sorted = store.state().sorted_products(SortOrder::NameAsc);
    let keys: Vec<(&str, i64)> = sorted.iter().map(|p| (p.name.as_str(), p.count)).collect();
    assert_eq!(keys, vec![("Anvil", 3), ("Widget", 2), ("Widget", 7)]);
}

// Product Catalog Server - REST API over the product document store

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use product_catalog::{app_state::AppState, catalog::create_catalog_router, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize application state
    let app_state = AppState::new(config.clone()).await?;

    // Create catalog router
    let catalog_router = create_catalog_router(app_state.catalog.clone());

    // Build main application router
    let app = Router::new()
        .nest("/api/products", catalog_router)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = config.server_address();
    println!("🚀 Product Catalog Server starting on http://{}", addr);
    println!("📋 API Documentation:");
    println!("  GET    /api/products                            - List products");
    println!("  POST   /api/products                            - Create product");
    println!("  GET    /api/products/{{id}}                       - Get product");
    println!("  PUT    /api/products/{{id}}                       - Update product");
    println!("  DELETE /api/products/{{id}}                       - Delete product");
    println!("  POST   /api/products/{{id}}/comments              - Add comment");
    println!("  DELETE /api/products/{{id}}/comments/{{commentId}}  - Delete comment");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

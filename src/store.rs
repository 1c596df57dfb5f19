use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::models::ProductDocument;

// Async document store over a SQLx connection pool. One collection of
// self-contained product documents; comments live inside the document.
pub struct CatalogStore {
    pool: SqlitePool,
}

impl CatalogStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url).await?;

        Ok(CatalogStore { pool })
    }

    pub async fn init(&self) -> Result<()> {
        // Product collection - each row is one JSON document keyed by doc_id
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS products (
                doc_id TEXT PRIMARY KEY,
                document TEXT NOT NULL,
                created INTEGER NOT NULL,
                updated INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // Persist a new document under a store-assigned id.
    pub async fn insert_product(&self, doc: &ProductDocument) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let now = Utc::now().timestamp();
        let document = serde_json::to_string(doc)?;

        sqlx::query(
            "INSERT INTO products (doc_id, document, created, updated) VALUES (?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(document)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Option<ProductDocument>> {
        let row = sqlx::query("SELECT document FROM products WHERE doc_id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let document: String = row.get("document");
                let doc = serde_json::from_str(&document)
                    .with_context(|| format!("corrupt product document {}", id))?;
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    // All documents in insertion order.
    pub async fn list_products(&self) -> Result<Vec<(Uuid, ProductDocument)>> {
        let rows = sqlx::query("SELECT doc_id, document FROM products ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;

        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            let doc_id: String = row.get("doc_id");
            let document: String = row.get("document");
            let id = Uuid::parse_str(&doc_id)
                .with_context(|| format!("corrupt product id {}", doc_id))?;
            let doc = serde_json::from_str(&document)
                .with_context(|| format!("corrupt product document {}", doc_id))?;
            products.push((id, doc));
        }

        Ok(products)
    }

    // Overwrite the whole document in place. Returns false if the id is absent.
    pub async fn replace_product(&self, id: Uuid, doc: &ProductDocument) -> Result<bool> {
        let now = Utc::now().timestamp();
        let document = serde_json::to_string(doc)?;

        let result = sqlx::query("UPDATE products SET document = ?, updated = ? WHERE doc_id = ?")
            .bind(document)
            .bind(now)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // Removing the row removes the embedded comments with it.
    pub async fn delete_product(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE doc_id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

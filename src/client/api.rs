use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::models::{Comment, NewComment, NewProduct, Product};

// Errors the client bindings surface: transport failures, or an API error
// response carrying the server's {message} body.
#[derive(Debug)]
pub enum ClientError {
    Http(reqwest::Error),
    Api { status: u16, message: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Http(err) => write!(f, "HTTP error: {}", err),
            ClientError::Api { status, message } => write!(f, "API error ({}): {}", status, message),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err)
    }
}

// One binding per REST operation. Stateless; reconciliation into client
// state happens in the ProductStore front type.
#[derive(Clone)]
pub struct CatalogApi {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/products{}", self.base_url, path)
    }

    pub async fn fetch_products(&self) -> Result<Vec<Product>, ClientError> {
        let resp = self.http.get(self.url("")).send().await?;
        json_body(resp).await
    }

    pub async fn fetch_product(&self, id: Uuid) -> Result<Product, ClientError> {
        let resp = self.http.get(self.url(&format!("/{}", id))).send().await?;
        json_body(resp).await
    }

    pub async fn create_product(&self, new: &NewProduct) -> Result<Product, ClientError> {
        let resp = self.http.post(self.url("")).json(new).send().await?;
        json_body(resp).await
    }

    // Sends the full product back, like a form submit; the server takes the
    // attribute fields and keeps its own comment sequence.
    pub async fn update_product(&self, product: &Product) -> Result<Product, ClientError> {
        let resp = self
            .http
            .put(self.url(&format!("/{}", product.id)))
            .json(product)
            .send()
            .await?;
        json_body(resp).await
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<(), ClientError> {
        let resp = self.http.delete(self.url(&format!("/{}", id))).send().await?;
        check(resp).await?;
        Ok(())
    }

    pub async fn add_comment(
        &self,
        product_id: Uuid,
        new: &NewComment,
    ) -> Result<Comment, ClientError> {
        let resp = self
            .http
            .post(self.url(&format!("/{}/comments", product_id)))
            .json(new)
            .send()
            .await?;
        json_body(resp).await
    }

    pub async fn delete_comment(
        &self,
        product_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(self.url(&format!("/{}/comments/{}", product_id, comment_id)))
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }
}

async fn json_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let resp = check(resp).await?;
    Ok(resp.json().await?)
}

// Map non-2xx responses to ClientError::Api, pulling the server's {message}
// body when it parses.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let message = resp
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| {
            body.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("request failed with status {}", status));

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

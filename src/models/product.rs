use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Wire representation of a product. `id` is mapped from the store's native
// document id at the service boundary; the JSON field names are camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub count: i64,
    pub image_url: String,
    pub size: Size,
    pub weight: String,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: i64,
    pub height: i64,
}

// A comment as returned to clients. Unique within its parent product; the
// `productId` back-reference is redundant with the embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub product_id: Uuid,
    pub description: String,
    pub date: String,
}

// Payload for creating or updating a product. Comment mutation goes through
// the dedicated comment endpoints, so no comments are accepted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub count: i64,
    pub image_url: String,
    pub size: Size,
    pub weight: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub description: String,
    pub date: String,
}

impl NewProduct {
    // Required-field checks, applied on create and again on update.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err(required("name"));
        }
        if self.count < 0 {
            return Err("Product validation failed: count must be a non-negative integer".into());
        }
        if self.image_url.trim().is_empty() {
            return Err(required("imageUrl"));
        }
        if self.size.width <= 0 || self.size.height <= 0 {
            return Err(
                "Product validation failed: size.width and size.height must be positive integers"
                    .into(),
            );
        }
        if self.weight.trim().is_empty() {
            return Err(required("weight"));
        }
        Ok(())
    }
}

impl NewComment {
    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("Comment validation failed: description is required".into());
        }
        if self.date.trim().is_empty() {
            return Err("Comment validation failed: date is required".into());
        }
        Ok(())
    }
}

fn required(field: &str) -> String {
    format!("Product validation failed: {} is required", field)
}

// Stored form of a product: the JSON document persisted in the `products`
// collection. The document id lives in the row, not the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDocument {
    pub name: String,
    pub count: i64,
    pub image_url: String,
    pub size: Size,
    pub weight: String,
    pub comments: Vec<CommentDocument>,
}

// Stored form of a comment, embedded in its parent document. `comment_id` is
// the native identity field, exposed to clients as `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDocument {
    pub comment_id: Uuid,
    pub product_id: Uuid,
    pub description: String,
    pub date: String,
}

impl ProductDocument {
    pub fn from_new(new: NewProduct) -> Self {
        ProductDocument {
            name: new.name,
            count: new.count,
            image_url: new.image_url,
            size: new.size,
            weight: new.weight,
            comments: Vec::new(),
        }
    }

    // Replace the attribute fields while keeping the embedded comments.
    pub fn apply_update(&mut self, update: NewProduct) {
        self.name = update.name;
        self.count = update.count;
        self.image_url = update.image_url;
        self.size = update.size;
        self.weight = update.weight;
    }

    pub fn into_product(self, id: Uuid) -> Product {
        Product {
            id,
            name: self.name,
            count: self.count,
            image_url: self.image_url,
            size: self.size,
            weight: self.weight,
            comments: self.comments.into_iter().map(CommentDocument::into_comment).collect(),
        }
    }
}

impl CommentDocument {
    pub fn into_comment(self) -> Comment {
        Comment {
            id: self.comment_id,
            product_id: self.product_id,
            description: self.description,
            date: self.date,
        }
    }
}

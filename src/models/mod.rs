// Catalog data model - wire types, stored documents, and field validation

pub mod product;

pub use product::{
    Comment, CommentDocument, NewComment, NewProduct, Product, ProductDocument, Size,
};

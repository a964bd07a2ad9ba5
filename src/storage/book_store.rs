// src/storage/book_store.rs
use async_trait::async_trait;

use crate::book::{Book, Collection};
use crate::error::StoreError;

/// [`BookStore`] owns the book collection. Handlers share one instance as
/// `Arc<dyn BookStore>`, so every implementation serializes its own mutations.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Returns every stored book.
    async fn list(&self) -> Result<Collection, StoreError>;

    async fn get(&self, id: &str) -> Result<Book, StoreError>;

    /// Stores a new book under a freshly generated id.
    async fn create(&self, title: String) -> Result<Book, StoreError>;

    /// Replaces the title of an existing book, keeping its id.
    async fn update(&self, id: &str, title: String) -> Result<Book, StoreError>;

    /// Removes a book. Removing an unknown id is not an error.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

use async_trait::async_trait;
use log::debug;
use tokio::sync::RwLock;

use super::book_store::BookStore;
use crate::book::{Book, Collection};
use crate::error::StoreError;
use crate::id::generate_id;

/// Volatile store, the collection is lost when the process exits.
pub struct MemoryStore {
    books: RwLock<Collection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            books: RwLock::new(Collection::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list(&self) -> Result<Collection, StoreError> {
        Ok(self.books.read().await.clone())
    }

    async fn get(&self, id: &str) -> Result<Book, StoreError> {
        self.books
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn create(&self, title: String) -> Result<Book, StoreError> {
        let book = Book::new(generate_id(), title);
        self.books.write().await.insert(book.id.clone(), book.clone());
        debug!("created book {}", book.id);
        Ok(book)
    }

    async fn update(&self, id: &str, title: String) -> Result<Book, StoreError> {
        let mut books = self.books.write().await;
        let book = books
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        book.title = title;
        debug!("updated book {}", id);
        Ok(book.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        if self.books.write().await.remove(id).is_some() {
            debug!("deleted book {}", id);
        }
        Ok(())
    }
}

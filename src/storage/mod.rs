pub mod book_store;
pub mod file_store;
pub mod memory_store;

pub use book_store::BookStore;
pub use file_store::FileStore;
pub use memory_store::MemoryStore;

pub mod book;
pub mod error;
pub mod id;
pub mod lifecycle;
pub mod routes;
pub mod server;
pub mod storage;

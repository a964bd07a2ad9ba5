// error.rs
use rocket::serde::json::serde_json;
use rocket::Responder;
use std::path::PathBuf;
use thiserror::Error;

use crate::book::BookId;

/// Error type for book stores
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Book not found: {0}")]
    NotFound(BookId),
    #[error("Data file {} is not a valid book collection: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("I/O error on data file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to encode book collection: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    /// Storage errors that leave the service unable to continue.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, StoreError::NotFound(_))
    }
}

/// Error responses of the HTTP routes. The body is the message text.
#[derive(Responder, Debug)]
pub enum ApiError {
    #[response(status = 404)]
    NotFound(String),
    #[response(status = 400)]
    BadRequest(String),
    #[response(status = 500)]
    Storage(String),
}

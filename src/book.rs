// book.rs
use rocket::serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type BookId = String;

/// All stored books keyed by id.
pub type Collection = BTreeMap<BookId, Book>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct Book {
    pub id: BookId,
    pub title: String,
}

/// Body accepted by the create and update routes. Any `id` sent by the
/// client is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct BookInput {
    #[serde(alias = "name")]
    pub title: String,
}

impl Book {
    pub fn new(id: BookId, title: String) -> Self {
        Self { id, title }
    }
}

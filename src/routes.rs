// routes.rs
use log::info;
use rocket::response::status;
use rocket::serde::json::{self, Json};
use rocket::{delete, get, post, put, routes, Route, Shutdown, State};
use std::sync::Arc;

use crate::book::{Book, BookInput, Collection};
use crate::error::{ApiError, StoreError};
use crate::lifecycle::Lifecycle;
use crate::storage::BookStore;

pub type SharedStore = Arc<dyn BookStore>;

pub fn book_routes() -> Vec<Route> {
    routes![
        list_books,
        get_book,
        create_book,
        update_book,
        delete_book,
    ]
}

fn store_failure(err: StoreError, lifecycle: &Lifecycle, shutdown: Shutdown) -> ApiError {
    if !err.is_fatal() {
        return ApiError::NotFound(err.to_string());
    }
    lifecycle.fail(&err, shutdown);
    ApiError::Storage(err.to_string())
}

fn bad_request(err: json::Error<'_>) -> ApiError {
    let reason = match err {
        json::Error::Io(e) => e.to_string(),
        json::Error::Parse(_, e) => e.to_string(),
    };
    ApiError::BadRequest(format!("Invalid book body: {}", reason))
}

#[get("/books")]
async fn list_books(
    store: &State<SharedStore>,
    lifecycle: &State<Arc<Lifecycle>>,
    shutdown: Shutdown,
) -> Result<Json<Collection>, ApiError> {
    store
        .list()
        .await
        .map(Json)
        .map_err(|e| store_failure(e, lifecycle, shutdown))
}

#[get("/books/<id>")]
async fn get_book(
    id: &str,
    store: &State<SharedStore>,
    lifecycle: &State<Arc<Lifecycle>>,
    shutdown: Shutdown,
) -> Result<Json<Book>, ApiError> {
    store
        .get(id)
        .await
        .map(Json)
        .map_err(|e| store_failure(e, lifecycle, shutdown))
}

#[post("/books", data = "<body>")]
async fn create_book(
    body: Result<Json<BookInput>, json::Error<'_>>,
    store: &State<SharedStore>,
    lifecycle: &State<Arc<Lifecycle>>,
    shutdown: Shutdown,
) -> Result<status::Created<Json<Book>>, ApiError> {
    let input = body.map_err(bad_request)?.into_inner();
    let book = store
        .create(input.title)
        .await
        .map_err(|e| store_failure(e, lifecycle, shutdown))?;
    info!("Created book {}", book.id);
    Ok(status::Created::new(format!("/books/{}", book.id)).body(Json(book)))
}

#[put("/books/<id>", data = "<body>")]
async fn update_book(
    id: &str,
    body: Result<Json<BookInput>, json::Error<'_>>,
    store: &State<SharedStore>,
    lifecycle: &State<Arc<Lifecycle>>,
    shutdown: Shutdown,
) -> Result<Json<Book>, ApiError> {
    let input = match body {
        Ok(input) => input.into_inner(),
        Err(e) => {
            // An unknown id wins over a malformed body.
            store
                .get(id)
                .await
                .map_err(|err| store_failure(err, lifecycle, shutdown))?;
            return Err(bad_request(e));
        }
    };
    let book = store
        .update(id, input.title)
        .await
        .map_err(|e| store_failure(e, lifecycle, shutdown))?;
    info!("Updated book {}", book.id);
    Ok(Json(book))
}

#[delete("/books/<id>")]
async fn delete_book(
    id: &str,
    store: &State<SharedStore>,
    lifecycle: &State<Arc<Lifecycle>>,
    shutdown: Shutdown,
) -> Result<status::NoContent, ApiError> {
    store
        .delete(id)
        .await
        .map_err(|e| store_failure(e, lifecycle, shutdown))?;
    info!("Deleted book {}", id);
    Ok(status::NoContent)
}

use axum::{
    body::StreamBody,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use futures::StreamExt;
use serde_json::Value;
use crate::books::dto::BookDto;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest};
use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest};
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::core::library::CatalogResult;

// missing books are answered with 204 rather than 404
fn book_or_no_content(book: Option<BookDto>) -> Response {
    match book {
        Some(book) => Json(book).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

fn to_ndjson_line(book: BookDto) -> CatalogResult<String> {
    let mut line = serde_json::to_string(&book)?;
    line.push('\n');
    Ok(line)
}

// Streams one JSON book per line as the service emits them. The body is pulled by the
// transport, so a client that stops reading stops the listing.
pub(crate) async fn list_books(
    State(state): State<AppState>,
    Query(req): Query<ListBooksCommandRequest>) -> Result<Response, ServerError> {
    let res = ListBooksCommand::new(state.catalog_service).execute(req).await?;
    let body = StreamBody::new(res.books.map(|book| book.and_then(to_ndjson_line)));
    Ok(([(header::CONTENT_TYPE, "application/x-ndjson")], body).into_response())
}

pub(crate) async fn add_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<BookDto>, ServerError> {
    let req: AddBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = AddBookCommand::new(state.catalog_service).execute(req).await?;
    Ok(Json(res.book))
}

pub(crate) async fn find_book_by_id(
    State(state): State<AppState>,
    Path(book_id): Path<i64>) -> Result<Response, ServerError> {
    let req = GetBookCommandRequest::new(book_id);
    let res = GetBookCommand::new(state.catalog_service).execute(req).await?;
    Ok(book_or_no_content(res.book))
}

pub(crate) async fn update_book(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
    json: Json<Value>) -> Result<Response, ServerError> {
    let patch: BookDto = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let req = UpdateBookCommandRequest::new(book_id, patch.title.as_str(), patch.author.as_str());
    let res = UpdateBookCommand::new(state.catalog_service).execute(req).await?;
    Ok(book_or_no_content(res.book))
}

pub(crate) async fn remove_book(
    State(state): State<AppState>,
    Path(book_id): Path<i64>) -> Result<Response, ServerError> {
    let req = RemoveBookCommandRequest::new(book_id);
    let res = RemoveBookCommand::new(state.catalog_service).execute(req).await?;
    Ok(book_or_no_content(res.book))
}

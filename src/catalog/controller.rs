use axum::{
    body::HttpBody,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    BoxError, Router,
};
use serde_json::Value;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest, AddBookCommandResponse};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest, GetBookCommandResponse};
use crate::catalog::command::lend_book_cmd::{LendBookCommand, LendBookCommandRequest, LendBookCommandResponse};
use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest, ListBooksCommandResponse};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest};
use crate::catalog::command::search_books_cmd::{SearchBooksCommand, SearchBooksCommandRequest, SearchBooksCommandResponse};
use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest, UpdateBookCommandResponse};
use crate::catalog::domain::lifecycle::LendingAction;
use crate::core::command::{Command, CommandError};
use crate::core::controller::{AppState, json_to_server_error, ServerError};

// generic over the request body so the same routes serve hyper and lambda_http requests
pub fn build_router<B>(state: AppState) -> Router<(), B>
    where B: HttpBody + Send + 'static,
          B::Data: Send,
          B::Error: Into<BoxError> {
    Router::new()
        .route("/books", get(list_books).post(add_book).put(update_book))
        .route("/books/search", get(search_books))
        .route("/books/:isbn", get(find_book_by_isbn).delete(remove_book))
        .route("/books/:isbn/:action", post(lend_book))
        .with_state(state)
}

pub(crate) async fn add_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<AddBookCommandResponse>, ServerError> {
    let req: AddBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = AddBookCommand::new(state.catalog.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn update_book(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<UpdateBookCommandResponse>, ServerError> {
    let req: UpdateBookCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let res = UpdateBookCommand::new(state.catalog.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn find_book_by_isbn(
    State(state): State<AppState>,
    Path(isbn): Path<String>) -> Result<Json<GetBookCommandResponse>, ServerError> {
    let req = GetBookCommandRequest::new(isbn);
    let res = GetBookCommand::new(state.catalog.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn remove_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>) -> Result<StatusCode, ServerError> {
    let req = RemoveBookCommandRequest::new(isbn);
    let _ = RemoveBookCommand::new(state.catalog.clone()).execute(req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn list_books(
    State(state): State<AppState>,
    Query(mut req): Query<ListBooksCommandRequest>) -> Result<Json<ListBooksCommandResponse>, ServerError> {
    req.size = req.size.or(Some(state.config.default_page_size));
    let res = ListBooksCommand::new(state.catalog.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn search_books(
    State(state): State<AppState>,
    Query(mut req): Query<SearchBooksCommandRequest>) -> Result<Json<SearchBooksCommandResponse>, ServerError> {
    req.size = req.size.or(Some(state.config.default_page_size));
    let res = SearchBooksCommand::new(state.catalog.clone()).execute(req).await?;
    Ok(Json(res))
}

pub(crate) async fn lend_book(
    State(state): State<AppState>,
    Path((isbn, action)): Path<(String, String)>) -> Result<Json<LendBookCommandResponse>, ServerError> {
    let action = action.parse::<LendingAction>().map_err(CommandError::from)?;
    let req = LendBookCommandRequest::new(isbn.as_str(), action);
    let res = LendBookCommand::new(state.catalog.clone()).execute(req).await?;
    Ok(Json(res))
}

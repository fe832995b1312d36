use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::extractors::CurrentUser;
use crate::books::dto::{CreateBookRequest, UpdateBookRequest};
use crate::books::repo::Book;
use crate::error::{is_unique_violation, ApiError, JsonBody};
use crate::state::AppState;

pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route("/books/:id", put(update_book).delete(delete_book))
}

#[instrument(skip(state, payload, user), fields(user_id = %user.0.id))]
pub async fn create_book(
    State(state): State<AppState>,
    user: CurrentUser,
    JsonBody(payload): JsonBody<CreateBookRequest>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    payload.validate()?;

    let book = match Book::create(
        &state.db,
        &payload.title,
        &payload.author,
        &payload.isbn,
        &payload.genre,
        payload.published_year,
        payload.pages,
        payload.description.as_deref(),
        payload.price,
        user.0.id,
    )
    .await
    {
        Ok(book) => book,
        Err(e) if is_unique_violation(&e) => {
            warn!(isbn = %payload.isbn, "isbn already in catalog");
            return Err(ApiError::Validation("ISBN already registered".into()));
        }
        Err(e) => return Err(ApiError::Internal(e.into())),
    };

    info!(book_id = %book.id, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

#[instrument(skip(state, _user))]
pub async fn list_books(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<Book>>, ApiError> {
    let books = Book::list(&state.db).await?;
    info!(count = books.len(), "books listed");
    Ok(Json(books))
}

#[instrument(skip(state, payload, _user))]
pub async fn update_book(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<UpdateBookRequest>,
) -> Result<Json<Book>, ApiError> {
    payload.validate()?;

    let book = match Book::update(&state.db, id, &payload).await {
        Ok(Some(book)) => book,
        Ok(None) => {
            warn!(book_id = %id, "book not found");
            return Err(ApiError::NotFound("Book"));
        }
        Err(e) if is_unique_violation(&e) => {
            warn!(book_id = %id, "isbn already in catalog");
            return Err(ApiError::Validation("ISBN already registered".into()));
        }
        Err(e) => return Err(ApiError::Internal(e.into())),
    };

    info!(book_id = %id, "book updated");
    Ok(Json(book))
}

#[instrument(skip(state, _user))]
pub async fn delete_book(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !Book::delete(&state.db, id).await? {
        warn!(book_id = %id, "book not found");
        return Err(ApiError::NotFound("Book"));
    }
    info!(book_id = %id, "book deleted");
    Ok(Json(json!({ "message": "Book deleted" })))
}

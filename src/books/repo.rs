use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::books::dto::UpdateBookRequest;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: String,
    pub published_year: i32,
    pub pages: i32,
    pub description: Option<String>,
    pub price: f64,
    pub added_by: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Book {
    /// Inserts a book. ISBN uniqueness is enforced by the store; the raw
    /// error is returned so callers can map a unique violation.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &PgPool,
        title: &str,
        author: &str,
        isbn: &str,
        genre: &str,
        published_year: i32,
        pages: i32,
        description: Option<&str>,
        price: f64,
        added_by: Uuid,
    ) -> Result<Book, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books
                (title, author, isbn, genre, published_year, pages, description, price, added_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, title, author, isbn, genre, published_year, pages,
                      description, price, added_by, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(author)
        .bind(isbn)
        .bind(genre)
        .bind(published_year)
        .bind(pages)
        .bind(description)
        .bind(price)
        .bind(added_by)
        .fetch_one(db)
        .await
    }

    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, isbn, genre, published_year, pages,
                   description, price, added_by, created_at, updated_at
            FROM books
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Applies the present fields of `patch`; absent fields keep their
    /// stored value. `None` result means the id does not exist.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        patch: &UpdateBookRequest,
    ) -> Result<Option<Book>, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                isbn = COALESCE($4, isbn),
                genre = COALESCE($5, genre),
                published_year = COALESCE($6, published_year),
                pages = COALESCE($7, pages),
                description = COALESCE($8, description),
                price = COALESCE($9, price),
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, author, isbn, genre, published_year, pages,
                      description, price, added_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.author.as_deref())
        .bind(patch.isbn.as_deref())
        .bind(patch.genre.as_deref())
        .bind(patch.published_year)
        .bind(patch.pages)
        .bind(patch.description.as_deref())
        .bind(patch.price)
        .fetch_optional(db)
        .await
    }

    /// Returns whether a row was deleted.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let deleted = sqlx::query_scalar::<_, Uuid>(
            r#"
            DELETE FROM books
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(deleted.is_some())
    }
}

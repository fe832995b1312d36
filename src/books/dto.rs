use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::error::ApiError;

lazy_static! {
    static ref ISBN_RE: Regex = Regex::new(r"^[\d-]+$").unwrap();
}

fn check_title(title: &str) -> Result<(), ApiError> {
    if title.is_empty() || title.chars().count() > 100 {
        return Err(ApiError::Validation(
            "Title must be between 1 and 100 characters".into(),
        ));
    }
    Ok(())
}

fn check_author(author: &str) -> Result<(), ApiError> {
    if author.is_empty() || author.chars().count() > 50 {
        return Err(ApiError::Validation(
            "Author must be between 1 and 50 characters".into(),
        ));
    }
    Ok(())
}

fn check_isbn(isbn: &str) -> Result<(), ApiError> {
    if !ISBN_RE.is_match(isbn) {
        return Err(ApiError::Validation(
            "ISBN may only contain digits and hyphens".into(),
        ));
    }
    Ok(())
}

fn check_genre(genre: &str) -> Result<(), ApiError> {
    if genre.is_empty() {
        return Err(ApiError::Validation("Genre is required".into()));
    }
    Ok(())
}

fn check_published_year(year: i32) -> Result<(), ApiError> {
    let current = OffsetDateTime::now_utc().year();
    if year < 1000 || year > current {
        return Err(ApiError::Validation(format!(
            "Published year must be between 1000 and {current}"
        )));
    }
    Ok(())
}

fn check_pages(pages: i32) -> Result<(), ApiError> {
    if pages < 1 {
        return Err(ApiError::Validation("Pages must be at least 1".into()));
    }
    Ok(())
}

fn check_description(description: &str) -> Result<(), ApiError> {
    if description.chars().count() > 500 {
        return Err(ApiError::Validation(
            "Description must be at most 500 characters".into(),
        ));
    }
    Ok(())
}

fn check_price(price: f64) -> Result<(), ApiError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ApiError::Validation("Price must be non-negative".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: String,
    pub published_year: i32,
    pub pages: i32,
    pub description: Option<String>,
    pub price: f64,
}

impl CreateBookRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_title(&self.title)?;
        check_author(&self.author)?;
        check_isbn(&self.isbn)?;
        check_genre(&self.genre)?;
        check_published_year(self.published_year)?;
        check_pages(self.pages)?;
        if let Some(d) = &self.description {
            check_description(d)?;
        }
        check_price(self.price)
    }
}

/// Partial update: every field optional, present fields validated with the
/// same rules as on create.
#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub published_year: Option<i32>,
    pub pages: Option<i32>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

impl UpdateBookRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(t) = &self.title {
            check_title(t)?;
        }
        if let Some(a) = &self.author {
            check_author(a)?;
        }
        if let Some(i) = &self.isbn {
            check_isbn(i)?;
        }
        if let Some(g) = &self.genre {
            check_genre(g)?;
        }
        if let Some(y) = self.published_year {
            check_published_year(y)?;
        }
        if let Some(p) = self.pages {
            check_pages(p)?;
        }
        if let Some(d) = &self.description {
            check_description(d)?;
        }
        if let Some(p) = self.price {
            check_price(p)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CreateBookRequest {
        CreateBookRequest {
            title: "The Mythical Man-Month".into(),
            author: "Frederick Brooks".into(),
            isbn: "978-0-201-83595-3".into(),
            genre: "Software".into(),
            published_year: 1975,
            pages: 322,
            description: None,
            price: 29.99,
        }
    }

    #[test]
    fn valid_book_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn bad_isbn_rejected() {
        let mut req = valid();
        req.isbn = "978-0-201-ABCDE".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn year_out_of_range_rejected() {
        let mut req = valid();
        req.published_year = 999;
        assert!(req.validate().is_err());
        req.published_year = OffsetDateTime::now_utc().year() + 1;
        assert!(req.validate().is_err());
    }

    #[test]
    fn negative_price_rejected() {
        let mut req = valid();
        req.price = -0.01;
        assert!(req.validate().is_err());
    }

    #[test]
    fn limits_count_characters_not_bytes() {
        // 60 CJK chars is 180 bytes but well within the 100-char limit.
        let mut req = valid();
        req.title = "書".repeat(60);
        assert!(req.validate().is_ok());
        req.title = "書".repeat(101);
        assert!(req.validate().is_err());
    }

    #[test]
    fn long_description_rejected() {
        let mut req = valid();
        req.description = Some("x".repeat(501));
        assert!(req.validate().is_err());
    }

    #[test]
    fn empty_update_is_valid() {
        let req = UpdateBookRequest {
            title: None,
            author: None,
            isbn: None,
            genre: None,
            published_year: None,
            pages: None,
            description: None,
            price: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn update_validates_present_fields() {
        let req = UpdateBookRequest {
            title: Some(String::new()),
            author: None,
            isbn: None,
            genre: None,
            published_year: None,
            pages: None,
            description: None,
            price: None,
        };
        assert!(req.validate().is_err());
    }
}

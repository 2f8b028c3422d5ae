use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookEntity;
use crate::core::library::{BookStatus, LibraryError, LibraryResult, PaginatedResult};

pub const INVALID_BOOK_DATA: &str = "Invalid book data";

// BookDto is a data transfer object for Catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDto {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub status: BookStatus,
}

impl BookDto {
    pub fn new(isbn: &str, title: &str, author: &str, publisher: &str, status: BookStatus) -> BookDto {
        BookDto {
            isbn: isbn.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            publisher: publisher.to_string(),
            status,
        }
    }

    // every field except status must carry non-whitespace text
    pub fn validate(&self) -> LibraryResult<()> {
        let mut errors = vec![];
        if self.isbn.trim().is_empty() {
            errors.push("ISBN cannot be blank");
        }
        if self.title.trim().is_empty() {
            errors.push("Title cannot be blank");
        }
        if self.author.trim().is_empty() {
            errors.push("Author cannot be blank");
        }
        if self.publisher.trim().is_empty() {
            errors.push("Publisher cannot be blank");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(LibraryError::validation(INVALID_BOOK_DATA, Some(errors.join(", "))))
        }
    }
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            isbn: other.isbn.to_string(),
            title: other.title.to_string(),
            author: other.author.to_string(),
            publisher: other.publisher.to_string(),
            status: other.book_status,
        }
    }
}

impl From<&BookDto> for BookEntity {
    fn from(other: &BookDto) -> Self {
        Self {
            isbn: other.isbn.to_string(),
            title: other.title.to_string(),
            author: other.author.to_string(),
            publisher: other.publisher.to_string(),
            book_status: other.status,
        }
    }
}

// BookPageDto is the serialized shape of one page of books
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookPageDto {
    pub content: Vec<BookDto>,
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl From<PaginatedResult<BookDto>> for BookPageDto {
    fn from(other: PaginatedResult<BookDto>) -> Self {
        let total_pages = other.total_pages();
        Self {
            content: other.records,
            page: other.page,
            size: other.page_size,
            total_elements: other.total_records,
            total_pages,
        }
    }
}

use serde::{Deserialize, Serialize};
use crate::core::library::BookStatus;

// BookEntity abstracts a catalog record, identified by its isbn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEntity {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub book_status: BookStatus,
}

impl BookEntity {
    pub fn new(isbn: &str, title: &str, author: &str, publisher: &str, status: BookStatus) -> Self {
        Self {
            isbn: isbn.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            publisher: publisher.to_string(),
            book_status: status,
        }
    }
}

use crate::books::domain::model::BookEntity;
use crate::core::library::BookStatus;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BookField {
    Title,
    Author,
    Isbn,
}

impl BookField {
    fn value<'a>(&self, book: &'a BookEntity) -> &'a str {
        match self {
            BookField::Title => book.title.as_str(),
            BookField::Author => book.author.as_str(),
            BookField::Isbn => book.isbn.as_str(),
        }
    }
}

/// Predicate over catalog records used by every listing and search query.
///
/// An optional status is ANDed with the disjunction of the `contains` clauses.
/// A filter without clauses accepts every record that passes the status check.
#[derive(Debug, PartialEq, Clone)]
pub struct BookFilter {
    status: Option<BookStatus>,
    clauses: Vec<(BookField, String)>,
    case_insensitive: bool,
}

impl BookFilter {
    pub fn all() -> Self {
        BookFilter {
            status: None,
            clauses: vec![],
            case_insensitive: true,
        }
    }

    pub fn by_status(status: Option<BookStatus>) -> Self {
        BookFilter {
            status,
            ..BookFilter::all()
        }
    }

    // title, author or isbn containing the given text, ignoring case. Omitted or empty
    // fields take no part in the match.
    pub fn any_of(title: Option<&str>, author: Option<&str>, isbn: Option<&str>) -> Self {
        let mut filter = BookFilter::all();
        filter.push(BookField::Title, title);
        filter.push(BookField::Author, author);
        filter.push(BookField::Isbn, isbn);
        filter
    }

    // status AND (title OR author OR isbn containing keyword), matched with case
    pub fn status_and_keyword(status: BookStatus, keyword: &str) -> Self {
        let mut filter = BookFilter {
            status: Some(status),
            clauses: vec![],
            case_insensitive: false,
        };
        filter.push(BookField::Title, Some(keyword));
        filter.push(BookField::Author, Some(keyword));
        filter.push(BookField::Isbn, Some(keyword));
        filter
    }

    fn push(&mut self, field: BookField, needle: Option<&str>) {
        if let Some(needle) = needle {
            if !needle.is_empty() {
                let needle = if self.case_insensitive { needle.to_lowercase() } else { needle.to_string() };
                self.clauses.push((field, needle));
            }
        }
    }

    pub fn status(&self) -> Option<BookStatus> {
        self.status
    }

    pub fn matches(&self, book: &BookEntity) -> bool {
        if let Some(status) = self.status {
            if book.book_status != status {
                return false;
            }
        }
        if self.clauses.is_empty() {
            return true;
        }
        self.clauses.iter().any(|(field, needle)| {
            let value = field.value(book);
            if self.case_insensitive {
                value.to_lowercase().contains(needle.as_str())
            } else {
                value.contains(needle.as_str())
            }
        })
    }
}

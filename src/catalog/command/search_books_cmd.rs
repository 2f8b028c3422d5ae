use std::sync::Arc;
use async_trait::async_trait;
use serde::Deserialize;
use crate::books::dto::BookPageDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::library::{BookStatus, PageRequest};

pub struct SearchBooksCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl SearchBooksCommand {
    pub fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

// With a status the keyword is matched against title, author and isbn of books in that
// status, otherwise any of title, author and isbn may match.
#[derive(Debug, Default, Deserialize)]
pub struct SearchBooksCommandRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub status: Option<BookStatus>,
    pub keyword: Option<String>,
    pub page: Option<usize>,
    pub size: Option<usize>,
}

impl SearchBooksCommandRequest {
    pub fn by_fields(title: Option<&str>, author: Option<&str>, isbn: Option<&str>) -> Self {
        Self {
            title: title.map(str::to_string),
            author: author.map(str::to_string),
            isbn: isbn.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn by_status(status: BookStatus, keyword: &str) -> Self {
        Self {
            status: Some(status),
            keyword: Some(keyword.to_string()),
            ..Default::default()
        }
    }

    pub fn page_request(&self, default_size: usize) -> PageRequest {
        PageRequest::new(self.page.unwrap_or(0), self.size.unwrap_or(default_size))
    }
}

pub type SearchBooksCommandResponse = BookPageDto;

#[async_trait]
impl Command<SearchBooksCommandRequest, SearchBooksCommandResponse> for SearchBooksCommand {
    async fn execute(&self, req: SearchBooksCommandRequest) -> Result<SearchBooksCommandResponse, CommandError> {
        let page = req.page_request(PageRequest::default().size);
        let res = match req.status {
            Some(status) => {
                self.catalog_service.search_books_by_status(
                    status, req.keyword.as_deref().unwrap_or_default(), &page).await
            }
            None => {
                self.catalog_service.search_books(
                    req.title.as_deref(), req.author.as_deref(), req.isbn.as_deref(), &page).await
            }
        };
        res.map_err(CommandError::from).map(BookPageDto::from)
    }
}

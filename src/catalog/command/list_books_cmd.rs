use std::sync::Arc;
use async_trait::async_trait;
use serde::Deserialize;
use crate::books::dto::BookPageDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::library::{BookStatus, PageRequest};

pub struct ListBooksCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl ListBooksCommand {
    pub fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListBooksCommandRequest {
    pub status: Option<BookStatus>,
    pub page: Option<usize>,
    pub size: Option<usize>,
}

impl ListBooksCommandRequest {
    pub fn new(status: Option<BookStatus>, page: usize, size: usize) -> Self {
        Self {
            status,
            page: Some(page),
            size: Some(size),
        }
    }

    pub fn page_request(&self, default_size: usize) -> PageRequest {
        PageRequest::new(self.page.unwrap_or(0), self.size.unwrap_or(default_size))
    }
}

pub type ListBooksCommandResponse = BookPageDto;

#[async_trait]
impl Command<ListBooksCommandRequest, ListBooksCommandResponse> for ListBooksCommand {
    async fn execute(&self, req: ListBooksCommandRequest) -> Result<ListBooksCommandResponse, CommandError> {
        let page = req.page_request(PageRequest::default().size);
        self.catalog_service.list_books(req.status, &page)
            .await.map_err(CommandError::from).map(BookPageDto::from)
    }
}

use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::catalog::domain::lifecycle::LendingAction;
use crate::core::command::{Command, CommandError};

pub struct LendBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl LendBookCommand {
    pub fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub struct LendBookCommandRequest {
    pub isbn: String,
    pub action: LendingAction,
}

impl LendBookCommandRequest {
    pub fn new(isbn: &str, action: LendingAction) -> Self {
        Self {
            isbn: isbn.to_string(),
            action,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct LendBookCommandResponse {
    pub book: BookDto,
}

impl LendBookCommandResponse {
    pub fn new(book: BookDto) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<LendBookCommandRequest, LendBookCommandResponse> for LendBookCommand {
    async fn execute(&self, req: LendBookCommandRequest) -> Result<LendBookCommandResponse, CommandError> {
        self.catalog_service.lend(req.isbn.as_str(), req.action)
            .await.map_err(CommandError::from).map(LendBookCommandResponse::new)
    }
}

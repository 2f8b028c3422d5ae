pub mod ddb_book_repository;
pub mod memory_book_repository;

use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::books::filter::BookFilter;
use crate::core::library::{BookStatus, LibraryResult, PageRequest, PaginatedResult};
use crate::core::repository::Repository;

#[async_trait]
pub trait BookRepository: Repository<BookEntity> {
    // returns the requested page of matching books in isbn order
    async fn query(&self, filter: &BookFilter, page: &PageRequest) -> LibraryResult<PaginatedResult<BookEntity>>;

    // sets the status only if the stored status still equals `expected`
    async fn update_status(&self, isbn: &str, expected: BookStatus, status: BookStatus) -> LibraryResult<BookEntity>;

    async fn list_paged(&self, status: Option<BookStatus>, page: &PageRequest) -> LibraryResult<PaginatedResult<BookEntity>> {
        self.query(&BookFilter::by_status(status), page).await
    }

    async fn search_paged(&self, title: Option<&str>, author: Option<&str>, isbn: Option<&str>,
                          page: &PageRequest) -> LibraryResult<PaginatedResult<BookEntity>> {
        self.query(&BookFilter::any_of(title, author, isbn), page).await
    }

    async fn search_paged_with_status(&self, status: BookStatus, keyword: &str,
                                      page: &PageRequest) -> LibraryResult<PaginatedResult<BookEntity>> {
        self.query(&BookFilter::status_and_keyword(status, keyword), page).await
    }
}

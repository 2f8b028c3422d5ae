pub mod lifecycle;
pub mod service;

use async_trait::async_trait;
use crate::books::dto::BookDto;
use crate::catalog::domain::lifecycle::LendingAction;
use crate::core::library::{BookStatus, LibraryResult, PageRequest, PaginatedResult};

#[async_trait]
pub trait CatalogService: Sync + Send {
    async fn add_book(&self, book: &BookDto) -> LibraryResult<BookDto>;
    async fn update_book(&self, book: &BookDto) -> LibraryResult<BookDto>;
    async fn remove_book(&self, isbn: &str) -> LibraryResult<()>;
    async fn find_book_by_isbn(&self, isbn: &str) -> LibraryResult<BookDto>;
    async fn list_books(&self, status: Option<BookStatus>, page: &PageRequest) -> LibraryResult<PaginatedResult<BookDto>>;
    async fn search_books(&self, title: Option<&str>, author: Option<&str>, isbn: Option<&str>,
                          page: &PageRequest) -> LibraryResult<PaginatedResult<BookDto>>;
    async fn search_books_by_status(&self, status: BookStatus, keyword: &str,
                                    page: &PageRequest) -> LibraryResult<PaginatedResult<BookDto>>;
    async fn lend(&self, isbn: &str, action: LendingAction) -> LibraryResult<BookDto>;

    async fn borrow_book(&self, isbn: &str) -> LibraryResult<BookDto> {
        self.lend(isbn, LendingAction::Borrow).await
    }

    async fn return_book(&self, isbn: &str) -> LibraryResult<BookDto> {
        self.lend(isbn, LendingAction::Return).await
    }

    async fn reserve_book(&self, isbn: &str) -> LibraryResult<BookDto> {
        self.lend(isbn, LendingAction::Reserve).await
    }

    async fn cancel_reservation(&self, isbn: &str) -> LibraryResult<BookDto> {
        self.lend(isbn, LendingAction::CancelReservation).await
    }
}

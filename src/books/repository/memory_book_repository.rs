use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::books::domain::model::BookEntity;
use crate::books::filter::BookFilter;
use crate::books::repository::BookRepository;
use crate::core::library::{BookStatus, LibraryError, LibraryResult, PageRequest, PaginatedResult};
use crate::core::repository::Repository;

// MemoryBookRepository keeps books ordered by isbn for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryBookRepository {
    books: RwLock<BTreeMap<String, BookEntity>>,
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository<BookEntity> for MemoryBookRepository {
    async fn upsert(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let mut books = self.books.write().await;
        books.insert(entity.isbn.to_string(), entity.clone());
        Ok(entity.clone())
    }

    async fn get(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        let books = self.books.read().await;
        Ok(books.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let mut books = self.books.write().await;
        Ok(books.remove(id).map(|_| 1).unwrap_or(0))
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn query(&self, filter: &BookFilter, page: &PageRequest) -> LibraryResult<PaginatedResult<BookEntity>> {
        let books = self.books.read().await;
        let matched = books.values().filter(|b| filter.matches(b)).cloned().collect();
        Ok(PaginatedResult::slice(matched, page))
    }

    async fn update_status(&self, isbn: &str, expected: BookStatus, status: BookStatus) -> LibraryResult<BookEntity> {
        let mut books = self.books.write().await;
        match books.get_mut(isbn) {
            Some(book) if book.book_status == expected => {
                book.book_status = status;
                Ok(book.clone())
            }
            Some(book) => Err(LibraryError::unavailable(
                format!("book {} status changed from {} to {}", isbn, expected, book.book_status).as_str(),
                Some("ConditionalCheckFailed".to_string()), true)),
            None => Err(LibraryError::not_found(format!("book not found for {}", isbn).as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::BookEntity;
    use crate::books::repository::BookRepository;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::core::library::{BookStatus, LibraryError, PageRequest};
    use crate::core::repository::Repository;

    #[tokio::test]
    async fn test_should_upsert_get_books() {
        let books_repo = MemoryBookRepository::new();
        let mut book = BookEntity::new("isbn", "test book", "author", "publisher", BookStatus::Available);
        let _ = books_repo.upsert(&book).await.expect("should create book");

        book.title = "new title".to_string();
        let _ = books_repo.upsert(&book).await.expect("should replace book");

        let loaded = books_repo.get("isbn").await.expect("should return book").expect("should exist");
        assert_eq!(book, loaded);
        assert!(books_repo.get("missing").await.expect("should query").is_none());
    }

    #[tokio::test]
    async fn test_should_delete_books() {
        let books_repo = MemoryBookRepository::new();
        let book = BookEntity::new("isbn", "test book", "author", "publisher", BookStatus::Available);
        let _ = books_repo.upsert(&book).await.expect("should create book");

        assert_eq!(1, books_repo.delete("isbn").await.expect("should delete book"));
        assert_eq!(0, books_repo.delete("isbn").await.expect("should ignore missing book"));
        assert!(books_repo.get("isbn").await.expect("should query").is_none());
    }

    #[tokio::test]
    async fn test_should_update_status_conditionally() {
        let books_repo = MemoryBookRepository::new();
        let book = BookEntity::new("isbn", "test book", "author", "publisher", BookStatus::Available);
        let _ = books_repo.upsert(&book).await.expect("should create book");

        let updated = books_repo.update_status("isbn", BookStatus::Available, BookStatus::Borrowed)
            .await.expect("should update status");
        assert_eq!(BookStatus::Borrowed, updated.book_status);

        let res = books_repo.update_status("isbn", BookStatus::Available, BookStatus::Reserved).await;
        assert!(matches!(res, Err(LibraryError::CurrentlyUnavailable { retryable: true, .. })));

        let res = books_repo.update_status("missing", BookStatus::Available, BookStatus::Reserved).await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_query_books() {
        let books_repo = MemoryBookRepository::new();
        add_test_books(&books_repo).await;

        let res = books_repo.list_paged(None, &PageRequest::new(0, 20)).await.expect("should list books");
        assert_eq!(20, res.records.len());
        assert_eq!(50, res.total_records);
        assert_eq!("isbn_00", res.records[0].isbn.as_str());

        let mut page = Some(0);
        let mut total = 0;
        while let Some(n) = page {
            let res = books_repo.list_paged(Some(BookStatus::Borrowed), &PageRequest::new(n, 10))
                .await.expect("should list books");
            assert!(res.records.iter().all(|b| b.book_status == BookStatus::Borrowed));
            total += res.records.len();
            page = res.next_page();
        }
        assert_eq!(25, total);

        let res = books_repo.search_paged(Some("TITLE_1"), None, None, &PageRequest::default())
            .await.expect("should search books");
        assert_eq!(11, res.records.len());

        let res = books_repo.search_paged_with_status(BookStatus::Available, "isbn_1", &PageRequest::default())
            .await.expect("should search books");
        assert_eq!(5, res.records.len());
    }

    async fn add_test_books(books_repo: &MemoryBookRepository) {
        for i in 0..50 {
            let status = if i % 2 == 0 { BookStatus::Available } else { BookStatus::Borrowed };
            let book = BookEntity::new(format!("isbn_{:02}", i).as_str(),
                                       format!("title_{}", i).as_str(), "author", "publisher", status);
            let _ = books_repo.upsert(&book).await.expect("should create book");
        }
    }
}

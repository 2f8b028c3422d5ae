use async_trait::async_trait;
use tracing::{debug, info, warn};
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::catalog::domain::lifecycle::LendingAction;
use crate::core::domain::Configuration;
use crate::core::library::{BookStatus, LibraryError, LibraryResult, PageRequest, PaginatedResult};

const MAX_LENDING_ATTEMPTS: usize = 3;

pub(crate) struct CatalogServiceImpl {
    max_page_size: usize,
    book_repository: Box<dyn BookRepository>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(config: &Configuration, book_repository: Box<dyn BookRepository>) -> Self {
        Self {
            max_page_size: config.max_page_size,
            book_repository,
        }
    }

    fn limit(&self, page: &PageRequest) -> PageRequest {
        page.limited(self.max_page_size)
    }

    async fn load(&self, isbn: &str) -> LibraryResult<BookEntity> {
        self.book_repository.get(isbn).await?
            .ok_or_else(|| LibraryError::not_found(format!("Book not found with isbn : {}", isbn).as_str()))
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn add_book(&self, book: &BookDto) -> LibraryResult<BookDto> {
        let mut entity = BookEntity::from(book);
        entity.book_status = BookStatus::Available;
        let saved = self.book_repository.upsert(&entity).await?;
        info!(isbn = saved.isbn.as_str(), "added book");
        Ok(BookDto::from(&saved))
    }

    async fn update_book(&self, book: &BookDto) -> LibraryResult<BookDto> {
        let saved = self.book_repository.upsert(&BookEntity::from(book)).await?;
        info!(isbn = saved.isbn.as_str(), status = %saved.book_status, "updated book");
        Ok(BookDto::from(&saved))
    }

    async fn remove_book(&self, isbn: &str) -> LibraryResult<()> {
        let removed = self.book_repository.delete(isbn).await?;
        info!(isbn, removed, "removed book");
        Ok(())
    }

    async fn find_book_by_isbn(&self, isbn: &str) -> LibraryResult<BookDto> {
        self.load(isbn).await.map(|b| BookDto::from(&b))
    }

    async fn list_books(&self, status: Option<BookStatus>, page: &PageRequest) -> LibraryResult<PaginatedResult<BookDto>> {
        let res = self.book_repository.list_paged(status, &self.limit(page)).await?;
        debug!(?status, page = res.page, total = res.total_records, "listed books");
        Ok(res.map(|b| BookDto::from(b)))
    }

    async fn search_books(&self, title: Option<&str>, author: Option<&str>, isbn: Option<&str>,
                          page: &PageRequest) -> LibraryResult<PaginatedResult<BookDto>> {
        let res = self.book_repository.search_paged(title, author, isbn, &self.limit(page)).await?;
        debug!(?title, ?author, ?isbn, total = res.total_records, "searched books");
        Ok(res.map(|b| BookDto::from(b)))
    }

    async fn search_books_by_status(&self, status: BookStatus, keyword: &str,
                                    page: &PageRequest) -> LibraryResult<PaginatedResult<BookDto>> {
        let res = self.book_repository.search_paged_with_status(status, keyword, &self.limit(page)).await?;
        debug!(%status, keyword, total = res.total_records, "searched books by status");
        Ok(res.map(|b| BookDto::from(b)))
    }

    // A lost compare-and-set re-reads the book so the action is judged against the status the
    // other caller left behind.
    async fn lend(&self, isbn: &str, action: LendingAction) -> LibraryResult<BookDto> {
        let mut attempt = 1;
        loop {
            let book = self.load(isbn).await?;
            let next = action.apply(book.book_status).map_err(|err| {
                warn!(isbn, %action, status = %book.book_status, "rejected lending action");
                err
            })?;
            match self.book_repository.update_status(isbn, book.book_status, next).await {
                Ok(updated) => {
                    info!(isbn, %action, from = %book.book_status, to = %updated.book_status, "changed book status");
                    return Ok(BookDto::from(&updated));
                }
                Err(err) if err.retryable() && attempt < MAX_LENDING_ATTEMPTS => {
                    debug!(isbn, %action, attempt, error = %err, "retrying lending action");
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use async_once::AsyncOnce;
    use async_trait::async_trait;
    use lazy_static::lazy_static;
    use crate::books::domain::model::BookEntity;
    use crate::books::dto::BookDto;
    use crate::books::filter::BookFilter;
    use crate::books::repository::BookRepository;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::catalog::domain::CatalogService;
    use crate::catalog::domain::service::CatalogServiceImpl;
    use crate::catalog::factory;
    use crate::core::domain::Configuration;
    use crate::core::library::{BookStatus, LibraryError, LibraryResult, PageRequest, PaginatedResult};
    use crate::core::repository::{Repository, RepositoryStore};

    lazy_static! {
        static ref SUT_SVC: AsyncOnce<Box<dyn CatalogService>> = AsyncOnce::new(async {
                factory::create_catalog_service(&Configuration::new(RepositoryStore::Memory)).await
            });
    }

    // Another caller changes the stored status right after each read, one queued status per read.
    struct InterleavedBookRepository {
        books: MemoryBookRepository,
        changes: Mutex<VecDeque<BookStatus>>,
    }

    impl InterleavedBookRepository {
        fn new(changes: &[BookStatus]) -> Self {
            Self {
                books: MemoryBookRepository::new(),
                changes: Mutex::new(changes.iter().copied().collect()),
            }
        }
    }

    #[async_trait]
    impl Repository<BookEntity> for InterleavedBookRepository {
        async fn upsert(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
            self.books.upsert(entity).await
        }

        async fn get(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
            let loaded = self.books.get(id).await?;
            let change = self.changes.lock().expect("should lock changes").pop_front();
            if let (Some(book), Some(status)) = (&loaded, change) {
                let mut changed = book.clone();
                changed.book_status = status;
                let _ = self.books.upsert(&changed).await?;
            }
            Ok(loaded)
        }

        async fn delete(&self, id: &str) -> LibraryResult<usize> {
            self.books.delete(id).await
        }
    }

    #[async_trait]
    impl BookRepository for InterleavedBookRepository {
        async fn query(&self, filter: &BookFilter, page: &PageRequest) -> LibraryResult<PaginatedResult<BookEntity>> {
            self.books.query(filter, page).await
        }

        async fn update_status(&self, isbn: &str, expected: BookStatus, status: BookStatus) -> LibraryResult<BookEntity> {
            self.books.update_status(isbn, expected, status).await
        }
    }

    async fn interleaved_catalog(status: BookStatus, changes: &[BookStatus]) -> CatalogServiceImpl {
        let repo = InterleavedBookRepository::new(changes);
        let _ = repo.books.upsert(&BookEntity::new("1", "Book 1", "Author 1", "Publisher 1", status))
            .await.expect("should add book");
        CatalogServiceImpl::new(&Configuration::new(RepositoryStore::Memory), Box::new(repo))
    }

    fn new_book(isbn: &str, status: BookStatus) -> BookDto {
        BookDto::new(isbn, format!("title {}", isbn).as_str(), "author", "publisher", status)
    }

    async fn with_status(catalog_svc: &dyn CatalogService, isbn: &str, status: BookStatus) {
        let _ = catalog_svc.update_book(&new_book(isbn, status)).await.expect("should update book");
    }

    fn transition_message(res: Result<BookDto, LibraryError>) -> String {
        match res {
            Err(LibraryError::InvalidTransition { message }) => message,
            other => panic!("expected invalid transition but got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_should_add_book_as_available() {
        let catalog_svc = SUT_SVC.get().await;

        let book = new_book("svc_add", BookStatus::Borrowed);
        let saved = catalog_svc.add_book(&book).await.expect("should add book");
        assert_eq!(BookStatus::Available, saved.status);

        let loaded = catalog_svc.find_book_by_isbn(book.isbn.as_str()).await.expect("should return book");
        assert_eq!(book.title, loaded.title);
        assert_eq!(BookStatus::Available, loaded.status);
    }

    #[tokio::test]
    async fn test_should_update_book_without_status_checks() {
        let catalog_svc = SUT_SVC.get().await;

        let mut book = new_book("svc_update", BookStatus::Available);
        let _ = catalog_svc.add_book(&book).await.expect("should add book");

        book.title = "new title".to_string();
        book.status = BookStatus::Reserved;
        let _ = catalog_svc.update_book(&book).await.expect("should update book");

        let loaded = catalog_svc.find_book_by_isbn(book.isbn.as_str()).await.expect("should return book");
        assert_eq!(book, loaded);
    }

    #[tokio::test]
    async fn test_should_remove_book() {
        let catalog_svc = SUT_SVC.get().await;

        let book = new_book("svc_remove", BookStatus::Available);
        let _ = catalog_svc.add_book(&book).await.expect("should add book");
        let _ = catalog_svc.remove_book(book.isbn.as_str()).await.expect("should remove book");

        let loaded = catalog_svc.find_book_by_isbn(book.isbn.as_str()).await;
        assert!(matches!(loaded, Err(LibraryError::NotFound { .. })));
        let _ = catalog_svc.remove_book(book.isbn.as_str()).await.expect("should ignore missing book");
    }

    #[tokio::test]
    async fn test_should_fail_lending_unknown_books() {
        let catalog_svc = SUT_SVC.get().await;

        for res in [
            catalog_svc.find_book_by_isbn("svc_missing").await,
            catalog_svc.borrow_book("svc_missing").await,
            catalog_svc.return_book("svc_missing").await,
            catalog_svc.reserve_book("svc_missing").await,
            catalog_svc.cancel_reservation("svc_missing").await,
        ] {
            match res {
                Err(LibraryError::NotFound { message }) => assert_eq!("Book not found with isbn : svc_missing", message),
                other => panic!("expected not found but got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_should_borrow_book() {
        let catalog_svc = SUT_SVC.get().await;

        let book = new_book("svc_borrow", BookStatus::Available);
        let _ = catalog_svc.add_book(&book).await.expect("should add book");
        let borrowed = catalog_svc.borrow_book(book.isbn.as_str()).await.expect("should borrow book");
        assert_eq!(BookStatus::Borrowed, borrowed.status);

        let res = catalog_svc.borrow_book(book.isbn.as_str()).await;
        assert_eq!("Book is already borrowed", transition_message(res));

        with_status(catalog_svc.as_ref(), "svc_borrow", BookStatus::Reserved).await;
        let borrowed = catalog_svc.borrow_book(book.isbn.as_str()).await.expect("should borrow reserved book");
        assert_eq!(BookStatus::Borrowed, borrowed.status);
    }

    #[tokio::test]
    async fn test_should_return_book() {
        let catalog_svc = SUT_SVC.get().await;

        let book = new_book("svc_return", BookStatus::Available);
        let _ = catalog_svc.add_book(&book).await.expect("should add book");
        let res = catalog_svc.return_book(book.isbn.as_str()).await;
        assert_eq!("Book is not borrowed", transition_message(res));

        for status in [BookStatus::Borrowed, BookStatus::Reserved] {
            with_status(catalog_svc.as_ref(), "svc_return", status).await;
            let returned = catalog_svc.return_book(book.isbn.as_str()).await.expect("should return book");
            assert_eq!(BookStatus::Available, returned.status);
        }
    }

    #[tokio::test]
    async fn test_should_reserve_and_cancel_book() {
        let catalog_svc = SUT_SVC.get().await;

        let book = new_book("svc_reserve", BookStatus::Available);
        let _ = catalog_svc.add_book(&book).await.expect("should add book");
        let res = catalog_svc.cancel_reservation(book.isbn.as_str()).await;
        assert_eq!("Book is not reserved", transition_message(res));

        let reserved = catalog_svc.reserve_book(book.isbn.as_str()).await.expect("should reserve book");
        assert_eq!(BookStatus::Reserved, reserved.status);
        let res = catalog_svc.reserve_book(book.isbn.as_str()).await;
        assert_eq!("Book is not available for reservation", transition_message(res));

        let canceled = catalog_svc.cancel_reservation(book.isbn.as_str()).await.expect("should cancel reservation");
        assert_eq!(BookStatus::Available, canceled.status);

        let _ = catalog_svc.borrow_book(book.isbn.as_str()).await.expect("should borrow book");
        let res = catalog_svc.reserve_book(book.isbn.as_str()).await;
        assert_eq!("Book is not available for reservation", transition_message(res));
        let res = catalog_svc.cancel_reservation(book.isbn.as_str()).await;
        assert_eq!("Book is not reserved", transition_message(res));
    }

    #[tokio::test]
    async fn test_should_list_and_search_books() {
        // separate catalog so that counts are not affected by other tests
        let catalog_svc = factory::create_catalog_service(&Configuration::new(RepositoryStore::Memory)).await;
        let _ = catalog_svc.add_book(&BookDto::new("123", "Book 1", "Author 1", "Publisher 1", BookStatus::Available))
            .await.expect("should add book");
        let _ = catalog_svc.add_book(&BookDto::new("456", "Book 2", "Author 2", "Publisher 2", BookStatus::Available))
            .await.expect("should add book");
        let _ = catalog_svc.borrow_book("456").await.expect("should borrow book");

        let res = catalog_svc.search_books(Some("Book 1"), None, None, &PageRequest::default())
            .await.expect("should search books");
        assert_eq!(1, res.records.len());
        assert_eq!("123", res.records[0].isbn.as_str());

        let res = catalog_svc.list_books(Some(BookStatus::Available), &PageRequest::default())
            .await.expect("should list books");
        assert_eq!(vec!["123"], res.records.iter().map(|b| b.isbn.as_str()).collect::<Vec<_>>());

        let res = catalog_svc.list_books(None, &PageRequest::new(0, 1)).await.expect("should list books");
        assert_eq!("123", res.records[0].isbn.as_str());
        assert_eq!(2, res.total_pages());
        let res = catalog_svc.list_books(None, &PageRequest::new(1, 1)).await.expect("should list books");
        assert_eq!("456", res.records[0].isbn.as_str());

        let res = catalog_svc.search_books_by_status(BookStatus::Borrowed, "Author", &PageRequest::default())
            .await.expect("should search books");
        assert_eq!(vec!["456"], res.records.iter().map(|b| b.isbn.as_str()).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_should_reject_borrow_lost_to_other_borrower() {
        let catalog_svc = interleaved_catalog(BookStatus::Available, &[BookStatus::Borrowed]).await;

        let res = catalog_svc.borrow_book("1").await;
        assert_eq!("Book is already borrowed", transition_message(res));
        let loaded = catalog_svc.find_book_by_isbn("1").await.expect("should return book");
        assert_eq!(BookStatus::Borrowed, loaded.status);
    }

    #[tokio::test]
    async fn test_should_apply_action_to_status_changed_by_other_caller() {
        let catalog_svc = interleaved_catalog(BookStatus::Available, &[BookStatus::Reserved]).await;

        let borrowed = catalog_svc.borrow_book("1").await.expect("should borrow reserved book");
        assert_eq!(BookStatus::Borrowed, borrowed.status);
    }

    #[tokio::test]
    async fn test_should_stop_retrying_lending_after_max_attempts() {
        let catalog_svc = interleaved_catalog(BookStatus::Borrowed,
                                              &[BookStatus::Reserved, BookStatus::Borrowed, BookStatus::Reserved]).await;

        let res = catalog_svc.return_book("1").await;
        assert!(matches!(res, Err(LibraryError::CurrentlyUnavailable { retryable: true, .. })));
    }
}

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use tracing::debug;

use crate::books::domain::model::BookEntity;
use crate::books::filter::BookFilter;
use crate::books::repository::BookRepository;
use crate::core::library::{BookStatus, LibraryError, LibraryResult, PageRequest, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::ddb::{from_item, parse_item};

#[derive(Debug)]
pub struct DDBBookRepository {
    client: Client,
    table_name: String,
}

impl DDBBookRepository {
    pub(crate) fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }

    // reads every book passing the status filter, following the scan pages
    async fn scan(&self, status: Option<BookStatus>) -> LibraryResult<Vec<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let mut books = vec![];
        let mut exclusive_start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let mut request = self.client
                .scan()
                .table_name(table_name)
                .consistent_read(true)
                .set_exclusive_start_key(exclusive_start_key.take());
            if let Some(status) = status {
                request = request
                    .filter_expression("book_status = :book_status")
                    .expression_attribute_values(":book_status", AttributeValue::S(status.to_string()));
            }
            let res = request.send().await.map_err(LibraryError::from)?;
            for item in res.items().unwrap_or_default() {
                books.push(from_item::<BookEntity>(item)?);
            }
            match res.last_evaluated_key() {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key.clone()),
                _ => break,
            }
        }
        Ok(books)
    }
}

#[async_trait]
impl Repository<BookEntity> for DDBBookRepository {
    async fn upsert(&self, entity: &BookEntity) -> LibraryResult<BookEntity> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| entity.clone()).map_err(LibraryError::from)
    }

    async fn get(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let res = self.client
            .get_item()
            .table_name(table_name)
            .key("isbn", AttributeValue::S(id.to_string()))
            .consistent_read(true)
            .send()
            .await.map_err(LibraryError::from)?;
        match res.item() {
            Some(item) => Ok(Some(from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let res = self.client.delete_item()
            .table_name(table_name)
            .key("isbn", AttributeValue::S(id.to_string()))
            .return_values(ReturnValue::AllOld)
            .send()
            .await.map_err(LibraryError::from)?;
        Ok(res.attributes().map(|_| 1).unwrap_or(0))
    }
}

#[async_trait]
impl BookRepository for DDBBookRepository {
    // DynamoDB `contains` is case-sensitive, so only the status is filtered on the server and the
    // text clauses are matched here before sorting by isbn and slicing the page.
    // Every call reads all books in the status, so cost grows with the table and not the page.
    async fn query(&self, filter: &BookFilter, page: &PageRequest) -> LibraryResult<PaginatedResult<BookEntity>> {
        let mut books: Vec<BookEntity> = self.scan(filter.status()).await?
            .into_iter()
            .filter(|b| filter.matches(b))
            .collect();
        books.sort_by(|a, b| a.isbn.cmp(&b.isbn));
        debug!(table = self.table_name.as_str(), matched = books.len(), "queried books");
        Ok(PaginatedResult::slice(books, page))
    }

    async fn update_status(&self, isbn: &str, expected: BookStatus, status: BookStatus) -> LibraryResult<BookEntity> {
        let table_name: &str = self.table_name.as_ref();
        let res = self.client
            .update_item()
            .table_name(table_name)
            .key("isbn", AttributeValue::S(isbn.to_string()))
            .update_expression("SET book_status = :book_status")
            .condition_expression("attribute_exists(isbn) AND book_status = :expected")
            .expression_attribute_values(":book_status", AttributeValue::S(status.to_string()))
            .expression_attribute_values(":expected", AttributeValue::S(expected.to_string()))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;
        match res {
            Ok(out) => {
                match out.attributes() {
                    Some(item) => from_item(item),
                    None => Err(LibraryError::database(
                        format!("no attributes returned for {}", isbn).as_str(), None, false)),
                }
            }
            Err(err) => {
                let conditional = matches!(&err,
                    SdkError::ServiceError(ctx) if ctx.err().is_conditional_check_failed_exception());
                if !conditional {
                    return Err(LibraryError::from(err));
                }
                match self.get(isbn).await? {
                    Some(book) => Err(LibraryError::unavailable(
                        format!("book {} status changed from {} to {}", isbn, expected, book.book_status).as_str(),
                        Some("ConditionalCheckFailed".to_string()), true)),
                    None => Err(LibraryError::not_found(format!("book not found for {}", isbn).as_str())),
                }
            }
        }
    }
}

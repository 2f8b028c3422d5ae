use tracing::warn;
use crate::books::repository::BookRepository;
use crate::books::repository::ddb_book_repository::DDBBookRepository;
use crate::books::repository::memory_book_repository::MemoryBookRepository;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) async fn create_book_repository(config: &Configuration) -> Box<dyn BookRepository> {
    match config.store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(config.store, config.dynamodb_endpoint.as_str()).await;
            Box::new(DDBBookRepository::new(client, config.table_name.as_str()))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(config.store, config.dynamodb_endpoint.as_str()).await;
            // an existing table fails creation too, so the repository is built either way
            if let Err(err) = create_table(&client, config.table_name.as_str(), "isbn").await {
                warn!(table = config.table_name.as_str(), error = %err, "could not create table");
            }
            Box::new(DDBBookRepository::new(client, config.table_name.as_str()))
        }
        RepositoryStore::Memory => {
            Box::new(MemoryBookRepository::new())
        }
    }
}

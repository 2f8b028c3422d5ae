use std::str::FromStr;
use async_trait::async_trait;
use serde::Deserialize;
use crate::core::library::{LibraryError, LibraryResult};

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // inserts or replaces an entity
    async fn upsert(&self, entity: &Entity) -> LibraryResult<Entity>;

    // get an entity
    async fn get(&self, id: &str) -> LibraryResult<Option<Entity>>;

    // delete an entity, returns number of removed records
    async fn delete(&self, id: &str) -> LibraryResult<usize>;
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Deserialize)]
#[serde(try_from = "String")]
pub enum RepositoryStore {
    DynamoDB,
    LocalDynamoDB,
    Memory,
}

impl FromStr for RepositoryStore {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dynamodb" => Ok(RepositoryStore::DynamoDB),
            "local-dynamodb" => Ok(RepositoryStore::LocalDynamoDB),
            "memory" => Ok(RepositoryStore::Memory),
            _ => Err(LibraryError::validation(
                format!("unsupported repository store {}", s).as_str(), None)),
        }
    }
}

impl TryFrom<String> for RepositoryStore {
    type Error = LibraryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::repository::RepositoryStore;

    #[tokio::test]
    async fn test_should_parse_store() {
        assert_eq!(RepositoryStore::DynamoDB, "dynamodb".parse().expect("should parse"));
        assert_eq!(RepositoryStore::LocalDynamoDB, "Local-DynamoDB".parse().expect("should parse"));
        assert_eq!(RepositoryStore::Memory, "memory".parse().expect("should parse"));
        assert!("sqlite".parse::<RepositoryStore>().is_err());
    }
}

use config::{Config, Environment, Map};
use serde::Deserialize;
use crate::core::library::{DEFAULT_PAGE_SIZE, LibraryError, LibraryResult, MAX_PAGE_SIZE};
use crate::core::repository::RepositoryStore;

// Configuration abstracts config options for the catalog service, read from `CATALOG_*` variables
// e.g. CATALOG_STORE=local-dynamodb CATALOG_TABLE=books CATALOG_PAGE_SIZE=20 CATALOG_LAMBDA=true
#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub store: RepositoryStore,
    #[serde(rename = "table")]
    pub table_name: String,
    pub dynamodb_endpoint: String,
    #[serde(rename = "page_size")]
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub bind_addr: String,
    pub lambda: bool,
}

impl Configuration {
    pub fn new(store: RepositoryStore) -> Self {
        Configuration {
            store,
            table_name: "books".to_string(),
            dynamodb_endpoint: "http://localhost:8000".to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            bind_addr: "0.0.0.0:8080".to_string(),
            lambda: false,
        }
    }

    pub fn from_env() -> LibraryResult<Self> {
        Self::load(None)
    }

    // `vars` replaces the process environment when given
    pub(crate) fn load(vars: Option<Map<String, String>>) -> LibraryResult<Self> {
        let config: Configuration = Config::builder()
            .add_source(Environment::with_prefix("CATALOG").try_parsing(true).source(vars))
            .build()?
            .try_deserialize()?;
        config.validate()
    }

    fn validate(self) -> LibraryResult<Self> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(LibraryError::validation(
                format!("page sizes must be positive but were {} and {}",
                        self.default_page_size, self.max_page_size).as_str(), None));
        }
        Ok(self)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new(RepositoryStore::Memory)
    }
}

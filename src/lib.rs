//! Toys Kingdom catalog server.
//!
//! A thin JSON HTTP API over a single MongoDB collection of toy listings:
//! search by name, browse listings, filter by seller, and create, edit or
//! delete individual toys. Every request maps onto one store call.
//!
//! # Quick start
//!
//! ```no_run
//! use toys_kingdom::ToyCatalog;
//!
//! # async fn example() -> toys_kingdom::Result<()> {
//! let catalog = ToyCatalog::builder()
//!     .mongo_uri("mongodb://localhost:27017")
//!     .build()
//!     .await?;
//!
//! let robots = catalog.toys().search("robot").await?;
//! let mine = catalog.toys().for_seller(Some("kid@example.com")).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod queries;
pub mod query_builder;
pub mod server;
pub mod store;
pub mod telemetry;

pub use config::Config;
pub use error::{CatalogError, Result};
pub use query_builder::QueryBuilder;
pub use store::{InMemoryToyStore, MongoToyStore, ToyStore};

use std::fmt;
use std::sync::Arc;

use config::{StorageBackend, DEFAULT_MAX_POOL_SIZE};

// ---------------------------------------------------------------------------
// ToyCatalogBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`ToyCatalog`].
///
/// Use [`ToyCatalog::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](ToyCatalogBuilder::build).
pub struct ToyCatalogBuilder {
    storage: StorageBackend,
    mongo_uri: Option<String>,
    max_pool_size: u32,
}

impl Default for ToyCatalogBuilder {
    fn default() -> Self {
        Self {
            storage: StorageBackend::Mongo,
            mongo_uri: None,
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
        }
    }
}

impl ToyCatalogBuilder {
    /// Start from a loaded [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self {
            storage: config.storage.clone(),
            mongo_uri: config.mongo_uri.clone(),
            max_pool_size: config.max_pool_size,
        }
    }

    /// Use MongoDB at the given connection string.
    pub fn mongo_uri(mut self, uri: impl Into<String>) -> Self {
        self.storage = StorageBackend::Mongo;
        self.mongo_uri = Some(uri.into());
        self
    }

    /// Keep toys in process memory instead of MongoDB.
    pub fn in_memory(mut self) -> Self {
        self.storage = StorageBackend::Memory;
        self
    }

    /// Upper bound on pooled MongoDB connections. Defaults to 10.
    pub fn max_pool_size(mut self, size: u32) -> Self {
        self.max_pool_size = size;
        self
    }

    /// Build the catalog and its store.
    ///
    /// The MongoDB driver connects lazily; call [`ToyCatalog::prepare`] to
    /// create the search index and verify connectivity.
    pub async fn build(self) -> Result<ToyCatalog> {
        let store: Arc<dyn ToyStore> = match self.storage {
            StorageBackend::Memory => Arc::new(InMemoryToyStore::new()),
            StorageBackend::Mongo => {
                let uri = self.mongo_uri.ok_or_else(|| {
                    CatalogError::Config("MongoDB storage requires a connection string".into())
                })?;
                Arc::new(MongoToyStore::connect(&uri, self.max_pool_size).await?)
            }
        };
        Ok(ToyCatalog::new(store))
    }
}

// ---------------------------------------------------------------------------
// ToyCatalog
// ---------------------------------------------------------------------------

/// The main entry point for catalog operations.
///
/// Cheap to clone; clones share one store handle.
#[derive(Clone)]
pub struct ToyCatalog {
    store: Arc<dyn ToyStore>,
}

impl ToyCatalog {
    pub fn builder() -> ToyCatalogBuilder {
        ToyCatalogBuilder::default()
    }

    /// Wrap an existing store.
    pub fn new(store: Arc<dyn ToyStore>) -> Self {
        Self { store }
    }

    /// Access the toy query interface.
    pub fn toys(&self) -> queries::toys::ToyQuery<'_> {
        queries::toys::ToyQuery::new(self.store.as_ref())
    }

    /// Startup tasks: ensure the name search index, then ping the store.
    ///
    /// Failures are logged and swallowed so the server still comes up when
    /// the database is temporarily unreachable.
    pub async fn prepare(&self) {
        match self.store.ensure_search_index().await {
            Ok(name) => tracing::info!(index = %name, "search index ready"),
            Err(err) => tracing::warn!(error = %err, "failed to create search index"),
        }
        match self.store.ping().await {
            Ok(()) => tracing::info!(
                backend = self.store.backend_name(),
                "pinged deployment; store connection is healthy"
            ),
            Err(err) => tracing::error!(error = %err, "store ping failed"),
        }
    }

    /// Release the store's connections.
    pub async fn shutdown(&self) {
        self.store.shutdown().await;
        tracing::info!(backend = self.store.backend_name(), "store connection closed");
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Return the underlying store for advanced usage.
    pub fn store(&self) -> &Arc<dyn ToyStore> {
        &self.store
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for ToyCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ToyCatalog(backend={}, database={}, collection={})",
            self.store.backend_name(),
            config::DATABASE_NAME,
            config::COLLECTION_NAME
        )
    }
}

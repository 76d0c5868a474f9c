//! Fixed catalog constants and environment-driven process configuration.

use std::net::{Ipv4Addr, SocketAddr};

use url::Url;

use crate::error::{CatalogError, Result};

pub const DATABASE_NAME: &str = "toysDB";
pub const COLLECTION_NAME: &str = "toys";

/// Name of the ascending index over [`SEARCH_FIELD`].
pub const SEARCH_INDEX_NAME: &str = "titleSearch";
pub const SEARCH_FIELD: &str = "toy_name";

/// Row cap for the search and all-toys listings.
pub const LISTING_LIMIT: usize = 20;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CLUSTER_HOST: &str = "cluster0.jfgylgi.mongodb.net";
pub const DEFAULT_MAX_POOL_SIZE: u32 = 10;

pub const LIVENESS_MESSAGE: &str = "Toys kingdom server is running";

/// Fields returned by the all-toys listing.
pub const ALL_TOYS_PROJECTION: &[&str] = &[
    "toy_name",
    "seller_name",
    "sub_category",
    "price",
    "quantity",
];

/// Fields returned by the shop-by-category listing.
pub const CATEGORY_PROJECTION: &[&str] = &[
    "toy_name",
    "toy_img",
    "sub_category",
    "price",
    "rating",
];

/// Fields written by an update. Anything else in the request body is ignored.
pub const UPDATABLE_FIELDS: &[&str] = &[
    "toy_name",
    "toy_img",
    "price",
    "sub_category",
    "quantity",
    "rating",
    "review",
    "description",
];

/// Which [`ToyStore`](crate::store::ToyStore) backend the server runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl StorageBackend {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(Self::Mongo),
            "memory" => Ok(Self::Memory),
            other => Err(CatalogError::Config(format!(
                "unknown TOYS_STORAGE backend '{other}' (expected 'mongodb' or 'memory')"
            ))),
        }
    }
}

/// Server configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub storage: StorageBackend,
    /// Connection string; `None` only for the in-memory backend.
    pub mongo_uri: Option<String>,
    pub max_pool_size: u32,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// `MONGODB_URI` wins over `DB_USER`/`DB_PASS`/`DB_CLUSTER`. The credential
    /// form targets an Atlas SRV cluster with retryable writes and majority
    /// write concern.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| CatalogError::Config(format!("parse PORT '{raw}': {e}")))?,
            None => DEFAULT_PORT,
        };

        let storage = match lookup("TOYS_STORAGE") {
            Some(raw) => StorageBackend::parse(&raw)?,
            None => StorageBackend::Mongo,
        };

        let max_pool_size = match lookup("MONGODB_MAX_POOL_SIZE") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|e| {
                CatalogError::Config(format!("parse MONGODB_MAX_POOL_SIZE '{raw}': {e}"))
            })?,
            None => DEFAULT_MAX_POOL_SIZE,
        };

        let mongo_uri = match storage {
            StorageBackend::Memory => None,
            StorageBackend::Mongo => Some(mongo_uri(&lookup)?),
        };

        Ok(Self {
            port,
            storage,
            mongo_uri,
            max_pool_size,
        })
    }

    /// Address the HTTP listener binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

fn mongo_uri<F>(lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(uri) = lookup("MONGODB_URI").filter(|u| !u.trim().is_empty()) {
        return Ok(uri);
    }
    let user = lookup("DB_USER")
        .ok_or_else(|| CatalogError::Config("DB_USER is not set".into()))?;
    let pass = lookup("DB_PASS")
        .ok_or_else(|| CatalogError::Config("DB_PASS is not set".into()))?;
    let host = lookup("DB_CLUSTER").unwrap_or_else(|| DEFAULT_CLUSTER_HOST.to_string());

    // Credentials are percent-encoded as userinfo.
    let mut uri = Url::parse(&format!(
        "mongodb+srv://{host}/?retryWrites=true&w=majority"
    ))
    .map_err(|e| CatalogError::Config(format!("parse DB_CLUSTER '{host}': {e}")))?;
    let no_credentials =
        |()| CatalogError::Config(format!("DB_CLUSTER '{host}' cannot carry credentials"));
    uri.set_username(&user).map_err(no_credentials)?;
    uri.set_password(Some(&pass)).map_err(no_credentials)?;
    Ok(uri.into())
}

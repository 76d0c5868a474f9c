#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("MongoDB error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("BSON serialization error: {0}")]
    BsonSerialize(#[from] bson::ser::Error),

    #[error("BSON deserialization error: {0}")]
    BsonDeserialize(#[from] bson::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

//! Storage backends for the toy collection.
//!
//! Every catalog operation maps onto exactly one [`ToyStore`] call. The
//! MongoDB backend is the production store; the in-memory backend serves
//! local development and tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{DeleteAck, InsertAck, ToyDocument, ToyId, UpdateAck};
use crate::query_builder::FindQuery;

pub mod memory;
pub mod mongo;

pub use memory::InMemoryToyStore;
pub use mongo::MongoToyStore;

#[async_trait]
pub trait ToyStore: Send + Sync {
    /// Run a find in the store's natural order.
    async fn find(&self, query: &FindQuery) -> Result<Vec<ToyDocument>>;

    async fn find_one(&self, id: ToyId) -> Result<Option<ToyDocument>>;

    /// Insert a document as submitted. The store assigns `_id` when absent.
    async fn insert_one(&self, doc: ToyDocument) -> Result<InsertAck>;

    /// `$set` the given fields on the document with this id, creating it
    /// when no such document exists.
    async fn upsert_fields(&self, id: ToyId, fields: ToyDocument) -> Result<UpdateAck>;

    async fn delete_one(&self, id: ToyId) -> Result<DeleteAck>;

    /// Create the name search index if missing. Returns the index name.
    async fn ensure_search_index(&self) -> Result<String>;

    async fn ping(&self) -> Result<()>;

    /// Release pooled connections. The store must not be used afterwards.
    async fn shutdown(&self);

    fn backend_name(&self) -> &'static str;
}

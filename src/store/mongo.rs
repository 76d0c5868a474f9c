//! MongoDB implementation of [`ToyStore`].
//!
//! Holds one pooled [`mongodb::Client`] for the life of the process. Queries
//! run against `toysDB.toys` as raw BSON documents and are converted to JSON
//! on the way out, with ObjectIds rendered as hex strings.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection, IndexModel};
use serde_json::Value;

use super::ToyStore;
use crate::config::{COLLECTION_NAME, DATABASE_NAME, SEARCH_FIELD, SEARCH_INDEX_NAME};
use crate::error::{CatalogError, Result};
use crate::models::{DeleteAck, InsertAck, ToyDocument, ToyId, UpdateAck};
use crate::query_builder::{Filter, FindQuery};

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

pub struct MongoToyStore {
    client: Client,
    toys: Collection<Document>,
}

impl MongoToyStore {
    /// Build a client for `uri` using Stable API v1 (strict, with
    /// deprecation errors) and a bounded connection pool.
    ///
    /// The driver connects lazily, so this succeeds without a reachable
    /// server; use [`ToyStore::ping`] to verify connectivity.
    pub async fn connect(uri: &str, max_pool_size: u32) -> Result<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        let server_api = ServerApi::builder()
            .version(ServerApiVersion::V1)
            .strict(true)
            .deprecation_errors(true)
            .build();
        options.server_api = Some(server_api);
        options.max_pool_size = Some(max_pool_size);
        options.app_name = Some("toys-kingdom".to_string());
        let client = Client::with_options(options)?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: Client) -> Self {
        let toys = client.database(DATABASE_NAME).collection(COLLECTION_NAME);
        Self { client, toys }
    }
}

#[async_trait]
impl ToyStore for MongoToyStore {
    async fn find(&self, query: &FindQuery) -> Result<Vec<ToyDocument>> {
        let filter = match &query.filter {
            Some(f) => filter_to_bson(f)?,
            None => Document::new(),
        };
        let mut find = self.toys.find(filter);
        if let Some(fields) = &query.projection {
            find = find.projection(projection_to_bson(fields));
        }
        if let Some(n) = query.limit {
            find = find.limit(i64::try_from(n).unwrap_or(i64::MAX));
        }
        let docs: Vec<Document> = find.await?.try_collect().await?;
        Ok(docs.into_iter().map(document_to_json).collect())
    }

    async fn find_one(&self, id: ToyId) -> Result<Option<ToyDocument>> {
        let found = self.toys.find_one(doc! { "_id": id.object_id() }).await?;
        Ok(found.map(document_to_json))
    }

    async fn insert_one(&self, doc: ToyDocument) -> Result<InsertAck> {
        let doc = hex_id_to_object_id(bson::to_document(&doc)?);
        let result = self
            .toys
            .insert_one(doc)
            .await
            .map_err(duplicate_key_to_conflict)?;
        Ok(InsertAck {
            acknowledged: true,
            inserted_id: bson_to_json(result.inserted_id),
        })
    }

    async fn upsert_fields(&self, id: ToyId, fields: ToyDocument) -> Result<UpdateAck> {
        let set = bson::to_document(&fields)?;
        let result = self
            .toys
            .update_one(doc! { "_id": id.object_id() }, doc! { "$set": set })
            .upsert(true)
            .await?;
        Ok(UpdateAck {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(result.upserted_id.is_some()),
            upserted_id: result.upserted_id.map(bson_to_json),
        })
    }

    async fn delete_one(&self, id: ToyId) -> Result<DeleteAck> {
        let result = self.toys.delete_one(doc! { "_id": id.object_id() }).await?;
        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: result.deleted_count,
        })
    }

    async fn ensure_search_index(&self) -> Result<String> {
        let mut keys = Document::new();
        keys.insert(SEARCH_FIELD, 1);
        let index = IndexModel::builder()
            .keys(keys)
            .options(
                IndexOptions::builder()
                    .name(SEARCH_INDEX_NAME.to_string())
                    .build(),
            )
            .build();
        let created = self.toys.create_index(index).await?;
        Ok(created.index_name)
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    async fn shutdown(&self) {
        self.client.clone().shutdown().await;
    }

    fn backend_name(&self) -> &'static str {
        "mongodb"
    }
}

// ---------------------------------------------------------------------------
// BSON translation
// ---------------------------------------------------------------------------

/// Translate a [`Filter`] into a MongoDB query document.
pub(crate) fn filter_to_bson(filter: &Filter) -> Result<Document> {
    let mut out = Document::new();
    match filter {
        Filter::Eq { field, value } => {
            out.insert(field.as_str(), bson::to_bson(value)?);
        }
        Filter::Contains { field, text } => {
            out.insert(
                field.as_str(),
                doc! { "$regex": regex::escape(text), "$options": "i" },
            );
        }
        Filter::Or(filters) => {
            out.insert("$or", filters_to_bson(filters)?);
        }
        Filter::And(filters) => {
            out.insert("$and", filters_to_bson(filters)?);
        }
    }
    Ok(out)
}

fn filters_to_bson(filters: &[Filter]) -> Result<Vec<Document>> {
    filters.iter().map(filter_to_bson).collect()
}

/// Store a 24-hex string `_id` as an ObjectId so it is addressable by
/// [`ToyId`] like any store-assigned id.
pub(crate) fn hex_id_to_object_id(mut doc: Document) -> Document {
    let oid = match doc.get("_id") {
        Some(Bson::String(s)) => ObjectId::parse_str(s).ok(),
        _ => None,
    };
    if let Some(oid) = oid {
        doc.insert("_id", oid);
    }
    doc
}

fn duplicate_key_to_conflict(err: mongodb::error::Error) -> CatalogError {
    let duplicate = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY_CODE => {
            Some(write.message.clone())
        }
        _ => None,
    };
    match duplicate {
        Some(message) => CatalogError::DuplicateKey(message),
        None => CatalogError::Database(err),
    }
}

fn projection_to_bson(fields: &[String]) -> Document {
    fields
        .iter()
        .map(|f| (f.clone(), Bson::Int32(1)))
        .collect()
}

fn document_to_json(doc: Document) -> ToyDocument {
    doc.into_iter().map(|(k, v)| (k, bson_to_json(v))).collect()
}

/// Convert a BSON value to plain JSON.
///
/// ObjectIds become hex strings and datetimes RFC 3339 strings; everything
/// else uses relaxed extended JSON.
pub(crate) fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Document(doc) => Value::Object(document_to_json(doc)),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Bson::DateTime(dt).into_relaxed_extjson(),
        },
        other => other.into_relaxed_extjson(),
    }
}

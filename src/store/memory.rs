//! In-memory implementation of [`ToyStore`].
//!
//! Documents live in insertion order behind a `tokio::sync::RwLock`, which
//! stands in for MongoDB's natural order. Nothing is durable; state is lost
//! when the process exits.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::ToyStore;
use crate::config::SEARCH_INDEX_NAME;
use crate::error::{CatalogError, Result};
use crate::models::{DeleteAck, InsertAck, ToyDocument, ToyId, UpdateAck};
use crate::query_builder::FindQuery;

#[derive(Debug, Default)]
pub struct InMemoryToyStore {
    docs: RwLock<Vec<ToyDocument>>,
}

impl InMemoryToyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

fn id_matches(doc: &ToyDocument, id: &ToyId) -> bool {
    doc.get("_id").and_then(|v| v.as_str()) == Some(id.to_hex().as_str())
}

#[async_trait]
impl ToyStore for InMemoryToyStore {
    async fn find(&self, query: &FindQuery) -> Result<Vec<ToyDocument>> {
        let docs = self.docs.read().await;
        let matched = docs
            .iter()
            .filter(|doc| query.matches(doc))
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|doc| query.project(doc))
            .collect();
        Ok(matched)
    }

    async fn find_one(&self, id: ToyId) -> Result<Option<ToyDocument>> {
        let docs = self.docs.read().await;
        Ok(docs.iter().find(|doc| id_matches(doc, &id)).cloned())
    }

    async fn insert_one(&self, mut doc: ToyDocument) -> Result<InsertAck> {
        // Hex ids are stored in canonical lowercase so lookups by ToyId find them.
        let inserted_id = match doc.get("_id") {
            None => Value::String(ToyId::new().to_hex()),
            Some(Value::String(s)) => match s.parse::<ToyId>() {
                Ok(id) => Value::String(id.to_hex()),
                Err(_) => Value::String(s.clone()),
            },
            Some(other) => other.clone(),
        };
        doc.insert("_id".to_string(), inserted_id.clone());

        let mut docs = self.docs.write().await;
        if docs.iter().any(|existing| existing.get("_id") == Some(&inserted_id)) {
            return Err(CatalogError::DuplicateKey(format!(
                "a toy with _id {inserted_id} already exists"
            )));
        }
        docs.push(doc);
        Ok(InsertAck {
            acknowledged: true,
            inserted_id,
        })
    }

    async fn upsert_fields(&self, id: ToyId, fields: ToyDocument) -> Result<UpdateAck> {
        let mut docs = self.docs.write().await;
        if let Some(doc) = docs.iter_mut().find(|doc| id_matches(doc, &id)) {
            let mut modified = false;
            for (key, value) in fields {
                if doc.get(&key) != Some(&value) {
                    doc.insert(key, value);
                    modified = true;
                }
            }
            return Ok(UpdateAck {
                acknowledged: true,
                matched_count: 1,
                modified_count: u64::from(modified),
                upserted_count: 0,
                upserted_id: None,
            });
        }

        let mut doc = ToyDocument::new();
        doc.insert("_id".to_string(), Value::String(id.to_hex()));
        doc.extend(fields);
        docs.push(doc);
        Ok(UpdateAck {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 1,
            upserted_id: Some(Value::String(id.to_hex())),
        })
    }

    async fn delete_one(&self, id: ToyId) -> Result<DeleteAck> {
        let mut docs = self.docs.write().await;
        let deleted_count = match docs.iter().position(|doc| id_matches(doc, &id)) {
            Some(idx) => {
                docs.remove(idx);
                1
            }
            None => 0,
        };
        Ok(DeleteAck {
            acknowledged: true,
            deleted_count,
        })
    }

    async fn ensure_search_index(&self) -> Result<String> {
        Ok(SEARCH_INDEX_NAME.to_string())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn shutdown(&self) {}

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

//! Toy catalog queries.
//!
//! Each method issues exactly one [`ToyStore`] call. The only
//! post-processing is the price ordering applied by [`ToyQuery::for_seller`].

use std::cmp::Ordering;

use serde_json::Value;

use crate::config::{
    ALL_TOYS_PROJECTION, CATEGORY_PROJECTION, LISTING_LIMIT, SEARCH_FIELD,
};
use crate::error::Result;
use crate::models::{DeleteAck, InsertAck, ToyDocument, ToyId, ToyUpdate, UpdateAck};
use crate::query_builder::{Filter, FindQuery, QueryBuilder};
use crate::store::ToyStore;

// ---------------------------------------------------------------------------
// ToyQuery
// ---------------------------------------------------------------------------

/// Query interface for the toy collection.
pub struct ToyQuery<'a> {
    store: &'a dyn ToyStore,
}

impl<'a> ToyQuery<'a> {
    /// Create a new `ToyQuery` bound to the given store.
    pub fn new(store: &'a dyn ToyStore) -> Self {
        Self { store }
    }

    /// Search toys whose name contains `text`, ignoring case.
    ///
    /// Returns full documents, at most [`LISTING_LIMIT`] of them.
    pub async fn search(&self, text: &str) -> Result<Vec<ToyDocument>> {
        tracing::debug!(text, "searching toys by name");
        self.store.find(&search_query(text)).await
    }

    /// List the first [`LISTING_LIMIT`] toys with the summary projection.
    pub async fn list(&self) -> Result<Vec<ToyDocument>> {
        let query = QueryBuilder::new()
            .select(ALL_TOYS_PROJECTION)
            .limit(LISTING_LIMIT)
            .build();
        self.store.find(&query).await
    }

    /// List every toy with the shop-by-category projection.
    pub async fn by_category(&self) -> Result<Vec<ToyDocument>> {
        let query = QueryBuilder::new().select(CATEGORY_PROJECTION).build();
        self.store.find(&query).await
    }

    /// Get one toy by id, or `None` if it does not exist.
    pub async fn get(&self, id: ToyId) -> Result<Option<ToyDocument>> {
        self.store.find_one(id).await
    }

    /// List toys for a seller, cheapest first.
    ///
    /// With no email (or an empty one) every toy is returned. See
    /// [`compare_prices`] for how prices are ordered.
    pub async fn for_seller(&self, email: Option<&str>) -> Result<Vec<ToyDocument>> {
        let mut builder = QueryBuilder::new();
        if let Some(email) = email.filter(|e| !e.is_empty()) {
            builder.where_eq("seller_email", email);
        }
        let mut toys = self.store.find(&builder.build()).await?;
        toys.sort_by(|a, b| compare_prices(price_key(a), price_key(b)));
        Ok(toys)
    }

    /// Insert a toy exactly as submitted.
    pub async fn add(&self, toy: ToyDocument) -> Result<InsertAck> {
        let ack = self.store.insert_one(toy).await?;
        tracing::info!(inserted_id = %ack.inserted_id, "toy added");
        Ok(ack)
    }

    /// Overwrite the editable fields of a toy, creating it if absent.
    pub async fn update(&self, id: ToyId, update: ToyUpdate) -> Result<UpdateAck> {
        let ack = self
            .store
            .upsert_fields(id, update.into_set_document())
            .await?;
        tracing::info!(
            %id,
            matched = ack.matched_count,
            modified = ack.modified_count,
            upserted = ack.upserted_count,
            "toy updated"
        );
        Ok(ack)
    }

    pub async fn delete(&self, id: ToyId) -> Result<DeleteAck> {
        let ack = self.store.delete_one(id).await?;
        tracing::info!(%id, deleted = ack.deleted_count, "toy deleted");
        Ok(ack)
    }
}

/// Name search as a one-branch `$or`, so more searchable fields can be added
/// as further branches.
fn search_query(text: &str) -> FindQuery {
    QueryBuilder::new()
        .where_or(vec![Filter::Contains {
            field: SEARCH_FIELD.to_string(),
            text: text.to_string(),
        }])
        .limit(LISTING_LIMIT)
        .build()
}

// ---------------------------------------------------------------------------
// Price ordering
// ---------------------------------------------------------------------------

/// Numeric interpretation of a toy's `price`.
///
/// JSON numbers are used as-is; strings are trimmed and parsed as decimals.
/// Anything else, including non-finite values, has no numeric price.
pub fn price_key(toy: &ToyDocument) -> Option<f64> {
    let key = match toy.get("price")? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    key.filter(|p| p.is_finite())
}

/// Total order over price keys: ascending, with unpriced toys last.
pub fn compare_prices(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::UPDATABLE_FIELDS;
use crate::error::CatalogError;

/// A toy record as stored and returned by the catalog.
///
/// Toy fields are opaque passthrough values, so documents travel as plain
/// JSON objects. `_id` is rendered as a hex string.
pub type ToyDocument = Map<String, Value>;

// ---------------------------------------------------------------------------
// ToyId — Store-assigned document identifier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToyId(ObjectId);

impl ToyId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for ToyId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for ToyId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for ToyId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(Self).map_err(|_| {
            CatalogError::InvalidIdentifier(format!(
                "'{s}' is not a 24-character hex object id"
            ))
        })
    }
}

impl fmt::Display for ToyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Toy — Typed view of a well-formed toy document
// ---------------------------------------------------------------------------

/// Typed view of a toy listing.
///
/// The server never requires this shape; it is a convenience for clients that
/// submit or read well-formed listings. `price`, `quantity` and `rating` keep
/// whatever JSON type the seller submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Toy {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toy_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toy_img: Option<String>,
}

impl Toy {
    /// Convert into an insertable document, dropping unset fields.
    pub fn into_document(self) -> ToyDocument {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// ToyUpdate — Body of an edit request
// ---------------------------------------------------------------------------

/// The editable subset of a toy.
///
/// Every field is written on update; fields missing from the request are
/// stored as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToyUpdate {
    #[serde(default)]
    pub toy_name: Option<Value>,
    #[serde(default)]
    pub toy_img: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub sub_category: Option<Value>,
    #[serde(default)]
    pub quantity: Option<Value>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub review: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
}

impl ToyUpdate {
    /// Build the `$set` payload: exactly the updatable fields, in order.
    pub fn into_set_document(self) -> ToyDocument {
        let values = [
            self.toy_name,
            self.toy_img,
            self.price,
            self.sub_category,
            self.quantity,
            self.rating,
            self.review,
            self.description,
        ];
        UPDATABLE_FIELDS
            .iter()
            .zip(values)
            .map(|(field, value)| (field.to_string(), value.unwrap_or(Value::Null)))
            .collect()
    }
}

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;

use crate::models::{DeleteAck, InsertAck, ToyDocument, ToyId, ToyUpdate, UpdateAck};
use crate::server::error::AppError;
use crate::server::state::AppState;

#[derive(Deserialize)]
pub struct MyToysParams {
    pub email: Option<String>,
}

/// GET /toySearch/{text}
///
/// Case-insensitive name search, at most 20 results.
pub async fn search_toys(
    State(state): State<Arc<AppState>>,
    Path(text): Path<String>,
) -> Result<Json<Vec<ToyDocument>>, AppError> {
    let toys = state.catalog.toys().search(&text).await?;
    Ok(Json(toys))
}

/// GET /alltoys
pub async fn all_toys(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ToyDocument>>, AppError> {
    let toys = state.catalog.toys().list().await?;
    Ok(Json(toys))
}

/// GET /category-toys
pub async fn category_toys(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ToyDocument>>, AppError> {
    let toys = state.catalog.toys().by_category().await?;
    Ok(Json(toys))
}

/// GET /toy/{id}
///
/// Responds with `null` when no toy has this id.
pub async fn get_toy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Option<ToyDocument>>, AppError> {
    let id: ToyId = id.parse()?;
    let toy = state.catalog.toys().get(id).await?;
    Ok(Json(toy))
}

/// GET /my-toys?email=seller@example.com
///
/// A seller's toys sorted by price ascending; every toy without `email`.
pub async fn my_toys(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MyToysParams>,
) -> Result<Json<Vec<ToyDocument>>, AppError> {
    let toys = state
        .catalog
        .toys()
        .for_seller(params.email.as_deref())
        .await?;
    Ok(Json(toys))
}

/// POST /add-toy
pub async fn add_toy(
    State(state): State<Arc<AppState>>,
    Json(toy): Json<ToyDocument>,
) -> Result<Json<InsertAck>, AppError> {
    let ack = state.catalog.toys().add(toy).await?;
    Ok(Json(ack))
}

/// PUT /my-toys/{id}
///
/// Replaces the editable fields; creates the toy at this id if missing.
pub async fn update_toy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<ToyUpdate>,
) -> Result<Json<UpdateAck>, AppError> {
    let id: ToyId = id.parse()?;
    let ack = state.catalog.toys().update(id, update).await?;
    Ok(Json(ack))
}

/// DELETE /my-toys/{id}
pub async fn delete_toy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, AppError> {
    let id: ToyId = id.parse()?;
    let ack = state.catalog.toys().delete(id).await?;
    Ok(Json(ack))
}

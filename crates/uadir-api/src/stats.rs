//! Handler for `GET /statistics`.

use std::sync::Arc;

use axum::{Json, extract::State};
use uadir_core::{stats::Statistics, store::DirectoryStore};

use crate::error::ApiError;

pub async fn handler<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Statistics>, ApiError>
where
  S: DirectoryStore,
{
  let stats = store.statistics().await.map_err(ApiError::store)?;
  Ok(Json(stats))
}

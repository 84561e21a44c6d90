//! Handler for `GET /search`.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
};
use serde::Deserialize;
use uadir_core::{expert::ExpertSummary, store::DirectoryStore};

use crate::{error::ApiError, extract::QueryParams};

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Matched case-insensitively against names, descriptions, titles,
  /// affiliations and tags.
  #[serde(default)]
  pub q: String,
}

/// `GET /search?q=<term>`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<Vec<ExpertSummary>>, ApiError>
where
  S: DirectoryStore,
{
  let term = params.q.trim();
  if term.is_empty() {
    return Err(ApiError::BadRequest("query parameter `q` is required".into()));
  }
  let experts = store.search(term).await.map_err(ApiError::store)?;
  Ok(Json(experts))
}

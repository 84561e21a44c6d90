//! Handlers for organization listings.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/organizations` | Optional `?city_id=`; each carries its key figures |
//! | `GET`  | `/diaspora/organizations` | Ordered by city, then name |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
};
use serde::Deserialize;
use uadir_core::{
  expert::{ExpertSummary, OrganizationSummary},
  store::DirectoryStore,
};

use crate::{error::ApiError, extract::QueryParams};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub city_id: Option<i64>,
}

/// `GET /organizations[?city_id=<id>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<OrganizationSummary>>, ApiError>
where
  S: DirectoryStore,
{
  let orgs = store
    .organizations_with_key_figures(params.city_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(orgs))
}

/// `GET /diaspora/organizations`
pub async fn diaspora<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<ExpertSummary>>, ApiError>
where
  S: DirectoryStore,
{
  let orgs = store
    .diaspora_organizations()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(orgs))
}

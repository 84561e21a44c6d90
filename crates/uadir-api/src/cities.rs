//! Handlers for `/cities`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/cities` | Ordered by name |
//! | `POST` | `/cities` | Body: [`NewCity`]; 201 + stored city |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use uadir_core::{
  city::{City, NewCity},
  store::DirectoryStore,
};

use crate::{error::ApiError, extract::JsonBody};

/// `GET /cities`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<City>>, ApiError>
where
  S: DirectoryStore,
{
  let cities = store.list_cities().await.map_err(ApiError::store)?;
  Ok(Json(cities))
}

/// `POST /cities`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<NewCity>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
{
  let city = store.add_city(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(city)))
}

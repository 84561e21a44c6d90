//! Handlers for `/experts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/experts` | Optional `?type=individual\|organization` |
//! | `POST`   | `/experts` | Body: [`NewExpertBody`]; 201 + `{"id": ...}` |
//! | `GET`    | `/experts/{id}` | Full details; 404 if not found |
//! | `PUT`    | `/experts/{id}` | Body: [`ExpertPatch`]; returns updated details |
//! | `DELETE` | `/experts/{id}` | 204, or 404 if nothing was deleted |
//! | `PUT`    | `/experts/{id}/image` | Raw image body; stored as a data URL |
//! | `POST`   | `/experts/{id}/activities` | Body: [`NewActivity`] |
//! | `POST`   | `/experts/{id}/publications` | Body: [`NewPublication`]; individuals only |
//! | `GET`    | `/experts/city/{city_id}` | |
//! | `GET`    | `/experts/focus/{focus_area}` | 400 on an unknown area |

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
  response::IntoResponse,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use uadir_core::{
  expert::{ExpertDetails, ExpertSummary, ExpertType, FocusArea},
  input::{
    ExpertPatch, NewActivity, NewContact, NewExpert, NewExpertKind, NewKeyFigure,
    NewLink, NewPublication,
  },
  store::DirectoryStore,
};
use uuid::Uuid;

use crate::{
  error::ApiError,
  extract::{JsonBody, PathParam, QueryParams},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(rename = "type")]
  pub kind: Option<ExpertType>,
}

/// `GET /experts[?type=<type>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<ExpertSummary>>, ApiError>
where
  S: DirectoryStore,
{
  let experts = store
    .list_experts(params.kind)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(experts))
}

/// `GET /experts/city/{city_id}`
pub async fn by_city<S>(
  State(store): State<Arc<S>>,
  PathParam(city_id): PathParam<i64>,
) -> Result<Json<Vec<ExpertSummary>>, ApiError>
where
  S: DirectoryStore,
{
  let experts = store
    .experts_by_city(city_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(experts))
}

/// `GET /experts/focus/{focus_area}`
pub async fn by_focus_area<S>(
  State(store): State<Arc<S>>,
  PathParam(area): PathParam<String>,
) -> Result<Json<Vec<ExpertSummary>>, ApiError>
where
  S: DirectoryStore,
{
  let area =
    FocusArea::parse(&area).map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let experts = store
    .experts_by_focus_area(area)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(experts))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// Flat create payload. `key_figures` is only accepted for organizations.
#[derive(Debug, Deserialize)]
pub struct NewExpertBody {
  pub name:          String,
  #[serde(rename = "type")]
  pub kind:          ExpertType,
  pub city_id:       i64,
  #[serde(default)]
  pub title:         Option<String>,
  #[serde(default)]
  pub affiliation:   Option<String>,
  #[serde(default)]
  pub description:   Option<String>,
  #[serde(default)]
  pub founding_year: Option<i32>,
  #[serde(default)]
  pub is_diaspora:   bool,
  #[serde(default)]
  pub image:         Option<String>,
  #[serde(default)]
  pub focus_areas:   Option<Vec<FocusArea>>,
  #[serde(default)]
  pub contacts:      Option<Vec<NewContact>>,
  #[serde(default)]
  pub key_figures:   Option<Vec<NewKeyFigure>>,
  #[serde(default)]
  pub tags:          Option<Vec<String>>,
  #[serde(default)]
  pub links:         Option<Vec<NewLink>>,
}

impl TryFrom<NewExpertBody> for NewExpert {
  type Error = uadir_core::Error;

  fn try_from(body: NewExpertBody) -> Result<Self, Self::Error> {
    let kind =
      NewExpertKind::new(body.kind, body.key_figures.unwrap_or_default())?;
    Ok(NewExpert {
      name: body.name,
      kind,
      title: body.title,
      affiliation: body.affiliation,
      city_id: body.city_id,
      description: body.description,
      founding_year: body.founding_year,
      is_diaspora: body.is_diaspora,
      image: body.image,
      focus_areas: body.focus_areas.unwrap_or_default(),
      contacts: body.contacts.unwrap_or_default(),
      tags: body.tags.unwrap_or_default(),
      links: body.links.unwrap_or_default(),
    })
  }
}

/// `POST /experts`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  JsonBody(body): JsonBody<NewExpertBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
{
  let input = NewExpert::try_from(body).map_err(ApiError::store)?;
  let id = store.create_expert(input).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

// ─── Get / update / delete ────────────────────────────────────────────────────

async fn details<S: DirectoryStore>(
  store: &S,
  id: Uuid,
) -> Result<ExpertDetails, ApiError> {
  store
    .expert_details(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("expert {id} not found")))
}

/// `GET /experts/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  PathParam(id): PathParam<Uuid>,
) -> Result<Json<ExpertDetails>, ApiError>
where
  S: DirectoryStore,
{
  Ok(Json(details(store.as_ref(), id).await?))
}

/// `PUT /experts/{id}`: apply the patch, then answer with the re-read record.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  PathParam(id): PathParam<Uuid>,
  JsonBody(patch): JsonBody<ExpertPatch>,
) -> Result<Json<ExpertDetails>, ApiError>
where
  S: DirectoryStore,
{
  store
    .update_expert(id, patch)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(details(store.as_ref(), id).await?))
}

/// `DELETE /experts/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: DirectoryStore,
{
  if store.delete_expert(id).await.map_err(ApiError::store)? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("expert {id} not found")))
  }
}

// ─── Image ────────────────────────────────────────────────────────────────────

/// `PUT /experts/{id}/image`: the body is the raw image; its `Content-Type`
/// must be an `image/*` type.
pub async fn set_image<S>(
  State(store): State<Arc<S>>,
  PathParam(id): PathParam<Uuid>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<StatusCode, ApiError>
where
  S: DirectoryStore,
{
  let content_type = headers
    .get(CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .filter(|ct| ct.starts_with("image/"))
    .ok_or_else(|| {
      ApiError::BadRequest("Content-Type must be an image/* type".into())
    })?;
  if body.is_empty() {
    return Err(ApiError::BadRequest("image body is empty".into()));
  }

  let patch = ExpertPatch {
    image: Some(data_url(content_type, &body)),
    ..Default::default()
  };
  store
    .update_expert(id, patch)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

fn data_url(content_type: &str, bytes: &[u8]) -> String {
  format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}

// ─── Child records ────────────────────────────────────────────────────────────

/// `POST /experts/{id}/activities`
pub async fn add_activity<S>(
  State(store): State<Arc<S>>,
  PathParam(id): PathParam<Uuid>,
  JsonBody(body): JsonBody<NewActivity>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
{
  let activity = store
    .add_activity(id, body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(activity)))
}

/// `POST /experts/{id}/publications`
pub async fn add_publication<S>(
  State(store): State<Arc<S>>,
  PathParam(id): PathParam<Uuid>,
  JsonBody(body): JsonBody<NewPublication>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DirectoryStore,
{
  let publication = store
    .add_publication(id, body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(publication)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn data_url_embeds_type_and_payload() {
    assert_eq!(data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
  }
}

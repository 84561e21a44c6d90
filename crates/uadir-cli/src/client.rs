//! Async HTTP client wrapping the uadir JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use uadir_core::{
  city::City,
  expert::{ExpertDetails, ExpertSummary, ExpertType, FocusArea, OrganizationSummary},
  stats::Statistics,
};
use uuid::Uuid;

/// Connection settings for the uadir API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the uadir JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Turn a non-2xx response into an error carrying the server's message.
  async fn check(what: &str, resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<Value>()
      .await
      .ok()
      .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
      .unwrap_or_default();
    Err(anyhow!("{what} → {status} {message}"))
  }

  pub async fn get<T: DeserializeOwned>(
    &self,
    path: &str,
    query: &[(&str, String)],
  ) -> Result<T> {
    let what = format!("GET {path}");
    let resp = self
      .auth(self.client.get(self.url(path)))
      .query(query)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    Self::check(&what, resp)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising {path}"))
  }

  pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
    &self,
    path: &str,
    body: &B,
  ) -> Result<T> {
    let what = format!("POST {path}");
    let resp = self
      .auth(self.client.post(self.url(path)))
      .json(body)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    Self::check(&what, resp)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising {path}"))
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub async fn cities(&self) -> Result<Vec<City>> { self.get("/cities", &[]).await }

  pub async fn experts(&self, kind: Option<ExpertType>) -> Result<Vec<ExpertSummary>> {
    let query: Vec<_> = kind
      .map(|k| ("type", k.as_str().to_owned()))
      .into_iter()
      .collect();
    self.get("/experts", &query).await
  }

  pub async fn experts_by_city(&self, city_id: i64) -> Result<Vec<ExpertSummary>> {
    self.get(&format!("/experts/city/{city_id}"), &[]).await
  }

  pub async fn experts_by_focus(&self, area: FocusArea) -> Result<Vec<ExpertSummary>> {
    self.get(&format!("/experts/focus/{}", area.as_str()), &[]).await
  }

  pub async fn diaspora_organizations(&self) -> Result<Vec<ExpertSummary>> {
    self.get("/diaspora/organizations", &[]).await
  }

  pub async fn organizations(&self) -> Result<Vec<OrganizationSummary>> {
    self.get("/organizations", &[]).await
  }

  pub async fn expert(&self, id: Uuid) -> Result<ExpertDetails> {
    self.get(&format!("/experts/{id}"), &[]).await
  }

  pub async fn search(&self, term: &str) -> Result<Vec<ExpertSummary>> {
    self.get("/search", &[("q", term.to_owned())]).await
  }

  pub async fn statistics(&self) -> Result<Statistics> {
    self.get("/statistics", &[]).await
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// `POST /api/experts` with an untyped create payload; returns the new id.
  pub async fn create_expert(&self, body: &Value) -> Result<Uuid> {
    let created: Value = self.post("/experts", body).await?;
    created
      .get("id")
      .and_then(Value::as_str)
      .ok_or_else(|| anyhow!("create response has no id"))?
      .parse()
      .context("parsing created id")
  }
}

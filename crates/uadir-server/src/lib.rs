//! HTTP server for the uadir expert directory.
//!
//! Mounts [`uadir_api`] under `/api`, adds a `/health` probe, optional Basic
//! auth for writes, optional permissive CORS, and request tracing.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{Json, Router, middleware, routing::get};
use rand_core::OsRng;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uadir_core::store::DirectoryStore;

use auth::{AuthConfig, require_auth_for_writes};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration: defaults, then `config.toml`, then `UADIR_*`
/// environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  #[serde(default)]
  pub auth_username:      Option<String>,
  #[serde(default)]
  pub auth_password_hash: Option<String>,
  #[serde(default)]
  pub cors_allow_any:     bool,
}

impl ServerConfig {
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 8000)?
      .set_default("store_path", "uadir.db")?
      .set_default("cors_allow_any", false)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("UADIR"))
      .build()?
      .try_deserialize()
  }

  /// Write protection is enabled only when both credentials are configured.
  pub fn auth(&self) -> Option<AuthConfig> {
    match (&self.auth_username, &self.auth_password_hash) {
      (Some(username), Some(password_hash)) => Some(AuthConfig {
        username:      username.clone(),
        password_hash: password_hash.clone(),
      }),
      _ => None,
    }
  }
}

/// Hash `password` into the argon2 PHC string expected in
/// `auth_password_hash`.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)?
      .to_string(),
  )
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `store`.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: DirectoryStore + 'static,
{
  let mut app = Router::new()
    .route("/health", get(health))
    .nest("/api", uadir_api::api_router(store));

  if let Some(auth) = config.auth() {
    app = app.layer(middleware::from_fn_with_state(
      Arc::new(auth),
      require_auth_for_writes,
    ));
  } else {
    tracing::warn!("no credentials configured; writes are unauthenticated");
  }
  if config.cors_allow_any {
    app = app.layer(CorsLayer::permissive());
  }
  app.layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
  Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests;

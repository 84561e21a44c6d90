//! Full-router tests: auth guard, health probe, CORS, config defaults.

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  body::Body,
  http::{Method, Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use tower::ServiceExt as _;
use uadir_store_sqlite::SqliteStore;

use crate::{ServerConfig, hash_password, router};

fn config() -> ServerConfig {
  ServerConfig {
    host:               "127.0.0.1".to_string(),
    port:               8000,
    store_path:         PathBuf::from(":memory:"),
    auth_username:      None,
    auth_password_hash: None,
    cors_allow_any:     false,
  }
}

async fn app(config: &ServerConfig) -> Router {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  router(Arc::new(store), config)
}

fn new_city(auth: Option<(&str, &str)>) -> Request<Body> {
  let mut builder = Request::builder()
    .method(Method::POST)
    .uri("/api/cities")
    .header(header::CONTENT_TYPE, "application/json");
  if let Some((user, pass)) = auth {
    let encoded = B64.encode(format!("{user}:{pass}"));
    builder = builder.header(header::AUTHORIZATION, format!("Basic {encoded}"));
  }
  builder
    .body(Body::from(r#"{"name":"Kyiv","country":"Ukraine"}"#))
    .unwrap()
}

fn get(uri: &str) -> Request<Body> {
  Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_is_public() {
  let app = app(&config()).await;
  let res = app.oneshot(get("/health")).await.unwrap();
  assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn writes_open_without_configured_credentials() {
  let app = app(&config()).await;
  let res = app.oneshot(new_city(None)).await.unwrap();
  assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn writes_require_credentials_when_configured() {
  let mut cfg = config();
  cfg.auth_username = Some("editor".into());
  cfg.auth_password_hash = Some(hash_password("secret").unwrap());
  let app = app(&cfg).await;

  let res = app.clone().oneshot(new_city(None)).await.unwrap();
  assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
  assert!(res.headers().contains_key(header::WWW_AUTHENTICATE));

  let res = app
    .clone()
    .oneshot(new_city(Some(("editor", "wrong"))))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

  let res = app
    .clone()
    .oneshot(new_city(Some(("editor", "secret"))))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::CREATED);

  let res = app.oneshot(get("/api/cities")).await.unwrap();
  assert_eq!(res.status(), StatusCode::OK);
}

#[test]
fn half_configured_auth_is_disabled() {
  let mut cfg = config();
  cfg.auth_username = Some("editor".into());
  assert!(cfg.auth().is_none());
}

#[tokio::test]
async fn permissive_cors_when_enabled() {
  let mut cfg = config();
  cfg.cors_allow_any = true;
  let app = app(&cfg).await;

  let req = Request::builder()
    .uri("/api/cities")
    .header(header::ORIGIN, "https://example.org")
    .body(Body::empty())
    .unwrap();
  let res = app.oneshot(req).await.unwrap();
  assert_eq!(res.status(), StatusCode::OK);
  assert!(res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[test]
fn config_defaults_apply_without_a_file() {
  let cfg = ServerConfig::load(&PathBuf::from("does-not-exist.toml")).unwrap();
  assert_eq!(cfg.port, 8000);
  assert_eq!(cfg.host, "0.0.0.0");
  assert_eq!(cfg.store_path, PathBuf::from("uadir.db"));
  assert!(cfg.auth().is_none());
}

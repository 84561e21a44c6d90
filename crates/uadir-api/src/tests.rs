//! Router tests against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::{Body, to_bytes},
  http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uadir_store_sqlite::SqliteStore;

use crate::api_router;

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  api_router(Arc::new(store))
}

async fn send(
  app: &Router,
  method: Method,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let req = match body {
    Some(v) => builder
      .header(CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string())),
    None => builder.body(Body::empty()),
  }
  .unwrap();

  let res = app.clone().oneshot(req).await.unwrap();
  let status = res.status();
  let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
  send(app, Method::GET, uri, None).await
}

async fn add_city(app: &Router, name: &str, country: &str) -> i64 {
  let (status, city) = send(
    app,
    Method::POST,
    "/cities",
    Some(json!({ "name": name, "country": country })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  city["id"].as_i64().unwrap()
}

async fn create(app: &Router, body: Value) -> String {
  let (status, res) = send(app, Method::POST, "/experts", Some(body)).await;
  assert_eq!(status, StatusCode::CREATED, "{res}");
  res["id"].as_str().unwrap().to_owned()
}

// ─── Experts ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_individual_then_fetch() {
  let app = app().await;
  add_city(&app, "Kyiv", "Ukraine").await;
  let berlin = add_city(&app, "Berlin", "Germany").await;

  let id = create(
    &app,
    json!({
      "name": "Jane Doe",
      "type": "individual",
      "city_id": berlin,
      "focus_areas": ["research"],
      "contacts": [{ "type": "email", "value": "jane@example.org", "is_primary": true }],
    }),
  )
  .await;

  let (status, d) = get(&app, &format!("/experts/{id}")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(d["name"], "Jane Doe");
  assert_eq!(d["type"], "individual");
  assert_eq!(d["city_name"], "Berlin");
  assert_eq!(d["focus_areas"], json!(["research"]));
  assert_eq!(d["contacts"].as_array().unwrap().len(), 1);
  assert_eq!(d["contacts"][0]["type"], "email");
  assert_eq!(d["publications"], json!([]));
  assert!(d.get("key_figures").is_none());
}

#[tokio::test]
async fn invalid_creates_are_bad_requests() {
  let app = app().await;
  let kyiv = add_city(&app, "Kyiv", "Ukraine").await;

  let figures_on_person = json!({
    "name": "Solo", "type": "individual", "city_id": kyiv,
    "key_figures": [{ "name": "Someone" }],
  });
  let (status, body) =
    send(&app, Method::POST, "/experts", Some(figures_on_person)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let unknown_city = json!({ "name": "Nowhere", "type": "organization", "city_id": 999 });
  let (status, _) = send(&app, Method::POST, "/experts", Some(unknown_city)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_requests_get_json_400s() {
  let app = app().await;
  let kyiv = add_city(&app, "Kyiv", "Ukraine").await;

  let no_name = json!({ "type": "individual", "city_id": kyiv });
  let (status, body) = send(&app, Method::POST, "/experts", Some(no_name)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("name"), "{body}");

  let bad_area = json!({
    "name": "Razom", "type": "organization", "city_id": kyiv,
    "focus_areas": ["astrology"],
  });
  let (status, body) = send(&app, Method::POST, "/experts", Some(bad_area)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let (status, body) = send(&app, Method::DELETE, "/experts/not-a-uuid", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let (status, body) = get(&app, "/experts?type=robot").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let (status, body) =
    send(&app, Method::POST, "/cities", Some(json!({ "name": "Lviv" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_expert_is_404() {
  let app = app().await;
  let id = "00000000-0000-4000-8000-000000000000";
  assert_eq!(get(&app, &format!("/experts/{id}")).await.0, StatusCode::NOT_FOUND);

  let (status, _) = send(
    &app,
    Method::PUT,
    &format!("/experts/{id}"),
    Some(json!({ "name": "Ghost" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_replaces_present_collections_only() {
  let app = app().await;
  let kyiv = add_city(&app, "Kyiv", "Ukraine").await;
  let id = create(
    &app,
    json!({
      "name": "Razom", "type": "organization", "city_id": kyiv,
      "focus_areas": ["humanitarian", "advocacy"],
      "tags": ["aid"],
      "key_figures": [{ "name": "Dora", "role": "Chair" }],
    }),
  )
  .await;

  let (status, d) = send(
    &app,
    Method::PUT,
    &format!("/experts/{id}"),
    Some(json!({
      "description": "Updated",
      "tags": ["aid", "relief"],
      "key_figures": [],
      "focus_areas": null,
    })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(d["description"], "Updated");
  assert_eq!(d["tags"], json!(["aid", "relief"]));
  assert_eq!(d["key_figures"], json!([]));
  assert_eq!(d["focus_areas"].as_array().unwrap().len(), 2);
  assert_eq!(d["type"], "organization");
}

#[tokio::test]
async fn delete_then_404() {
  let app = app().await;
  let kyiv = add_city(&app, "Kyiv", "Ukraine").await;
  let id = create(&app, json!({ "name": "X", "type": "individual", "city_id": kyiv })).await;

  let uri = format!("/experts/{id}");
  assert_eq!(send(&app, Method::DELETE, &uri, None).await.0, StatusCode::NO_CONTENT);
  assert_eq!(send(&app, Method::DELETE, &uri, None).await.0, StatusCode::NOT_FOUND);
  assert_eq!(get(&app, &uri).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn image_upload_stored_as_data_url() {
  let app = app().await;
  let kyiv = add_city(&app, "Kyiv", "Ukraine").await;
  let id = create(&app, json!({ "name": "P", "type": "individual", "city_id": kyiv })).await;
  let uri = format!("/experts/{id}/image");

  let req = Request::builder()
    .method(Method::PUT)
    .uri(&uri)
    .header(CONTENT_TYPE, "image/png")
    .body(Body::from(&b"\x89PNG"[..]))
    .unwrap();
  let res = app.clone().oneshot(req).await.unwrap();
  assert_eq!(res.status(), StatusCode::NO_CONTENT);

  let (_, d) = get(&app, &format!("/experts/{id}")).await;
  assert_eq!(d["image"], "data:image/png;base64,iVBORw==");

  let req = Request::builder()
    .method(Method::PUT)
    .uri(&uri)
    .header(CONTENT_TYPE, "text/plain")
    .body(Body::from("nope"))
    .unwrap();
  let res = app.clone().oneshot(req).await.unwrap();
  assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn activities_and_publications() {
  let app = app().await;
  let kyiv = add_city(&app, "Kyiv", "Ukraine").await;
  let person = create(&app, json!({ "name": "P", "type": "individual", "city_id": kyiv })).await;
  let org = create(&app, json!({ "name": "O", "type": "organization", "city_id": kyiv })).await;

  let (status, activity) = send(
    &app,
    Method::POST,
    &format!("/experts/{org}/activities"),
    Some(json!({ "title": "Conference", "date_start": "2023-05-01" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(activity["date_start"], "2023-05-01");

  let publication = json!({ "title": "Essay", "publication_date": "2021-02-03" });
  let (status, _) = send(
    &app,
    Method::POST,
    &format!("/experts/{person}/publications"),
    Some(publication.clone()),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, _) = send(
    &app,
    Method::POST,
    &format!("/experts/{org}/publications"),
    Some(publication),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, d) = get(&app, &format!("/experts/{person}")).await;
  assert_eq!(d["publications"][0]["title"], "Essay");
}

// ─── Listings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn listings_by_type_city_focus_and_organization() {
  let app = app().await;
  let kyiv = add_city(&app, "Kyiv", "Ukraine").await;
  let paris = add_city(&app, "Paris", "France").await;
  create(
    &app,
    json!({ "name": "Alpha", "type": "organization", "city_id": paris,
            "is_diaspora": true, "focus_areas": ["integration"] }),
  )
  .await;
  create(
    &app,
    json!({ "name": "Beta", "type": "individual", "city_id": kyiv,
            "focus_areas": ["media"] }),
  )
  .await;

  let (_, all) = get(&app, "/experts").await;
  assert_eq!(all.as_array().unwrap().len(), 2);
  let (_, people) = get(&app, "/experts?type=individual").await;
  assert_eq!(people.as_array().unwrap().len(), 1);
  assert_eq!(people[0]["name"], "Beta");

  let (_, in_paris) = get(&app, &format!("/experts/city/{paris}")).await;
  assert_eq!(in_paris[0]["name"], "Alpha");

  let (status, media) = get(&app, "/experts/focus/media").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(media[0]["name"], "Beta");
  assert_eq!(get(&app, "/experts/focus/astrology").await.0, StatusCode::BAD_REQUEST);

  let (_, orgs) = get(&app, "/organizations").await;
  assert_eq!(orgs.as_array().unwrap().len(), 1);
  assert_eq!(orgs[0]["key_figures"], json!([]));
  let (_, none) = get(&app, &format!("/organizations?city_id={kyiv}")).await;
  assert_eq!(none, json!([]));

  let (_, diaspora) = get(&app, "/diaspora/organizations").await;
  assert_eq!(diaspora[0]["name"], "Alpha");
}

#[tokio::test]
async fn search_requires_a_term() {
  let app = app().await;
  let kyiv = add_city(&app, "Kyiv", "Ukraine").await;
  create(
    &app,
    json!({ "name": "Aid Org", "type": "organization", "city_id": kyiv,
            "description": "Delivers humanitarian aid" }),
  )
  .await;
  create(&app, json!({ "name": "Other", "type": "individual", "city_id": kyiv })).await;

  let (status, hits) = get(&app, "/search?q=Humanitarian").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(hits.as_array().unwrap().len(), 1);
  assert_eq!(hits[0]["name"], "Aid Org");

  assert_eq!(get(&app, "/search?q=%20").await.0, StatusCode::BAD_REQUEST);
  assert_eq!(get(&app, "/search").await.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn statistics_by_type() {
  let app = app().await;
  let kyiv = add_city(&app, "Kyiv", "Ukraine").await;
  for (name, kind) in [
    ("I1", "individual"),
    ("I2", "individual"),
    ("I3", "individual"),
    ("O1", "organization"),
    ("O2", "organization"),
  ] {
    create(&app, json!({ "name": name, "type": kind, "city_id": kyiv })).await;
  }

  let (status, stats) = get(&app, "/statistics").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(stats["by_type"], json!({ "individual": 3, "organization": 2 }));
  assert_eq!(stats["total"], 5);
}

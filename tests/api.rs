//! HTTP-level tests for the demon routes, driven through the full router.

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use axum::Router;
use demon_catalog::{app_router, load_dir, AppState, RecordStore, ServerConfig};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower::ServiceExt;

async fn app_for(config: &ServerConfig) -> Router {
    let store = RecordStore::in_memory().await.unwrap();
    store.ensure_schema().await.unwrap();
    app_router(AppState::new(store, 100), config)
}

async fn app_with(names: &[(&str, &str)]) -> Router {
    let app = app_for(&ServerConfig::default()).await;
    for (name, race) in names {
        let (status, _) = post(&app, json!({"name": name, "race": race, "alignment": "Neutral"})).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    app
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post(app: &Router, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Request::post("/demons")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

fn ids(body: &Value) -> Vec<i64> {
    body.as_array().unwrap().iter().map(|r| r["id"].as_i64().unwrap()).collect()
}

#[tokio::test]
async fn banner_lists_endpoints() {
    let app = app_with(&[]).await;
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["endpoints"]["GET /demons"].is_string());
    assert!(body["endpoints"]["POST /demons"].is_string());
}

#[tokio::test]
async fn create_returns_record_with_increasing_id() {
    let app = app_with(&[]).await;
    let (status, first) = post(
        &app,
        json!({
            "name": "Pixie",
            "race": "Fairy",
            "alignment": "Light-Law",
            "imageUrl": "https://img.example/pixie.png"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["name"], "Pixie");
    assert_eq!(first["description"], "");
    assert_eq!(first["imageUrl"], "https://img.example/pixie.png");

    let (_, second) = post(&app, json!({"name": "Jack Frost", "race": "Fairy", "alignment": "Neutral"})).await;
    assert!(first["id"].as_i64().unwrap() > 0);
    assert!(second["id"].as_i64().unwrap() > first["id"].as_i64().unwrap());

    let uri = format!("/demons/{}", second["id"]);
    let (status, fetched) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, second);
}

#[tokio::test]
async fn duplicate_name_conflicts_and_keeps_one_row() {
    let app = app_with(&[("Pixie", "Fairy")]).await;
    let (status, body) = post(&app, json!({"name": "Pixie", "race": "Fata", "alignment": "Chaos"})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");

    // Case-sensitive: a different spelling is a different name.
    let (status, _) = post(&app, json!({"name": "pixie", "race": "Fata", "alignment": "Chaos"})).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = get(&app, "/demons?filter=name:Pixie").await;
    assert_eq!(names(&body), vec!["Pixie"]);
    assert_eq!(body[0]["race"], "Fairy");
}

#[tokio::test]
async fn invalid_bodies_are_rejected_before_the_store() {
    let app = app_with(&[]).await;
    let (status, body) = post(&app, json!({"name": "Pixie", "race": "Fairy"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");

    let (status, _) = post(&app, json!({"name": "Pixie", "race": "Fairy", "alignment": "Good"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Request::post("/demons")
            .header("content-type", "application/json")
            .body(Body::from("{ nope"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let (_, body) = get(&app, "/demons").await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn filter_matches_exactly_and_ignores_unknown_fields() {
    let app = app_with(&[("Cait Sith", "Fata"), ("Angel", "Divine"), ("Titania", "Fata"), ("Kelpie", "fata")]).await;

    let (status, body) = get(&app, "/demons?filter=race:Fata").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Cait Sith", "Titania"]);

    let (_, unfiltered) = get(&app, "/demons").await;
    let (_, bogus) = get(&app, "/demons?filter=bogus:x").await;
    let (_, no_colon) = get(&app, "/demons?filter=race").await;
    assert_eq!(bogus, unfiltered);
    assert_eq!(no_colon, unfiltered);
    assert_eq!(unfiltered.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn sort_orders_and_falls_back_to_id() {
    let app = app_with(&[("Titania", "Fata"), ("Angel", "Divine"), ("Oberon", "Fata")]).await;

    let (_, body) = get(&app, "/demons?sort=name_asc").await;
    assert_eq!(names(&body), vec!["Angel", "Oberon", "Titania"]);

    let (_, body) = get(&app, "/demons?sort=id_desc").await;
    let got = ids(&body);
    assert!(got.windows(2).all(|w| w[0] >= w[1]), "{:?}", got);

    let (_, body) = get(&app, "/demons?sort=name_sideways").await;
    let got = ids(&body);
    assert!(got.windows(2).all(|w| w[0] <= w[1]), "{:?}", got);
    assert_eq!(names(&body), vec!["Titania", "Angel", "Oberon"]);
}

#[tokio::test]
async fn pagination_slices_and_coerces_bad_values() {
    let seed: Vec<(String, &str)> = (1..=12).map(|i| (format!("Demon {:02}", i), "Fiend")).collect();
    let refs: Vec<(&str, &str)> = seed.iter().map(|(n, r)| (n.as_str(), *r)).collect();
    let app = app_with(&refs).await;

    let (_, all) = get(&app, "/demons?pageSize=50").await;
    let all_ids = ids(&all);
    assert_eq!(all_ids.len(), 12);

    let (_, body) = get(&app, "/demons?page=2&pageSize=5").await;
    assert_eq!(ids(&body), all_ids[5..10].to_vec());

    let (_, first) = get(&app, "/demons").await;
    assert_eq!(ids(&first), all_ids[..10].to_vec());
    let (_, zero) = get(&app, "/demons?page=0").await;
    let (_, word) = get(&app, "/demons?page=two&pageSize=lots").await;
    assert_eq!(zero, first);
    assert_eq!(word, first);

    let (_, last) = get(&app, "/demons?page=3&pageSize=5").await;
    assert_eq!(ids(&last), all_ids[10..].to_vec());
}

#[tokio::test]
async fn read_unknown_or_malformed_id() {
    let app = app_with(&[]).await;
    let (status, _) = get(&app, "/demons/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(&app, "/demons/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn seeded_rows_are_listed_and_hardening_headers_are_set() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("demons.json"),
        r#"[{"name": "Mothman", "race": "Wilder", "alignment": "Dark-Chaos", "img": "mothman.png"}]"#,
    )
    .unwrap();
    let store = RecordStore::in_memory().await.unwrap();
    store.ensure_schema().await.unwrap();
    load_dir(&store, dir.path()).await;
    load_dir(&store, dir.path()).await;
    let app = app_router(AppState::new(store, 100), &ServerConfig::default());

    let resp = app
        .clone()
        .oneshot(Request::get("/demons").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
    assert_eq!(resp.headers()["x-frame-options"], "DENY");

    let (_, body) = get(&app, "/demons").await;
    assert_eq!(names(&body), vec!["Mothman"]);
    assert_eq!(body[0]["imageUrl"], "mothman.png");

    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn body_rejections_keep_their_own_status() {
    let app = app_for(&ServerConfig {
        body_limit_bytes: 64,
        ..ServerConfig::default()
    })
    .await;

    let (status, body) = send(
        &app,
        Request::post("/demons")
            .body(Body::from(r#"{"name": "Pixie", "race": "Fairy", "alignment": "Law"}"#))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"]["code"], "unsupported_media_type");

    let long = "x".repeat(200);
    let (status, body) = post(&app, json!({"name": "Pixie", "alignment": "Law", "description": long})).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], "payload_too_large");

    let (_, body) = get(&app, "/demons").await;
    assert!(body.as_array().unwrap().is_empty());
}

fn from_client(uri: &str, ip: [u8; 4]) -> Request<Body> {
    let mut req = Request::get(uri).body(Body::empty()).unwrap();
    req.extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((ip, 40000))));
    req
}

#[tokio::test]
async fn each_client_gets_its_own_request_ceiling() {
    let app = app_for(&ServerConfig {
        rate_limit_per_minute: 2,
        ..ServerConfig::default()
    })
    .await;

    for _ in 0..2 {
        let (status, _) = send(&app, from_client("/demons", [10, 0, 0, 1])).await;
        assert_eq!(status, StatusCode::OK);
    }
    let resp = app.clone().oneshot(from_client("/demons", [10, 0, 0, 1])).await.unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key("retry-after"));

    let (status, _) = send(&app, from_client("/demons", [10, 0, 0, 2])).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn zero_rate_disables_the_ceiling() {
    let app = app_for(&ServerConfig {
        rate_limit_per_minute: 0,
        ..ServerConfig::default()
    })
    .await;
    for _ in 0..5 {
        let (status, _) = send(&app, from_client("/health", [10, 0, 0, 1])).await;
        assert_eq!(status, StatusCode::OK);
    }
}

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

use karatbook::db::{self, LedgerStorage};
use karatbook::router::{LedgerState, ledger_router};

const KEY: &str = "pwd";

async fn test_app(tag: &str) -> (Router, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "karatbook-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", temp_path.display());
    let pool = db::connect(&database_url).await.expect("connect failed");
    let storage = LedgerStorage::new(pool);
    storage.init_schema().await.expect("schema init failed");

    let state = LedgerState::new(storage, Arc::from(KEY));
    (ledger_router(state), temp_path)
}

fn put_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-api-key", KEY)
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("x-api-key", KEY)
        .body(Body::empty())
        .expect("failed to build request")
}

async fn json_body(resp: axum::response::Response) -> Value {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&body).expect("response body was not json")
}

#[tokio::test]
async fn rate_board_upsert_then_fetch_round_trips() {
    let (app, temp_path) = test_app("rates-roundtrip").await;

    let payload = json!({
        "asof_date": "2026-08-05",
        "inserted_by": "asha",
        "rates": [
            { "material": "gold", "karat": "24k", "n_price": 7600.0, "o_price": 7100.0 },
            { "material": "gold", "karat": "22k", "n_price": 7000.0, "o_price": 6500.0 },
            { "material": "silver", "karat": "24k", "n_price": 95.0, "o_price": 88.0 }
        ]
    });
    let resp = app
        .clone()
        .oneshot(put_json("/rates", &payload))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["saved"], 3);
    assert_eq!(body["asof_date"], "2026-08-05");

    let resp = app
        .clone()
        .oneshot(get("/rates?date=2026-08-05"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let board = json_body(resp).await;
    let board = board.as_array().expect("board is an array");
    assert_eq!(board.len(), 3);
    let gold22 = board
        .iter()
        .find(|r| r["material"] == "gold" && r["karat"] == "22k")
        .expect("gold 22k row present");
    assert_eq!(gold22["n_price"], 7000.0);
    assert_eq!(gold22["o_price"], 6500.0);
    assert_eq!(gold22["inserted_by"], "asha");

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn rate_board_upsert_overwrites_same_day_prices() {
    let (app, temp_path) = test_app("rates-overwrite").await;

    let first = json!({
        "asof_date": "2026-08-05",
        "inserted_by": "asha",
        "rates": [{ "material": "gold", "karat": "22k", "n_price": 7000.0, "o_price": 6500.0 }]
    });
    let resp = app
        .clone()
        .oneshot(put_json("/rates", &first))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let second = json!({
        "asof_date": "2026-08-05",
        "inserted_by": "ravi",
        "rates": [{ "material": "gold", "karat": "22k", "n_price": 7050.0, "o_price": 6550.0 }]
    });
    let resp = app
        .clone()
        .oneshot(put_json("/rates", &second))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(get("/rates?date=2026-08-05"))
        .await
        .expect("request failed");
    let board = json_body(resp).await;
    let board = board.as_array().expect("board is an array");
    assert_eq!(board.len(), 1);
    assert_eq!(board[0]["n_price"], 7050.0);
    assert_eq!(board[0]["inserted_by"], "ravi");

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn rate_history_rejects_inverted_range() {
    let (app, temp_path) = test_app("rates-range").await;

    let resp = app
        .clone()
        .oneshot(get("/rates/history?from=2026-08-05&to=2026-08-01"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_INPUT");

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn routes_require_the_service_key() {
    let (app, temp_path) = test_app("rates-auth").await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/rates")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // health stays open for probes
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let _ = fs::remove_file(&temp_path);
}

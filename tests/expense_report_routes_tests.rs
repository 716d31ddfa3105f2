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

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
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

async fn seed_books(app: &Router) {
    let sales = [
        json!({
            "asof_date": "2026-08-01",
            "customer_name": "Meera", "customer_phone": "9876543210",
            "tag_no": "T-201", "item_name": "chain", "material": "gold",
            "item_type": "ornament",
            "p_grams": 8.0, "p_purity": 91.6, "p_cost": 40000.0,
            "s_cost": 50000.0, "o_cost": 5000.0,
            "inserted_by": "asha"
        }),
        json!({
            "asof_date": "2026-08-02",
            "customer_name": "Ravi", "customer_phone": "9000000001",
            "tag_no": "T-202", "item_name": "anklet", "material": "silver",
            "item_type": "ornament",
            "p_grams": 120.0, "p_purity": 99.9, "p_cost": 25000.0,
            "s_cost": 30000.0,
            "inserted_by": "asha"
        }),
    ];
    for sale in &sales {
        let resp = app
            .clone()
            .oneshot(post_json("/sales", sale))
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let expenses = [
        json!({
            "asof_date": "2026-08-02",
            "expense_type": "direct", "item_name": "polish",
            "cost": 1000.0, "udhaar": false, "inserted_by": "asha"
        }),
        json!({
            "asof_date": "2026-08-03",
            "expense_type": "indirect", "item_name": "chai",
            "cost": 500.0, "udhaar": true, "inserted_by": "ravi"
        }),
    ];
    for expense in &expenses {
        let resp = app
            .clone()
            .oneshot(post_json("/expenses", expense))
            .await
            .expect("request failed");
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
}

#[tokio::test]
async fn duplicate_expense_names_the_earlier_entrant() {
    let (app, temp_path) = test_app("expense-dup").await;

    let expense = json!({
        "asof_date": "2026-08-05",
        "expense_type": "direct", "item_name": "polish",
        "cost": 750.0, "inserted_by": "asha"
    });
    let resp = app
        .clone()
        .oneshot(post_json("/expenses", &expense))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let row = json_body(resp).await;
    assert_eq!(row["udhaar"], false);

    let mut again = expense.clone();
    again["inserted_by"] = json!("ravi");
    again["cost"] = json!(800.0);
    let resp = app
        .clone()
        .oneshot(post_json("/expenses", &again))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "DUPLICATE_ENTRY");
    assert!(
        body["error"]["message"]
            .as_str()
            .expect("message")
            .contains("asha")
    );

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn expense_listing_filters_by_type_and_udhaar() {
    let (app, temp_path) = test_app("expense-filters").await;
    seed_books(&app).await;

    let resp = app
        .clone()
        .oneshot(get("/expenses?from=2026-08-01&to=2026-08-31&expense_type=direct"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let rows = json_body(resp).await;
    let rows = rows.as_array().expect("rows is an array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["item_name"], "polish");

    let resp = app
        .clone()
        .oneshot(get("/expenses?from=2026-08-01&to=2026-08-31&udhaar=true"))
        .await
        .expect("request failed");
    let rows = json_body(resp).await;
    let rows = rows.as_array().expect("rows is an array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["item_name"], "chai");

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn summary_report_totals_the_books() {
    let (app, temp_path) = test_app("report-summary").await;
    seed_books(&app).await;

    let resp = app
        .clone()
        .oneshot(get("/reports/summary?from=2026-08-01&to=2026-08-31"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let summary = json_body(resp).await;

    assert_eq!(summary["sales"]["count"], 2);
    assert_eq!(summary["sales"]["revenue"], 80000.0);
    assert_eq!(summary["sales"]["purchase_cost"], 65000.0);
    assert_eq!(summary["sales"]["old_cost"], 5000.0);
    // profits: (50000-40000-5000) + (30000-25000-0)
    assert_eq!(summary["sales"]["profit"], 10000.0);

    assert_eq!(summary["expenses"]["count"], 2);
    assert_eq!(summary["expenses"]["total"], 1500.0);
    assert_eq!(summary["expenses"]["direct"], 1000.0);
    assert_eq!(summary["expenses"]["indirect"], 500.0);
    assert_eq!(summary["expenses"]["udhaar_total"], 500.0);

    assert_eq!(summary["net"], 10000.0 - 1500.0);

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn daily_report_covers_sale_only_and_expense_only_days() {
    let (app, temp_path) = test_app("report-daily").await;
    seed_books(&app).await;

    let resp = app
        .clone()
        .oneshot(get("/reports/daily?from=2026-08-01&to=2026-08-31"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let rows = json_body(resp).await;
    let rows = rows.as_array().expect("rows is an array");
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0]["asof_date"], "2026-08-01");
    assert_eq!(rows[0]["revenue"], 50000.0);
    assert_eq!(rows[0]["profit"], 5000.0);
    assert_eq!(rows[0]["expense_total"], 0.0);

    assert_eq!(rows[1]["asof_date"], "2026-08-02");
    assert_eq!(rows[1]["revenue"], 30000.0);
    assert_eq!(rows[1]["expense_total"], 1000.0);

    assert_eq!(rows[2]["asof_date"], "2026-08-03");
    assert_eq!(rows[2]["revenue"], 0.0);
    assert_eq!(rows[2]["expense_total"], 500.0);

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn material_report_splits_gold_and_silver() {
    let (app, temp_path) = test_app("report-materials").await;
    seed_books(&app).await;

    // only gold has a posted rate in range
    let rates = json!({
        "asof_date": "2026-08-01",
        "inserted_by": "asha",
        "rates": [{ "material": "gold", "karat": "22k", "n_price": 7000.0, "o_price": 6500.0 }]
    });
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/rates")
                .header("content-type", "application/json")
                .header("x-api-key", KEY)
                .body(Body::from(rates.to_string()))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(get("/reports/materials?from=2026-08-01&to=2026-08-31"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let rows = json_body(resp).await;
    let rows = rows.as_array().expect("rows is an array");
    assert_eq!(rows.len(), 2);

    let gold = rows
        .iter()
        .find(|r| r["material"] == "gold")
        .expect("gold row");
    assert_eq!(gold["sales_count"], 1);
    assert_eq!(gold["revenue"], 50000.0);
    assert_eq!(gold["avg_n_price"], 7000.0);

    let silver = rows
        .iter()
        .find(|r| r["material"] == "silver")
        .expect("silver row");
    assert_eq!(silver["sales_count"], 1);
    assert_eq!(silver["avg_n_price"], Value::Null);

    let _ = fs::remove_file(&temp_path);
}

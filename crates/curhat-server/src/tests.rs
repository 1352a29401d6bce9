//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, NaiveDate};
use curhat_core::models::{Category, Emotion, NewExpense, RegretStatus};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Monday 2025-06-16 09:00
fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 16)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn setup_test_app() -> (Router, Database) {
    let db = Database::in_memory().unwrap();
    let app = create_router_with_clock(
        db.clone(),
        AnalyticsConfig::default(),
        ServerConfig::default(),
        fixed_now,
    );
    (app, db)
}

fn seed(db: &Database, item: &str, amount: i64, category: Category, emotion: Emotion, date: NaiveDateTime) -> i64 {
    let expense = NewExpense {
        item_name: item.to_string(),
        amount,
        category,
        emotion_label: emotion,
        date: Some(date),
        regret: RegretStatus::Unset,
        description: None,
        sentiment_score: None,
    };
    db.insert_expense(&expense, date).unwrap()
}

/// The three-purchase June scenario: two stressed, one neutral
fn seed_scenario(db: &Database) -> Vec<i64> {
    let now = fixed_now();
    vec![
        seed(db, "Boba", 50000, Category::FoodAndDrink, Emotion::Stressed, now - Duration::days(7)),
        seed(db, "Ojek", 10000, Category::Transport, Emotion::Neutral, now - Duration::days(6)),
        seed(db, "Pizza", 60000, Category::FoodAndDrink, Emotion::Stressed, now - Duration::days(5)),
    ]
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn send_json(app: &Router, method: &str, uri: &str, body: serde_json::Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

// ========== Health ==========

#[tokio::test]
async fn test_health() {
    let (app, _db) = setup_test_app();
    let response = get(&app, "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_json(response).await["status"], "ok");
}

// ========== Report API Tests ==========

#[tokio::test]
async fn test_stats_empty_month() {
    let (app, _db) = setup_test_app();
    let response = get(&app, "/api/report/stats").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["period"], "2025-06");
    assert_eq!(json["total"], 0);
    assert_eq!(json["count"], 0);
    assert_eq!(json["average"], 0);
    assert!(json["highest"].is_null());
    assert_eq!(json["categories"], serde_json::json!({}));
    assert!(json.get("warnings").is_none());
}

#[tokio::test]
async fn test_stats_scenario() {
    let (app, db) = setup_test_app();
    seed_scenario(&db);

    let json = get_body_json(get(&app, "/api/report/stats?year=2025&month=6").await).await;
    assert_eq!(json["total"], 120000);
    assert_eq!(json["count"], 3);
    assert_eq!(json["average"], 40000);
    assert_eq!(json["highest"]["item"], "Pizza");
    assert_eq!(json["categories"]["Makanan & Minuman"], 110000);
    assert_eq!(json["categories"]["Transport"], 10000);

    let all = get_body_json(get(&app, "/api/report/stats?period=all").await).await;
    assert_eq!(all["period"], "all");
    assert_eq!(all["total"], 120000);

    let other = get_body_json(get(&app, "/api/report/stats?period=2025-05").await).await;
    assert_eq!(other["count"], 0);
}

#[tokio::test]
async fn test_stats_month_rollover() {
    let (app, db) = setup_test_app();
    let jan = NaiveDate::from_ymd_opt(2026, 1, 3).unwrap().and_hms_opt(10, 0, 0).unwrap();
    seed(&db, "Tiket", 80000, Category::Entertainment, Emotion::Happy, jan);

    let json = get_body_json(get(&app, "/api/report/stats?year=2025&month=13").await).await;
    assert_eq!(json["period"], "2026-01");
    assert_eq!(json["total"], 80000);
}

#[tokio::test]
async fn test_extreme_months_are_rejected() {
    let (app, _db) = setup_test_app();
    for uri in [
        "/api/report/stats?year=2025&month=2147483647",
        "/api/report/stats?year=2025&month=-2147483648",
        "/api/report/monthly?year=2025&month=2147483647",
        "/api/report/monthly?year=2147483647&month=13",
        "/api/expenses?year=2025&month=-2147483648",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_stats_invalid_period() {
    let (app, _db) = setup_test_app();
    let response = get(&app, "/api/report/stats?period=kemarin").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(get_body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_emotional_report() {
    let (app, db) = setup_test_app();

    let empty = get_body_json(get(&app, "/api/report/emotional").await).await;
    assert_eq!(empty["total_tracked"], 0);
    assert_eq!(empty["emotional_spending"], serde_json::json!([]));

    seed_scenario(&db);
    let json = get_body_json(get(&app, "/api/report/emotional").await).await;
    assert_eq!(json["total_tracked"], 120000);
    assert_eq!(json["emotional_spending"][0]["emotion"], "Stress");
    assert_eq!(json["emotional_spending"][0]["percentage"], 92);
    assert_eq!(json["emotional_spending"][1]["percentage"], 8);
    assert!(json["insight"].as_str().unwrap().contains("92%"));
}

#[tokio::test]
async fn test_monthly_report() {
    let (app, db) = setup_test_app();
    seed_scenario(&db);

    let json = get_body_json(get(&app, "/api/report/monthly").await).await;
    assert_eq!(json["month"], "2025-06");
    assert_eq!(json["stats"]["total"], 120000);
    assert!(json["insight"].is_string());

    let empty = get_body_json(get(&app, "/api/report/monthly?year=2024&month=2").await).await;
    assert!(empty["insight"].is_null());
    assert!(empty["message"].as_str().unwrap().starts_with("Belum ada transaksi"));
}

#[tokio::test]
async fn test_correlation_requires_enough_records() {
    let (app, db) = setup_test_app();
    seed_scenario(&db);

    let json = get_body_json(get(&app, "/api/report/correlation").await).await;
    assert!(json.is_null());

    let now = fixed_now();
    seed(&db, "Kopi", 10000, Category::FoodAndDrink, Emotion::Neutral, now - Duration::days(4));
    seed(&db, "Roti", 10000, Category::FoodAndDrink, Emotion::Neutral, now - Duration::days(3));

    let json = get_body_json(get(&app, "/api/report/correlation").await).await;
    assert_eq!(json["emotion"], "Stress");
    assert!(json["deviation_percent"].as_f64().unwrap() > 20.0);
}

#[tokio::test]
async fn test_scatter_limit() {
    let (app, db) = setup_test_app();
    seed_scenario(&db);

    let json = get_body_json(get(&app, "/api/report/scatter?limit=2").await).await;
    let points = json.as_array().unwrap();
    assert_eq!(points.len(), 2);
    // Newest first: Pizza (Stress)
    assert_eq!(points[0]["x"], -1.5);
    assert_eq!(points[0]["y"], 60000);
}

// ========== Audit API Tests ==========

#[tokio::test]
async fn test_audit_mark_flow() {
    let (app, db) = setup_test_app();
    let ids = seed_scenario(&db);
    let now = fixed_now();
    let recent = seed(&db, "Es krim", 15000, Category::FoodAndDrink, Emotion::Sad, now - Duration::hours(3));

    let json = get_body_json(get(&app, "/api/report/audit").await).await;
    let candidates = json["candidates"].as_array().unwrap();
    assert_eq!(candidates.len(), 2);
    assert!(candidates.iter().all(|c| c["id"] != recent));
    assert_eq!(json["stats"]["total_wasted"], 0);

    let uri = format!("/api/report/audit/{}?is_regret=true", ids[2]);
    let response = send_json(&app, "POST", &uri, serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["candidates"].as_array().unwrap().len(), 1);
    assert_eq!(json["stats"]["total_wasted"], 60000);
    assert_eq!(json["stats"]["count"], 1);

    // Idempotent
    let again = get_body_json(send_json(&app, "POST", &uri, serde_json::json!({})).await).await;
    assert_eq!(again, json);

    let missing = send_json(&app, "POST", "/api/report/audit/9999?is_regret=false", serde_json::json!({})).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_audit_mark_requires_flag() {
    let (app, db) = setup_test_app();
    let ids = seed_scenario(&db);
    let uri = format!("/api/report/audit/{}", ids[0]);
    let response = send_json(&app, "POST", &uri, serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Dashboard & Savings API Tests ==========

#[tokio::test]
async fn test_dashboard_stats() {
    let (app, db) = setup_test_app();
    let now = fixed_now();
    seed(&db, "Makan siang", 30000, Category::FoodAndDrink, Emotion::Hungry, now - Duration::days(7));
    seed(&db, "Makan malam", 20000, Category::FoodAndDrink, Emotion::Happy, now - Duration::days(7) + Duration::hours(10));
    seed(&db, "Kopi", 10000, Category::FoodAndDrink, Emotion::Stressed, now - Duration::days(14));

    let json = get_body_json(get(&app, "/api/dashboard/stats").await).await;
    assert_eq!(json["top_categories"][0]["name"], "Makanan & Minuman");
    assert_eq!(json["forecast"]["amount"], 30000);
    assert_eq!(
        json["forecast"]["message"],
        "Rata-rata pengeluaranmu di hari Senin adalah Rp 30,000."
    );
}

#[tokio::test]
async fn test_savings_goal_crud() {
    let (app, db) = setup_test_app();
    seed_scenario(&db);

    let response = send_json(
        &app,
        "POST",
        "/api/dashboard/savings",
        serde_json::json!({"name": "Makanan", "target_amount": 100000}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = get_body_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["current_amount"], 110000);
    assert_eq!(created["period_type"], "this_month");
    assert_eq!(created["progress"]["percent"], 100);
    assert_eq!(created["progress"]["is_over_budget"], true);

    let list = get_body_json(get(&app, "/api/dashboard/savings").await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let response = send_json(
        &app,
        "PUT",
        &format!("/api/dashboard/savings/{}", id),
        serde_json::json!({"target_amount": 500000}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = get_body_json(response).await;
    assert_eq!(updated["progress"]["percent"], 22);
    assert_eq!(updated["progress"]["is_over_budget"], false);

    let bad = send_json(
        &app,
        "PUT",
        &format!("/api/dashboard/savings/{}", id),
        serde_json::json!({"period_type": "custom", "period_start": "2025-06-10"}),
    )
    .await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/dashboard/savings/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let missing = send_json(
        &app,
        "PUT",
        &format!("/api/dashboard/savings/{}", id),
        serde_json::json!({"name": "Jajan"}),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

// ========== Expense API Tests ==========

#[tokio::test]
async fn test_expense_create_list_delete() {
    let (app, _db) = setup_test_app();

    let response = send_json(
        &app,
        "POST",
        "/api/expenses",
        serde_json::json!({
            "item_name": "Bakso",
            "amount": 20000,
            "category": "Makanan & Minuman",
            "emotion": "lapar"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = get_body_json(response).await;
    assert_eq!(created["emotion_label"], "Lapar");
    assert_eq!(created["date"], "2025-06-16T09:00:00");
    assert!(created["is_regret"].is_null());
    let id = created["id"].as_i64().unwrap();

    let list = get_body_json(get(&app, "/api/expenses?year=2025&month=6").await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let half = get(&app, "/api/expenses?year=2025").await;
    assert_eq!(half.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/expenses/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let list = get_body_json(get(&app, "/api/expenses").await).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_expense_validation() {
    let (app, _db) = setup_test_app();
    let response = send_json(
        &app,
        "POST",
        "/api/expenses",
        serde_json::json!({"item_name": "Refund", "amount": -5000}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_batch_delete_reports_failures() {
    let (app, db) = setup_test_app();
    let ids = seed_scenario(&db);

    let response = send_json(
        &app,
        "POST",
        "/api/expenses/delete",
        serde_json::json!({"ids": [ids[0], 4242]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["succeeded"], serde_json::json!([ids[0]]));
    assert_eq!(json["failed"][0]["id"], 4242);
    assert!(json["payload"]["candidates"].is_array());
    assert!(json.get("refresh_error").is_none());
}

// ========== Error mapping ==========

#[test]
fn test_core_errors_map_to_status() {
    let cases = [
        (curhat_core::Error::InvalidRange("x".into()), StatusCode::BAD_REQUEST),
        (curhat_core::Error::InvalidData("x".into()), StatusCode::BAD_REQUEST),
        (curhat_core::Error::NotFound("x".into()), StatusCode::NOT_FOUND),
        (
            curhat_core::Error::ExternalWrite {
                id: 1,
                reason: "timeout".into(),
            },
            StatusCode::BAD_GATEWAY,
        ),
        (curhat_core::Error::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, status) in cases {
        assert_eq!(AppError::from(err).status(), status);
    }
}

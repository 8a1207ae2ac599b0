//! HTTP-level integration tests for reports, analytics, comparison and
//! CSV export.

mod common;

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::fixtures::{color, cross, intersection, semaphore, user_token};
use common::{body_json, body_text, get_auth};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn violations_report_lists_red_light_crossings(pool: PgPool) {
    let token = user_token(&pool).await;
    let id = intersection(&pool, "Romana", 1).await;
    let sem = semaphore(&pool, id, "Bd. Magheru").await;
    let now = Utc::now();
    color(&pool, sem, "RED", now - Duration::hours(2)).await;
    cross(&pool, sem, "CAR", now - Duration::hours(1)).await;
    color(&pool, sem, "GREEN", now - Duration::minutes(30)).await;
    cross(&pool, sem, "BUS", now - Duration::minutes(10)).await;
    let app = common::build_test_app(pool);

    let json = body_json(get_auth(app, "/api/reports/violations", &token).await).await;

    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["type"], "CAR");
    assert_eq!(entries[0]["intersection"], "Romana");
    assert_eq!(entries[0]["street"], "Bd. Magheru");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_on_empty_database(pool: PgPool) {
    let token = user_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/analytics/dashboard", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({
            "totalIntersections": 0,
            "totalDelays": 0,
            "avgDelayMinutes": 0.0,
            "totalViolations": 0
        })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn traffic_flow_has_one_bucket_per_day(pool: PgPool) {
    let token = user_token(&pool).await;
    let id = intersection(&pool, "Unirii", 1).await;
    let sem = semaphore(&pool, id, "A").await;
    cross(&pool, sem, "PERSON", Utc::now()).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app.clone(), "/api/analytics/traffic-flow?days=3", &token).await;
    let json = body_json(response).await;
    let days = json.as_array().unwrap();
    assert_eq!(days.len(), 3);
    assert_eq!(days[2]["date"], Utc::now().date_naive().format("%Y-%m-%d").to_string());

    let json = body_json(get_auth(app, "/api/analytics/congestion-trends", &token).await).await;
    assert_eq!(json.as_array().unwrap().len(), 7);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn comparison_skips_unknown_ids(pool: PgPool) {
    let token = user_token(&pool).await;
    let a = intersection(&pool, "A", 1).await;
    let b = intersection(&pool, "B", 2).await;
    let sem = semaphore(&pool, b, "B1").await;
    cross(&pool, sem, "TROLEIBUS", Utc::now()).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/comparison/intersections?ids={a},{b},999999,x");
    let response = get_auth(app, &uri, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    let b_entry = entries.iter().find(|e| e["id"] == b).unwrap();
    assert_eq!(b_entry["stats"]["troleibuses"], 1);
    assert_eq!(b_entry["sector"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn comparison_requires_ids(pool: PgPool) {
    let token = user_token(&pool).await;
    let app = common::build_test_app(pool);

    for uri in [
        "/api/comparison/intersections",
        "/api/comparison/intersections?ids=",
        "/api/comparison/intersections?ids=a,b",
    ] {
        let response = get_auth(app.clone(), uri, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn intersections_csv_export(pool: PgPool) {
    let token = user_token(&pool).await;
    let id = intersection(&pool, "Piata \"Mare\"", 3).await;
    semaphore(&pool, id, "A").await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/export/intersections/csv", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    let text = body_text(response).await;
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "ID,Name,Sector,Latitude,Longitude,Semaphores,Stations");
    assert!(lines[1].contains("\"Piata \"\"Mare\"\"\""), "{}", lines[1]);
    assert!(lines[1].ends_with(",1,0"), "{}", lines[1]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn traffic_csv_export_honours_date_range(pool: PgPool) {
    let token = user_token(&pool).await;
    let id = intersection(&pool, "Unirii", 1).await;
    let sem = semaphore(&pool, id, "Bd. Unirii").await;
    let now = Utc::now();
    cross(&pool, sem, "CAR", now - Duration::hours(1)).await;
    cross(&pool, sem, "TRAM", now - Duration::days(30)).await;
    let app = common::build_test_app(pool);

    let text = body_text(get_auth(app, "/api/export/traffic/csv", &token).await).await;

    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "Type,Timestamp,Intersection,Street,Speed,Vehicle");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("Car,"), "{}", lines[1]);
}

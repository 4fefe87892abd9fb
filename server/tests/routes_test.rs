use std::sync::Arc;

use axum::{body::{to_bytes, Body}, http::{Request, StatusCode}, Router};
use scan_report_data_management::{memory::MemorySource, DataManager};
use server::{routes, server_state::ServerState};
use tower::ServiceExt;

const FIXTURE: &str = include_str!("../fixtures/summary.json");

fn app(source: MemorySource) -> Router {
    let state = Arc::new(ServerState::new(DataManager::new(source), "IS"));
    routes::router(state, "static")
}

fn fixture_app() -> Router {
    app(MemorySource::from_json(FIXTURE).unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn known_country_renders_dashboard() {
    let (status, body) = get(fixture_app(), "/IS").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Iceland (IS)"));
    for title in ["Total IPs Scanned", "Total Active IPs", "Ports Scanned", "Total Open Ports", "Ports Identified", "CPE Identified"] {
        assert!(body.contains(title), "missing {title}");
    }
    assert!(body.contains("<p>884736</p>"));
    assert!(body.contains(r#"["10-04-2025","17-04-2025","24-04-2025"]"#));
}

#[tokio::test]
async fn lowercase_code_is_accepted() {
    let (status, body) = get(fixture_app(), "/is").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<p>41230</p>"));
}

#[tokio::test]
async fn root_shows_default_country() {
    let (status, body) = get(fixture_app(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Iceland (IS)"));
}

#[tokio::test]
async fn unknown_country_is_404() {
    let (status, body) = get(fixture_app(), "/ZZ").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("404"));
}

#[tokio::test]
async fn outage_serves_unavailable_page_not_404() {
    let (status, body) = get(app(MemorySource::unavailable()), "/IS").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Data unavailable"));

    let (status, _) = get(app(MemorySource::unavailable()), "/ZZ").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn not_route_always_serves_unavailable_page() {
    let (status, body) = get(fixture_app(), "/not").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Data unavailable"));
}

#[tokio::test]
async fn unmatched_path_is_404() {
    let (status, body) = get(fixture_app(), "/IS/history/2025").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("404"));
}

#[tokio::test]
async fn static_files_are_served() {
    let (status, body) = get(fixture_app(), "/static/js/graphs.js").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("draw_line_graph"));
}

#[tokio::test]
async fn missing_static_file_renders_not_found_page() {
    let (status, body) = get(fixture_app(), "/static/js/missing.js").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("404"));
    assert!(body.contains("There is no scan summary"));
}

#[tokio::test]
async fn missing_metrics_degrade_gracefully() {
    let (status, body) = get(fixture_app(), "/FO").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<p>24576</p>"));
    assert!(body.contains("<p>N/A</p>"));
    assert!(body.contains("No data"));
}

#[tokio::test]
async fn api_dashboard_returns_shaped_view_models() {
    let (status, body) = get(fixture_app(), "/api/dashboard/is").await;
    assert_eq!(status, StatusCode::OK);

    let dashboard: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(dashboard["country_code"], "IS");
    assert_eq!(dashboard["simple_blocks"].as_array().unwrap().len(), 4);

    let multi_blocks = dashboard["multi_blocks"].as_array().unwrap();
    assert_eq!(multi_blocks.len(), 6);
    let ports = multi_blocks[0]["content"].as_object().unwrap();
    assert_eq!(ports.keys().collect::<Vec<_>>(), vec!["80", "443", "22", "8080", "21"]);

    let graph = &dashboard["line_graphs"][0];
    assert_eq!(graph["canvas_id"], "line-graph_total-open-ports");
    assert_eq!(graph["plots"][0], serde_json::json!([60412, 59870, 61250]));
}

#[tokio::test]
async fn api_dashboard_distinguishes_unknown_from_unavailable() {
    let (status, _) = get(fixture_app(), "/api/dashboard/ZZ").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(app(MemorySource::unavailable()), "/api/dashboard/IS").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn api_countries_lists_codes() {
    let (status, body) = get(fixture_app(), "/api/countries").await;
    assert_eq!(status, StatusCode::OK);

    let codes: Vec<String> = serde_json::from_str(&body).unwrap();
    assert_eq!(codes, vec!["FO", "IS", "NO"]);

    let (status, _) = get(app(MemorySource::unavailable()), "/api/countries").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

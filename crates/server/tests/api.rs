use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use export::{ExportError, ExportRow, ExportSink};
use forecast::{FallbackTable, KeywordIdea, KeywordMetricsProvider, ProviderError, Unconfigured};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use server::{build_router, ServerConfig, ServerState};
use tower::ServiceExt;

struct FixedProvider(Result<Vec<KeywordIdea>, ProviderError>);

#[async_trait]
impl KeywordMetricsProvider for FixedProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn keyword_ideas(&self, _keywords: &[String]) -> Result<Vec<KeywordIdea>, ProviderError> {
        self.0.clone()
    }
}

/// Answers only after `delay`, like a hung token grant or ideas call.
struct SlowProvider {
    delay: Duration,
}

#[async_trait]
impl KeywordMetricsProvider for SlowProvider {
    fn name(&self) -> &str {
        "slow"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn keyword_ideas(&self, _keywords: &[String]) -> Result<Vec<KeywordIdea>, ProviderError> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![KeywordIdea::new("shoes").with_avg_cpc(9.0).with_estimated_clicks(900.0)])
    }
}

#[derive(Default)]
struct MemorySink {
    id: Option<String>,
    fail_with: Option<ExportError>,
    rows: Mutex<Vec<ExportRow>>,
}

impl MemorySink {
    fn configured() -> Self {
        Self {
            id: Some("sheet-1".into()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ExportSink for MemorySink {
    fn destination(&self) -> Option<&str> {
        self.id.as_deref()
    }

    async fn append(&self, row: &ExportRow) -> Result<(), ExportError> {
        if self.id.is_none() {
            return Err(ExportError::MissingDestination);
        }
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.rows.lock().unwrap().push(row.clone());
        Ok(())
    }
}

fn app_with(provider: Arc<dyn KeywordMetricsProvider>, sink: Arc<MemorySink>) -> (Router, Arc<ServerState>) {
    app_with_config(ServerConfig::default(), provider, sink)
}

fn app_with_config(
    config: ServerConfig,
    provider: Arc<dyn KeywordMetricsProvider>,
    sink: Arc<MemorySink>,
) -> (Router, Arc<ServerState>) {
    let state = Arc::new(ServerState::new(
        config,
        provider,
        FallbackTable::builtin(),
        sink,
    ));
    (build_router(state.clone()), state)
}

fn app() -> Router {
    app_with(Arc::new(Unconfigured), Arc::new(MemorySink::configured())).0
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes.to_vec())
}

async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn scenario_a() -> Value {
    json!({
        "keywords": [],
        "targetCpc": 2,
        "estimatedMonthlyClicks": 500,
        "conversionRatePct": 3,
        "targetRoas": 4,
        "campaignMonths": 3
    })
}

fn exported_estimate() -> Value {
    json!({
        "totalSpend": 3000,
        "totalRevenue": 12000,
        "roiPct": 300,
        "estimatedCpc": 2,
        "estimatedCpm": 4,
        "monthlyBreakdown": [
            {"month": 1, "spend": 1000, "revenue": 4000},
            {"month": 2, "spend": 1000, "revenue": 4000}
        ],
        "usedApi": false
    })
}

#[tokio::test]
async fn estimate_returns_camel_case_result() {
    let (status, body) = send_json(app(), json_post("/api/estimate", scenario_a())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalSpend"], json!(3000.0));
    assert_eq!(body["totalRevenue"], json!(12000.0));
    assert_eq!(body["roiPct"], json!(300.0));
    assert_eq!(body["estimatedCpc"], json!(2.0));
    assert_eq!(body["estimatedCpm"], json!(4.0));
    assert_eq!(body["monthlyBreakdown"].as_array().unwrap().len(), 3);
    assert_eq!(body["monthlyBreakdown"][2]["month"], json!(3));
    assert_eq!(body["usedApi"], json!(false));
    assert!(body.get("notes").is_none());
}

#[tokio::test]
async fn estimate_with_fallback_keyword_carries_note() {
    let mut request = scenario_a();
    request["keywords"] = json!(["Shoes"]);
    let (status, body) = send_json(app(), json_post("/api/estimate", request)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estimatedCpc"], json!(1.5));
    assert_eq!(body["usedApi"], json!(false));
    assert_eq!(
        body["notes"],
        json!("Used fallback sample data when API not available")
    );
}

#[tokio::test]
async fn estimate_uses_live_provider_when_available() {
    let provider = FixedProvider(Ok(vec![
        KeywordIdea::new("shoes").with_avg_cpc(3.0).with_estimated_clicks(600.0),
        KeywordIdea::new("running shoes").with_estimated_clicks(400.0),
    ]));
    let (app, _) = app_with(Arc::new(provider), Arc::new(MemorySink::configured()));
    let mut request = scenario_a();
    request["keywords"] = json!(["shoes", "running shoes"]);

    let (status, body) = send_json(app, json_post("/api/estimate", request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usedApi"], json!(true));
    assert_eq!(body["estimatedCpc"], json!(2.5));
    assert_eq!(body["totalSpend"], json!(3750.0));
}

#[tokio::test]
async fn failing_provider_is_invisible_to_clients() {
    let failing = FixedProvider(Err(ProviderError::Request("timeout".into())));
    let (app, _) = app_with(Arc::new(failing), Arc::new(MemorySink::configured()));
    let mut request = scenario_a();
    request["keywords"] = json!(["laptop"]);

    let (status, body) = send_json(app, json_post("/api/estimate", request.clone())).await;
    let (_, unavailable) = send_json(self::app(), json_post("/api/estimate", request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, unavailable);
}

#[tokio::test]
async fn hung_provider_falls_back_before_request_timeout() {
    let config = ServerConfig {
        timeout_secs: 5,
        provider_timeout_secs: 1,
        ..Default::default()
    };
    let provider = SlowProvider {
        delay: Duration::from_secs(3),
    };
    let (app, _) = app_with_config(config, Arc::new(provider), Arc::new(MemorySink::configured()));
    let mut request = scenario_a();
    request["keywords"] = json!(["shoes"]);

    let (status, body) = send_json(app, json_post("/api/estimate", request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usedApi"], json!(false));
    assert_eq!(body["estimatedCpc"], json!(1.5));
    assert_eq!(
        body["notes"],
        json!("Used fallback sample data when API not available")
    );
}

#[tokio::test]
async fn invalid_estimate_input_is_400() {
    let mut request = scenario_a();
    request["targetCpc"] = json!(0);
    let (status, body) = send_json(app(), json_post("/api/estimate", request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid input"}));

    let malformed = Request::builder()
        .method("POST")
        .uri("/api/estimate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send_json(app(), malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid input"}));
}

#[tokio::test]
async fn overflowing_estimate_is_500_without_detail() {
    let request = json!({
        "keywords": [],
        "targetCpc": 1e300,
        "estimatedMonthlyClicks": 1e300,
        "conversionRatePct": 1,
        "targetRoas": 2,
        "campaignMonths": 1
    });
    let (status, body) = send_json(app(), json_post("/api/estimate", request)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn wrong_method_is_405() {
    for uri in ["/api/estimate", "/api/export", "/api/export/csv"] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send_json(app(), request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{uri}");
        assert_eq!(body, json!({"error": "Method not allowed"}));
    }
}

#[tokio::test]
async fn export_json_appends_one_row() {
    let sink = Arc::new(MemorySink::configured());
    let (app, state) = app_with(Arc::new(Unconfigured), sink.clone());

    let (status, body) = send_json(app, json_post("/api/export", exported_estimate())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));

    let rows = sink.rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_spend, 3000.0);
    assert_eq!(rows[0].estimated_cpm, 4.0);
    assert_eq!(state.events.get("export_click").unwrap().count, 1);
}

#[tokio::test]
async fn export_form_payload_is_decoded() {
    let sink = Arc::new(MemorySink::configured());
    let (app, _) = app_with(Arc::new(Unconfigured), sink.clone());

    // Form-encoded field whose value is itself URL-encoded JSON.
    let inner = "%7B%22totalSpend%22%3A10%2C%22totalRevenue%22%3A30%2C%22roiPct%22%3A200%2C%22estimatedCpc%22%3A1%2C%22estimatedCpm%22%3A100%7D";
    let form = format!("payload={}", inner.replace('%', "%25"));
    let request = Request::builder()
        .method("POST")
        .uri("/api/export")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap();

    let (status, body) = send_json(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
    assert_eq!(sink.rows.lock().unwrap()[0].roi_pct, 200.0);
}

#[tokio::test]
async fn export_without_sheet_id_is_400() {
    let (app, _) = app_with(Arc::new(Unconfigured), Arc::new(MemorySink::default()));
    let (status, body) = send_json(app, json_post("/api/export", exported_estimate())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing GOOGLE_SHEETS_ID"}));
}

#[tokio::test]
async fn export_failure_is_500() {
    let sink = MemorySink {
        fail_with: Some(ExportError::Append("HTTP 403".into())),
        ..MemorySink::configured()
    };
    let (app, _) = app_with(Arc::new(Unconfigured), Arc::new(sink));
    let (status, body) = send_json(app, json_post("/api/export", exported_estimate())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to export to Google Sheets"}));
}

#[tokio::test]
async fn export_rejects_malformed_payload() {
    let (status, body) = send_json(app(), json_post("/api/export", json!({"totalSpend": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid input"}));
}

#[tokio::test]
async fn csv_download_has_both_sections() {
    let (status, headers, bytes) = send(app(), json_post("/api/export/csv", exported_estimate())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/csv; charset=utf-8");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"google-ads-forecast.csv\""
    );
    let csv = String::from_utf8(bytes).unwrap();
    assert!(csv.starts_with("Metric,Value\nEstimated Spend (Total),3000\n"));
    assert!(csv.ends_with("Month,Spend,Revenue\n1,1000,4000\n2,1000,4000"));
}

#[tokio::test]
async fn analytics_counts_estimate_requests() {
    let (app, state) = app_with(Arc::new(Unconfigured), Arc::new(MemorySink::configured()));
    send_json(app.clone(), json_post("/api/estimate", scenario_a())).await;
    send_json(app.clone(), json_post("/api/estimate", json!({}))).await;

    assert_eq!(state.events.get("calculate_click").unwrap().count, 2);

    let request = Request::builder().uri("/api/analytics").body(Body::empty()).unwrap();
    let (status, body) = send_json(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["calculate_click"]["count"], json!(2));
    assert!(body["calculate_click"]["lastAt"].is_string());
}

#[tokio::test]
async fn health_ready_and_request_id() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let (status, headers, bytes) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["x-request-id"], "req-42");
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], json!("healthy"));

    let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();
    let (status, headers, bytes) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers.contains_key("x-request-id"));
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["components"]["keyword_metrics"], json!("fallback_only"));
    assert_eq!(body["components"]["export"], json!("configured"));
}

#[tokio::test]
async fn unknown_path_is_404() {
    let request = Request::builder().uri("/nope").body(Body::empty()).unwrap();
    let (status, body) = send_json(app(), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found"}));
}

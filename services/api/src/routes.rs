use crate::infra::{AppState, RateDecision};
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use health_risk::assessment::{assess, AssessmentError, RiskAssessment};
use health_risk::error::AppError;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::net::SocketAddr;
use std::time::Instant;
use tracing::{error, info, warn};

pub(crate) const ASSESS_RISK_PATH: &str = "/api/health/assess-risk";

#[derive(Debug, Serialize)]
pub(crate) struct AssessmentEnvelope {
    pub(crate) success: bool,
    pub(crate) data: RiskAssessment,
    pub(crate) message: &'static str,
}

pub(crate) fn router(state: AppState) -> Router {
    let assessment_routes = Router::new()
        .route(ASSESS_RISK_PATH, post(assess_risk_endpoint))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .merge(assessment_routes)
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn assess_risk_endpoint(
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AssessmentEnvelope>, Response> {
    let body = body.map_err(|rejection| {
        warn!(status = %rejection.status(), "health risk request body unreadable");
        error_envelope(rejection.status(), rejection.body_text(), "INVALID_BODY")
    })?;
    let candidate = decode_candidate(&headers, &body).map_err(|err| {
        warn!(%err, "health risk request body is not valid JSON");
        err.into_response()
    })?;

    match assess(&candidate) {
        Ok(assessment) => {
            info!(
                overall = assessment.overall_score,
                level = assessment.risk_level.label(),
                "health risk assessment completed"
            );
            Ok(Json(AssessmentEnvelope {
                success: true,
                data: assessment,
                message: "Health risk assessment completed successfully",
            }))
        }
        Err(err) => {
            match &err {
                AssessmentError::Validation(validation) => {
                    warn!(field = validation.field().name(), "health risk input rejected");
                }
                AssessmentError::Internal(detail) => {
                    error!(%detail, "health risk assessment failed");
                }
            }
            Err(AppError::from(err).into_response())
        }
    }
}

/// A body only parses as JSON when declared as JSON and non-empty; anything
/// else is read as an empty record and fails presence validation.
fn decode_candidate(headers: &HeaderMap, body: &[u8]) -> Result<Value, AppError> {
    if body.is_empty() || !declares_json(headers) {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_json::from_slice(body)?)
}

fn declares_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

fn error_envelope(status: StatusCode, message: String, code: &'static str) -> Response {
    let payload = json!({
        "success": false,
        "message": message,
        "error": code,
    });
    (status, Json(payload)).into_response()
}

pub(crate) async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(&request);

    match state.limiter.check(&client, Instant::now()) {
        RateDecision::Allowed { limit, remaining } => {
            let mut response = next.run(request).await;
            apply_rate_headers(response.headers_mut(), limit, remaining, &state);
            response
        }
        RateDecision::Limited { retry_after } => {
            warn!(%client, "rate limit exceeded");
            let payload = json!({
                "success": false,
                "message": "Too many requests. Please try again later.",
                "error": "RATE_LIMIT_EXCEEDED",
                "retryAfter": retry_after.as_secs(),
            });
            (StatusCode::TOO_MANY_REQUESTS, Json(payload)).into_response()
        }
    }
}

fn apply_rate_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, state: &AppState) {
    headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));

    let reset = chrono::Duration::from_std(state.limiter.config().window)
        .ok()
        .and_then(|window| Utc::now().checked_add_signed(window))
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true));
    if let Some(value) = reset.and_then(|at| HeaderValue::from_str(&at).ok()) {
        headers.insert("x-ratelimit-reset", value);
    }
}

/// First forwarded address, then `X-Real-IP`, then the socket peer.
fn client_key(request: &Request) -> String {
    let headers = request.headers();
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if let Some(client) = forwarded {
        return client.to_string();
    }

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if let Some(client) = real_ip {
        return client.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryRateLimiter;
    use axum::body::Body;
    use axum::http;
    use health_risk::config::RateLimitConfig;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_state(max_requests: u32) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(recorder.handle()),
            limiter: Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
                max_requests,
                window: Duration::from_secs(60),
            })),
        }
    }

    fn dashboard_profile() -> Value {
        json!({
            "age": 30,
            "gender": "male",
            "bmi": 22.5,
            "systolic_bp": 120,
            "diastolic_bp": 80,
            "cholesterol": 180,
            "glucose": 90,
            "smoking": "never",
            "physical_activity": "moderate",
            "aqi_exposure": 50,
            "heat_exposure": 25
        })
    }

    fn assess_request(body: &Value, client: &str) -> Request {
        http::Request::builder()
            .method("POST")
            .uri(ASSESS_RISK_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", client)
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("body is JSON")
    }

    #[tokio::test]
    async fn assess_endpoint_wraps_assessment_in_envelope() {
        let app = router(test_state(10));

        let response = app
            .oneshot(assess_request(&dashboard_profile(), "203.0.113.7"))
            .await
            .expect("request handled");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-ratelimit-remaining"),
            Some(&HeaderValue::from(9u32))
        );
        assert!(response.headers().contains_key("x-ratelimit-reset"));

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(
            body["message"],
            "Health risk assessment completed successfully"
        );
        assert_eq!(body["data"]["overall_score"], 13);
        assert_eq!(body["data"]["risk_level"], "low");
        assert_eq!(body["data"]["recommendations"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn assess_endpoint_reports_validation_errors() {
        let app = router(test_state(10));
        let mut profile = dashboard_profile();
        profile["age"] = json!(150);

        let response = app
            .oneshot(assess_request(&profile, "203.0.113.7"))
            .await
            .expect("request handled");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Age must be between 1 and 120");
    }

    fn raw_assess_request(body: impl Into<Body>, content_type: Option<&str>) -> Request {
        let mut builder = http::Request::builder()
            .method("POST")
            .uri(ASSESS_RISK_PATH)
            .header("x-forwarded-for", "203.0.113.8");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(body.into()).expect("request builds")
    }

    fn assert_json_reply(response: &Response) {
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());
        assert_eq!(content_type, Some("application/json"));
    }

    #[tokio::test]
    async fn malformed_body_gets_invalid_json_envelope() {
        let app = router(test_state(10));

        let response = app
            .oneshot(raw_assess_request("{not json", Some("application/json")))
            .await
            .expect("request handled");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_json_reply(&response);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "INVALID_JSON");
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn body_without_json_content_type_is_read_as_empty_record() {
        let app = router(test_state(10));

        let response = app
            .oneshot(raw_assess_request(r#"{"age": 30}"#, None))
            .await
            .expect("request handled");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_json_reply(&response);
        let body = body_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Missing required field: age");
    }

    #[tokio::test]
    async fn empty_json_body_fails_presence_validation() {
        let app = router(test_state(10));

        let response = app
            .oneshot(raw_assess_request("", Some("application/json")))
            .await
            .expect("request handled");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_json_reply(&response);
        let body = body_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Missing required field: age");
    }

    #[tokio::test]
    async fn json_content_type_with_charset_is_parsed() {
        let app = router(test_state(10));
        let response = app
            .oneshot(raw_assess_request(
                dashboard_profile().to_string(),
                Some("application/json; charset=utf-8"),
            ))
            .await
            .expect("request handled");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn assess_endpoint_rate_limits_per_client() {
        let app = router(test_state(2));

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(assess_request(&dashboard_profile(), "198.51.100.4"))
                .await
                .expect("request handled");
            assert_eq!(response.status(), StatusCode::OK);
        }

        let limited = app
            .clone()
            .oneshot(assess_request(&dashboard_profile(), "198.51.100.4"))
            .await
            .expect("request handled");
        assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = body_json(limited).await;
        assert_eq!(body["error"], "RATE_LIMIT_EXCEEDED");
        assert_eq!(body["retryAfter"], 60);

        let other_client = app
            .oneshot(assess_request(&dashboard_profile(), "198.51.100.5"))
            .await
            .expect("request handled");
        assert_eq!(other_client.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn healthcheck_is_not_rate_limited() {
        let app = router(test_state(1));

        for _ in 0..3 {
            let response = app
                .clone()
                .oneshot(
                    http::Request::builder()
                        .uri("/health")
                        .body(Body::empty())
                        .expect("request builds"),
                )
                .await
                .expect("request handled");
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let state = test_state(1);
        state
            .readiness
            .store(false, std::sync::atomic::Ordering::Release);
        let app = router(state);

        let response = app
            .oneshot(
                http::Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("request handled");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn client_key_prefers_forwarded_header() {
        let request = http::Request::builder()
            .header("x-forwarded-for", "192.0.2.1, 10.0.0.1")
            .header("x-real-ip", "192.0.2.9")
            .body(Body::empty())
            .expect("request builds");
        assert_eq!(client_key(&request), "192.0.2.1");

        let request = http::Request::builder()
            .header("x-real-ip", "192.0.2.9")
            .body(Body::empty())
            .expect("request builds");
        assert_eq!(client_key(&request), "192.0.2.9");

        let request = http::Request::builder()
            .body(Body::empty())
            .expect("request builds");
        assert_eq!(client_key(&request), "unknown");
    }
}

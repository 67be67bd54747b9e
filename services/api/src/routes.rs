use crate::infra::{build_report, AppState, EconomicsOverrides, ModelScores};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use leadscore::error::AppError;
use leadscore::evaluation::{BudgetConstraint, CostModel, LeadPrioritizationReport};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize)]
pub(crate) struct ProfitCurveRequest {
    pub(crate) models: Vec<ModelScores>,
    #[serde(default)]
    pub(crate) cost_model: Option<CostModel>,
    #[serde(default)]
    pub(crate) grid_step: Option<f64>,
    #[serde(default)]
    pub(crate) budget: Option<BudgetConstraint>,
    #[serde(default)]
    pub(crate) mean_historical_profit: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfitCurveResponse {
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) report: LeadPrioritizationReport,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/profit-curve", post(profit_curve_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
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

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn profit_curve_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ProfitCurveRequest>,
) -> Result<Json<ProfitCurveResponse>, AppError> {
    let ProfitCurveRequest {
        models,
        cost_model,
        grid_step,
        budget,
        mean_historical_profit,
    } = payload;

    let models = models
        .into_iter()
        .map(ModelScores::into_scored_model)
        .collect::<Result<Vec<_>, _>>()?;

    let overrides = EconomicsOverrides {
        cost_model,
        grid_step,
        budget,
        mean_historical_profit,
    };
    let report = build_report(&state.economics, overrides, &models)?;

    Ok(Json(ProfitCurveResponse {
        generated_at: Utc::now(),
        report,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use leadscore::config::EconomicsConfig;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            economics: Arc::new(EconomicsConfig::default()),
        }
    }

    fn app(ready: bool) -> Router {
        router().layer(Extension(state(ready)))
    }

    /// Top 10 hold 8 buyers, next 10 are all buyers, then nobody buys.
    fn scenario_payload() -> Value {
        let records: Vec<Value> = (0..40)
            .map(|rank| {
                let label = match rank {
                    0..=9 => i64::from(rank != 2 && rank != 6),
                    10..=19 => 1,
                    _ => 0,
                };
                json!({ "score": 1.0 - rank as f64 * 0.02, "label": label })
            })
            .collect();

        json!({
            "models": [{ "name": "Random Forest", "records": records }],
            "budget": { "fraction": 0.25 },
            "mean_historical_profit": 2000.0
        })
    }

    async fn read_json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 4 * 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    fn post_json(uri: &str, payload: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::to_vec(payload).expect("serialize payload"),
            ))
            .expect("request")
    }

    #[tokio::test]
    async fn profit_curve_route_returns_report() {
        let response = app(true)
            .oneshot(post_json("/api/v1/profit-curve", &scenario_payload()))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert!(payload.get("generated_at").is_some());

        let report = &payload["report"];
        assert_eq!(report["best_model"], "Random Forest");
        assert_eq!(report["budget_fraction"], 0.25);

        let summary = &report["models"][0];
        assert_eq!(summary["optimum"]["targeted_count"], 20);
        assert_eq!(summary["optimum"]["profit"], 6000.0);
        assert_eq!(summary["budget_point"]["targeted_count"], 10);
        assert_eq!(summary["budget_point"]["profit"], 2000.0);
        assert_eq!(summary["lift_over_historical"], 0.0);
    }

    #[tokio::test]
    async fn non_binary_labels_are_rejected() {
        let payload = json!({
            "models": [{
                "name": "Decision Tree",
                "records": [{ "score": 0.4, "label": 3 }]
            }]
        });

        let response = app(true)
            .oneshot(post_json("/api/v1/profit-curve", &payload))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert!(payload["error"]
            .as_str()
            .unwrap_or_default()
            .contains("label 3"));
    }

    #[tokio::test]
    async fn out_of_range_budget_is_rejected() {
        let mut payload = scenario_payload();
        payload["budget"] = json!({ "fraction": 1.1 });

        let response = app(true)
            .oneshot(post_json("/api/v1/profit-curve", &payload))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unusable_grid_steps_are_rejected() {
        for step in [1e-9, 0.4] {
            let mut payload = scenario_payload();
            payload["grid_step"] = json!(step);

            let response = app(true)
                .oneshot(post_json("/api/v1/profit-curve", &payload))
                .await
                .expect("router dispatch");

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "step {step}");
            let body = read_json_body(response).await;
            assert!(body["error"]
                .as_str()
                .unwrap_or_default()
                .contains("grid step"));
        }
    }

    #[tokio::test]
    async fn empty_model_list_is_rejected() {
        let response = app(true)
            .oneshot(post_json("/api/v1/profit-curve", &json!({ "models": [] })))
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn readiness_reflects_startup_state() {
        let response = app(false)
            .oneshot(
                Request::builder()
                    .uri("/ready")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json_body(response).await["status"], "ok");
    }
}

//! HTTP API handlers.

use axum::body::Bytes;
use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::metrics;
use crate::model::Classifier;
use crate::record::{PatientRecord, PredictionResult};

/// Welcome message served at the root endpoint.
pub const WELCOME_MESSAGE: &str = "Bienvenue sur l'API de prédiction de diabète";

/// Error message for an empty or non-JSON request body.
pub const NO_JSON_MESSAGE: &str = "Aucun JSON fourni";

/// Application state shared with handlers.
///
/// The classifier is the only cross-request state and it is read-only; one
/// instance is loaded at startup and shared by reference for the lifetime of
/// the process.
#[derive(Clone)]
pub struct AppState {
    /// Loaded classifier, safe for concurrent invocation.
    pub classifier: Arc<dyn Classifier>,
    /// Whether the service is ready to predict.
    pub ready: Arc<std::sync::atomic::AtomicBool>,
    /// Prometheus exporter handle, when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state around a loaded classifier.
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            ready: Arc::new(std::sync::atomic::AtomicBool::new(false)),
            metrics: None,
        }
    }

    /// Attach a Prometheus exporter handle.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Set ready state.
    pub fn set_ready(&self, ready: bool) {
        self.ready
            .store(ready, std::sync::atomic::Ordering::SeqCst);
    }

    /// Check if ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// Welcome response for the root endpoint.
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    /// Static welcome text.
    pub message: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether the classifier is loaded and serving.
    pub ready: bool,
}

/// Root handler - static welcome payload.
pub async fn accueil() -> impl IntoResponse {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE,
    })
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 if ready, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let is_ready = state.is_ready();
    let response = ReadyResponse { ready: is_ready };

    if is_ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Prometheus metrics handler.
pub async fn metrics_export(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Prediction handler.
///
/// Every failure class maps to a 400 with a structured `erreur` payload:
/// empty/non-JSON body, per-field validation failures, and classifier
/// errors. Nothing propagates; a bad request leaves the loaded classifier
/// untouched.
pub async fn predire(State(state): State<AppState>, body: Bytes) -> Response {
    let _timer = metrics::timer_request();

    // The body is taken raw so a missing or syntactically broken payload can
    // be reported with the contract's fixed message.
    let value = match serde_json::from_slice::<Value>(&body) {
        Ok(v) if !json_is_falsy(&v) => v,
        _ => {
            debug!("Prediction request without a JSON body");
            metrics::inc_prediction_errors();
            return erreur_response(json!(NO_JSON_MESSAGE));
        }
    };

    let record = match PatientRecord::from_value(&value) {
        Ok(record) => record,
        Err(field_errors) => {
            debug!("Validation rejected {} field(s)", field_errors.len());
            metrics::inc_validation_failures();
            return erreur_response(json!(field_errors));
        }
    };

    let features = record.to_features();

    let outcome = {
        let _inference = metrics::timer_inference();
        state.classifier.predict(&features).and_then(|label| {
            state
                .classifier
                .predict_proba(&features)
                .map(|probability| (label, probability))
        })
    };

    match outcome {
        Ok((label, probability)) => {
            metrics::inc_predictions();
            Json(PredictionResult::new(label, probability)).into_response()
        }
        Err(e) => {
            warn!("Classifier invocation failed: {}", e);
            metrics::inc_prediction_errors();
            erreur_response(json!(e.to_string()))
        }
    }
}

/// Whether a decoded JSON document counts as "no JSON".
///
/// Falsy documents (`null`, `false`, `0`, `""`, `[]`, `{}`) are treated the
/// same as an absent body, so an empty form submission gets the fixed
/// message rather than eight per-field failures.
fn json_is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Build the 400 response carrying a structured `erreur` payload.
fn erreur_response(erreur: Value) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "erreur": erreur }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MockClassifier;

    #[test]
    fn app_state_ready_toggle() {
        let state = AppState::new(Arc::new(MockClassifier::new()));
        assert!(!state.is_ready());

        state.set_ready(true);
        assert!(state.is_ready());

        state.set_ready(false);
        assert!(!state.is_ready());
    }

    #[test]
    fn falsy_json_documents_count_as_no_json() {
        for falsy in [
            json!(null),
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!([]),
            json!({}),
        ] {
            assert!(json_is_falsy(&falsy), "{falsy} should be falsy");
        }

        for truthy in [json!(true), json!(1), json!("x"), json!([0]), json!({"a": 0})] {
            assert!(!json_is_falsy(&truthy), "{truthy} should not be falsy");
        }
    }

    #[test]
    fn welcome_message_matches_contract() {
        assert_eq!(WELCOME_MESSAGE, "Bienvenue sur l'API de prédiction de diabète");
        assert_eq!(NO_JSON_MESSAGE, "Aucun JSON fourni");
    }
}

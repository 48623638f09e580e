//! Diabetes risk prediction service.
//!
//! A stateless HTTP service that accepts clinical measurements for a single
//! patient, runs them through a pre-trained binary classifier, and returns a
//! label plus the estimated probability of diabetes.
//!
//! # Contract
//!
//! ```text
//! POST /predire
//! {"Pregnancies": 2, "Glucose": 130, ..., "Age": 45}
//! ─────────────────────
//! 200 {"prediction": 1, "probabilite_diabete": 0.78}
//! 400 {"erreur": "Aucun JSON fourni"}             (empty or non-JSON body)
//! 400 {"erreur": [{"champ": ..., "raison": ...}]} (validation failures)
//! ```
//!
//! The classifier is loaded once at startup and shared read-only across
//! request handlers; a bad request never crashes or reloads it.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`record`]: Patient record validation and prediction result
//! - [`model`]: Classifier trait, ONNX backend, test mock
//! - [`api`]: HTTP API (welcome, prediction, health, metrics)
//! - [`client`]: HTTP client for calling the service
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod record;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};

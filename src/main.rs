//! Diabetes prediction service entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use diabete_api::api::{create_router, AppState};
use diabete_api::client::{label_text, probability_percent, PredictionClient};
use diabete_api::config::Config;
use diabete_api::metrics;
use diabete_api::model::{load_classifier, Classifier, OnnxClassifier};
use diabete_api::record::PatientRecord;
use diabete_api::utils::shutdown_signal;

/// Diabetes risk prediction service.
#[derive(Parser, Debug)]
#[command(name = "diabete-api")]
#[command(about = "HTTP prediction service for diabetes risk, plus a CLI client")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the prediction service (default).
    Serve {
        /// HTTP server port.
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the model artifact.
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Load the model artifact and run a sample record through it.
    CheckModel {
        /// Path to the model artifact.
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Submit a record to a running service and print the result.
    Predict {
        /// Service base URL (defaults to API_URL).
        #[arg(long)]
        url: Option<String>,

        /// Number of pregnancies.
        #[arg(long)]
        pregnancies: f64,

        /// Plasma glucose concentration (mg/dL).
        #[arg(long)]
        glucose: f64,

        /// Diastolic blood pressure (mm Hg).
        #[arg(long)]
        blood_pressure: f64,

        /// Triceps skin fold thickness (mm).
        #[arg(long)]
        skin_thickness: f64,

        /// Serum insulin (µU/mL).
        #[arg(long)]
        insulin: f64,

        /// Body mass index.
        #[arg(long)]
        bmi: f64,

        /// Diabetes pedigree function.
        #[arg(long)]
        diabetes_pedigree_function: f64,

        /// Age in years.
        #[arg(long)]
        age: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("diabete_api=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::CheckModel { model }) => cmd_check_model(model).await,
        Some(Command::Serve { port, model }) => cmd_serve(port, model).await,
        Some(Command::Predict {
            url,
            pregnancies,
            glucose,
            blood_pressure,
            skin_thickness,
            insulin,
            bmi,
            diabetes_pedigree_function,
            age,
        }) => {
            let record = PatientRecord {
                pregnancies,
                glucose,
                blood_pressure,
                skin_thickness,
                insulin,
                bmi,
                diabetes_pedigree_function,
                age,
            };
            cmd_predict(url, record).await
        }
        None => cmd_serve(None, None).await,
    }
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("DIABETES PREDICTION SERVICE - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Bind Address: {}", config.bind_addr());
    println!("  Model Path: {}", config.model_path);
    println!("  API URL (client): {}", config.api_url);
    println!("  HTTP Timeout: {}ms", config.http_timeout_ms);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Load the model artifact and run the sample record through it.
async fn cmd_check_model(model_override: Option<String>) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("DIABETES PREDICTION SERVICE - MODEL CHECK");
    println!("======================================================================");

    let mut config = Config::load()?;
    if let Some(model) = model_override {
        config.model_path = model;
    }
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    print!("\n1. Loading model from {}... ", config.model_path);
    let classifier = match OnnxClassifier::load(&config.model_path) {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("   Error: {}", e);
            return Err(anyhow::anyhow!("Model load failed"));
        }
    };

    print!("\n2. Running sample record... ");
    let features = PatientRecord::sample().to_features();
    match classifier
        .predict(&features)
        .and_then(|label| classifier.predict_proba(&features).map(|p| (label, p)))
    {
        Ok((label, probability)) => {
            println!("OK");
            println!("   Prediction: {} ({})", label, label_text(label));
            println!("   Probability: {:.2}%", probability_percent(probability));
        }
        Err(e) => {
            println!("FAILED");
            println!("   Error: {}", e);
            return Err(anyhow::anyhow!("Model invocation failed"));
        }
    }

    println!("\n======================================================================");
    println!("MODEL CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Run the prediction service.
async fn cmd_serve(port_override: Option<u16>, model_override: Option<String>) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }
    if let Some(model) = model_override {
        config.model_path = model;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    // Load the classifier once; it is shared read-only for the process
    // lifetime.
    let classifier = load_classifier(&config)?;
    info!("Classifier loaded from {}", config.model_path);

    // Initialize metrics
    let prometheus = PrometheusBuilder::new().install_recorder()?;
    metrics::init_metrics();

    // Create app state
    let app_state = AppState::new(classifier).with_metrics(prometheus);

    // Start HTTP server
    let addr: SocketAddr = config.bind_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    app_state.set_ready(true);
    let router = create_router(app_state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Submit a record to a running service and print the result.
async fn cmd_predict(url_override: Option<String>, record: PatientRecord) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(url) = url_override {
        config.api_url = url;
    }
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    let client = PredictionClient::from_config(&config)?;

    println!("======================================================================");
    println!("DIABETES PREDICTION");
    println!("======================================================================");
    println!("Service: {}", client.base_url());

    match client.predict(&record).await {
        Ok(result) => {
            println!("----------------------------------------------------------------------");
            println!("  Prédiction: {}", label_text(result.prediction));
            println!(
                "  Probabilité estimée: {:.2}%",
                probability_percent(result.probabilite_diabete)
            );
            println!("======================================================================");
            Ok(())
        }
        Err(e) => {
            println!("----------------------------------------------------------------------");
            println!("  Erreur lors de l'appel à l'API: {}", e);
            println!("======================================================================");
            Err(anyhow::anyhow!("Prediction request failed"))
        }
    }
}

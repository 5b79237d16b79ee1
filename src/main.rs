use axum::extract::Extension;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use claims_triage::config::AppConfig;
use claims_triage::dss::claims::domain::Claim;
use claims_triage::dss::scoring::{scoring_router, ScoringService};
use claims_triage::error::AppError;
use claims_triage::telemetry;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Claims Triage Service",
    about = "Score land-rights claims so reviewers can order casework",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score claims from a JSON file and print the results
    Score(ScoreArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Path to a claim object or a `{"claims": [...]}` document
    file: PathBuf,
    /// Score with the trained classifier instead of the rule trail
    #[arg(long)]
    model: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    match cli.command.unwrap_or_else(|| Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => serve(args).await,
        Command::Score(args) => score_file(args),
    }
}

async fn serve(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness.clone(),
        metrics: prometheus_handle,
    };

    let service = Arc::new(ScoringService::new(
        config.scoring.model_path.clone(),
        config.scoring.dataset_size,
    ));

    let app = scoring_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness.store(true, Ordering::Release);

    info!(?config.environment, %addr, "claims triage service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn score_file(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = ScoringService::new(
        config.scoring.model_path.clone(),
        config.scoring.dataset_size,
    );

    let raw = std::fs::read_to_string(&args.file)?;
    let body: Value = serde_json::from_str(&raw)?;

    let output = if body.get("claims").map_or(false, Value::is_array) {
        let claims: Vec<Claim> = body
            .get("claims")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().map(Claim::from_value).collect())
            .unwrap_or_default();
        if args.model {
            serde_json::to_value(service.score_batch_model(&claims))?
        } else {
            serde_json::to_value(service.score_batch_rules(&claims))?
        }
    } else {
        let claim = Claim::from_value(&body);
        if args.model {
            json!({ "input": claim, "result": service.score_model(&claim) })
        } else {
            json!({ "input": claim, "result": service.score_rules(&claim) })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
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

async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

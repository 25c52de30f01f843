use anyhow::Context;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use workflow_payroll::api::{AppState, create_router};
use workflow_payroll::config::ConfigLoader;
use workflow_payroll::service::PayrollService;
use workflow_payroll::storage::Database;

const DEFAULT_CONFIG_PATH: &str = "./config/payroll.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "workflow_payroll=debug,tower_http=info,sqlx=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config_path =
        std::env::var("PAYROLL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut loader = match ConfigLoader::load(&config_path) {
        Ok(loader) => loader,
        Err(workflow_payroll::error::PayrollError::ConfigNotFound { path }) => {
            tracing::warn!(%path, "Config file not found; using defaults");
            ConfigLoader::default()
        }
        Err(e) => return Err(e).context("loading configuration"),
    };
    loader
        .apply_env_overrides()
        .context("applying environment overrides")?;
    let policy = loader.deduction_policy()?;
    let config = loader.into_config();

    let db = Database::connect(&config.database)
        .await
        .context("opening database")?;
    db.migrate().await.context("running migrations")?;

    let state = AppState::new(PayrollService::new(&db, policy));

    let app = create_router(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms = latency.as_millis(), "response");
                        } else {
                            tracing::info!(%status, latency_ms = latency.as_millis(), "response");
                        }
                    },
                ),
        );

    let listener = config
        .server
        .bind()
        .await
        .with_context(|| format!("binding {}", config.server.bind_address()))?;

    info!(
        addr = %listener.local_addr()?,
        deduction_rate = %policy.rate(),
        "Payroll service listening"
    );
    axum::serve(listener, app).await?;

    Ok(())
}

use std::env;

use tracing_subscriber::EnvFilter;

use clbp_server::app;
use clbp_server::config;
use clbp_server::state::AppState;
use clbp_storage::store::DocumentStore;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let lookup = |name: &str| env::var(name).ok();

    let config_path = config::config_path(lookup);
    let mut cfg = config::load_config(&config_path)?;
    config::apply_env_overrides(&mut cfg, lookup)?;

    init_tracing(cfg.log_json);
    tracing::info!(
        path = %config_path.display(),
        backend = cfg.store.backend_name(),
        "configuration loaded"
    );
    if !cfg.has_secret() {
        tracing::warn!("no jwt_secret configured; falling back to a development secret");
    }

    let store = DocumentStore::open(&cfg.store).await?;
    app::seed_settings(&store).await?;

    let port = cfg.port;
    let router = app::router(AppState::new(store, cfg, config_path));

    if env::var_os("AWS_LAMBDA_RUNTIME_API").is_some() {
        tracing::info!("serving through the Lambda runtime");
        return lambda_http::run(router).await.map_err(|e| eyre::eyre!(e));
    }

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        // Structured JSON logging for CloudWatch
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

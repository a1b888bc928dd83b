use anyhow::{Context, Result};
use gh_client::OctocrabClient;
use gh_dead_code_config::{AppConfig, Credentials};
use gh_dead_code_engine::{AnalyzerSettings, GitHubAnalyzer};
use gh_dead_code_server::{
    logger, router, AnalysisInvoker, AppState, BranchNamer, PrWorkflowDriver, WorkflowSettings,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    let env_file = gh_dead_code_config::load_env_file();
    logger::init();
    log::info!("Starting gh-dead-code {}", env!("CARGO_PKG_VERSION"));
    match env_file {
        Some(path) => log::debug!("Loaded .env file from: {:?}", path),
        None => log::debug!(".env file not found, will rely on environment variables"),
    }

    let config = AppConfig::load();
    let credentials = Credentials::load(config.enterprise_host()).await?;

    let client = OctocrabClient::connect(
        config.enterprise_host(),
        credentials.token.clone(),
        config.request_timeout(),
    )
    .with_context(|| format!("Failed to create GitHub client for {}", config.github_host))?;

    let analyzer = GitHubAnalyzer::new(
        client.clone(),
        AnalyzerSettings {
            max_file_size: config.analysis.max_file_size,
            skip_tests: config.analysis.skip_tests,
            extra_ignore_patterns: config.analysis.extra_ignore_patterns.clone(),
        },
    );
    let driver = PrWorkflowDriver::new(
        Arc::new(client),
        BranchNamer::new(config.branch_prefix.clone()),
        WorkflowSettings {
            pull_request_title: config.pull_request_title.clone(),
            commit_author: credentials.commit_author.clone(),
        },
    );

    let app = router(AppState {
        invoker: AnalysisInvoker::new(Arc::new(analyzer)),
        driver: Arc::new(driver),
        github_host: config.github_host.clone(),
    });

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    log::info!("Listening on {} (GitHub host: {})", addr, config.github_host);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    log::info!("Exiting gh-dead-code");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

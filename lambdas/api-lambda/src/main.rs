use std::env;
use std::sync::Arc;

use lambda_http::{run, service_fn, Error};
use rollcall_api_lambda::{function_handler, local};
use rollcall_shared::{logging, AppState, Config};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;
    logging::init(&config);

    for (name, value) in [
        ("DATABASE_URL", &config.database_url),
        ("REDIS_URL", &config.redis_url),
        ("JWT_SECRET", &config.jwt_secret),
    ] {
        if value.is_some() {
            tracing::debug!("{} is set but not used yet", name);
        }
    }

    let state = Arc::new(AppState::new(&config));

    if env::var_os("AWS_LAMBDA_RUNTIME_API").is_some() {
        tracing::info!("Starting rollcall API on the Lambda runtime (env: {})", config.app_env);
        return run(service_fn(move |event| {
            function_handler(event, Arc::clone(&state))
        }))
        .await;
    }

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(
        "Starting rollcall API server on port {} (env: {})",
        config.port,
        config.app_env
    );
    local::serve(listener, state, shutdown_signal()).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

use crate::config::ServerConfig;
use crate::error::Result;
use axum::{routing::get, Router};
use cine_app::state::{AppConfig, AppState};
use tracing::{debug, info};

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = build_state(&args).await?;
    run_with_state(args, state).await
}

pub async fn run_with_state(args: ServerConfig, state: AppState) -> Result<()> {
    run_graceful_with_state(args, state, shutdown_signal()).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let mut app = main_router(state);

    if args.cors {
        app = app.layer(tower_http::cors::CorsLayer::very_permissive());
    }

    let ip: std::net::IpAddr = args.listen_address.parse()?;
    let addr = std::net::SocketAddr::from((ip, args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, env = %args.env, base_url = %args.base_url, "starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!(addr = %addr, "stopped server");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!("Cannot listen for SIGTERM: {e}");
                let _ = tokio::signal::ctrl_c().await;
                info!(signal = "SIGINT", "caught signal");
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!(signal = "SIGINT", "caught signal"),
            _ = terminate.recv() => info!(signal = "SIGTERM", "caught signal"),
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!(signal = "SIGINT", "caught signal");
    }
}

pub fn main_router(state: AppState) -> Router<()> {
    Router::new()
        .nest("/v1/movies", cine_app::rest_api::movie::router())
        .route("/v1/healthcheck", get(cine_app::health::healthcheck))
        .fallback(cine_app::rest_api::not_found)
        .with_state(state)
}

pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let app_config = AppConfig {
        environment: config.env,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    if config.database_url.is_none() {
        let data_dir = config.data_dir();
        if !data_dir.is_dir() {
            tokio::fs::create_dir_all(&data_dir).await?;
            info!("Created data directory {}", data_dir.display());
        }
    }

    let database_url = config.database_url();
    let pool = cine_dal::new_pool(&database_url, &config.pool_settings()).await?;
    cine_dal::migrate(&pool).await?;
    debug!("Database {database_url} migrated");

    Ok(AppState::new(app_config, pool))
}

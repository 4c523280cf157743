mod args;
mod config;
mod dirs;

use std::io;
use std::net::SocketAddr;

use app_api::AppContext;
use http_api::HttpState;
use tracing_subscriber::{EnvFilter, fmt};
use units_app::{AppPaths, AppState, TrackerConfig, ensure_app_data_dir};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = args::parse_args().map_err(|err| {
        eprintln!("{err}");
        args::print_help();
        io::Error::new(io::ErrorKind::InvalidInput, "invalid arguments")
    })?;

    let filter = EnvFilter::try_new(&args.log_level).map_err(|err| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid log level {}: {}", args.log_level, err),
        )
    })?;
    fmt().with_env_filter(filter).with_target(true).init();

    let config = config::load_or_create(args.config.as_deref()).map_err(io::Error::other)?;
    if config.created {
        tracing::info!(
            path = %config.paths.file.display(),
            port = config.config.port,
            "created default config"
        );
    }

    let port = config::resolve_port(
        args.port,
        std::env::var(config::PORT_ENV).ok().as_deref(),
        &config.config,
    )
    .map_err(io::Error::other)?;

    let data_dir = dirs::resolve_data_dir(config.config.data_dir.clone()).map_err(io::Error::other)?;
    tracing::info!(
        dir = %data_dir.dir.display(),
        existing = data_dir.matched_existing,
        "using data dir"
    );

    let paths = AppPaths::new(data_dir.dir.clone());
    ensure_app_data_dir(&paths).map_err(|err| io::Error::other(err.to_string()))?;

    let tracker_config = TrackerConfig {
        calendar_name: config.config.calendar_name.clone(),
        unknown_default: config.config.unknown_default,
        weekly_guideline: config.config.weekly_guideline,
        events_file: args.events_file.or(config.config.events_file.clone()),
        ..TrackerConfig::new(paths.db_path.clone())
    };
    let app_state = AppState::from_config(tracker_config);
    if let Err(err) = app_state.initialize() {
        return Err(io::Error::other(format!("failed to initialize database: {}", err)).into());
    }

    let collect_state = app_state.clone();
    tokio::task::spawn_blocking(move || match collect_state.services.collect.run(None) {
        Ok(outcome) => tracing::info!(
            stored = outcome.records_stored(),
            "startup collection finished"
        ),
        Err(err) if err.is_no_data() => {}
        Err(err) => tracing::warn!(error = %err, "startup collection failed"),
    });

    let context = AppContext {
        app_state,
        app_data_dir: data_dir.dir,
    };
    let router = http_api::router(HttpState::new(context));

    let (listener, actual_port, used_fallback) = bind_port(port).await?;
    if used_fallback {
        tracing::warn!(
            configured = port,
            actual = actual_port,
            "configured port was unavailable"
        );
    }
    tracing::info!(url = %format!("http://127.0.0.1:{actual_port}"), "units tracker is running");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

async fn bind_port(port: u16) -> Result<(tokio::net::TcpListener, u16, bool), io::Error> {
    if port == 0 {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let actual_port = listener.local_addr()?.port();
        return Ok((listener, actual_port, false));
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => Ok((listener, port, false)),
        Err(_) => {
            let listener =
                tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
            let actual_port = listener.local_addr()?.port();
            Ok((listener, actual_port, true))
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

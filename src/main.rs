use std::{process, sync::Arc};

use clap::Parser;
use foglio::{
    application::{error::AppError, posts::PostService, repos::PostsRepo},
    config::{self, CliArgs, Settings},
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminGate, HttpState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let cli = CliArgs::parse();
    let settings = config::load(&cli)
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging)?;

    serve(settings).await
}

async fn serve(settings: Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let gate = build_admin_gate(&settings)?;

    let posts_repo: Arc<dyn PostsRepo> = Arc::new(repositories);
    let posts = Arc::new(PostService::new(posts_repo));

    let state = HttpState {
        posts,
        site_title: settings.site.title.clone(),
    };
    let router = http::build_router(state, gate);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::bind(settings.server.addr, err)))?;

    info!(
        target = "foglio::server",
        addr = %settings.server.addr,
        graceful_shutdown_secs = settings.server.graceful_shutdown.as_secs(),
        "listening",
    );

    // The signal starts the drain; the configured window bounds it. When
    // open connections outlive the window the server is dropped with them
    // still in flight.
    let grace = settings.server.graceful_shutdown;
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let mut drain_rx = shutdown_rx.clone();
    let mut signal_rx = shutdown_rx;
    let server = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = signal_rx.changed().await;
        });

    tokio::select! {
        result = server => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = async {
            let _ = drain_rx.changed().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(
                target = "foglio::server",
                grace_secs = grace.as_secs(),
                "graceful shutdown window elapsed; dropping remaining connections",
            );
        }
    }

    Ok(())
}

async fn init_repositories(settings: &Settings) -> Result<PostgresRepositories, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool =
        PostgresRepositories::connect(database_url, settings.database.max_connections.get())
            .await
            .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(PostgresRepositories::new(pool))
}

fn build_admin_gate(settings: &Settings) -> Result<AdminGate, AppError> {
    let token = settings
        .admin
        .token
        .as_deref()
        .ok_or_else(|| InfraError::configuration("admin token is not configured"))
        .map_err(AppError::from)?;

    Ok(AdminGate::new(token, settings.admin.login_url.as_str()))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => error!(error = %err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!(target = "foglio::server", "shutdown signal received");
}

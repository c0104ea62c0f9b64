use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &calendar_service::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    // Starting: the one-time initial connection. A failure here is fatal.
    let db = calendar_service::Database::new();
    if let Err(e) = db.establish().await {
        error!(error = %e, "error connecting to the database");
        return Err(e.into());
    }

    let state = calendar_service::router::CalendarState::new(db.clone());
    let app = calendar_service::router::calendar_router(state);

    let listener = TcpListener::bind(cfg.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);

    // Running: requests are served on a spawned task while this task blocks
    // on the signal wait. The serve task drains in-flight connections once
    // the shutdown trigger is released.
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    calendar_service::server::shutdown_signal().await;

    // ShuttingDown: close the database first, then release the listener.
    info!("shutting down successfully");
    db.teardown().await;
    let _ = shutdown_tx.send(());
    server.await??;

    Ok(())
}

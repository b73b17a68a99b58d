//! Team Poach Back binary entrypoint wiring the REST surface to a storage backend.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use team_poach_back::{
    config::AppConfig,
    dao::roster_store::memory::MemoryRosterStore,
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let admin_token = env::var("ADMIN_TOKEN").ok();
    if admin_token.is_none() {
        warn!("ADMIN_TOKEN not set; admin endpoints will reject every request");
    }

    let app_state = AppState::new(config, admin_token);
    install_storage_backend(app_state.clone()).await?;

    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Pick the storage backend from `STORE_BACKEND` and wire it into the state.
///
/// The in-memory backend is installed synchronously; the database backends
/// are handed to the storage supervisor, which connects in the background
/// and toggles degraded mode as connectivity changes.
async fn install_storage_backend(state: SharedState) -> anyhow::Result<()> {
    let backend = env::var("STORE_BACKEND").unwrap_or_else(|_| "memory".into());

    match backend.as_str() {
        "memory" => {
            info!("using in-memory storage backend (state is lost on restart)");
            state
                .set_roster_store(Arc::new(MemoryRosterStore::new()))
                .await;
        }
        #[cfg(feature = "mongo-store")]
        "mongo" => {
            use team_poach_back::{
                dao::roster_store::{
                    RosterStore,
                    mongodb::{MongoRosterStore, config::MongoConfig},
                },
                services::storage_supervisor,
            };

            info!("using MongoDB storage backend");
            tokio::spawn(storage_supervisor::run(state, || async {
                let config = MongoConfig::from_env().await?;
                let store = MongoRosterStore::connect(config).await?;
                Ok(Arc::new(store) as Arc<dyn RosterStore>)
            }));
        }
        #[cfg(feature = "couch-store")]
        "couch" => {
            use team_poach_back::{
                dao::roster_store::{
                    RosterStore,
                    couchdb::{CouchRosterStore, config::CouchConfig},
                },
                services::storage_supervisor,
            };

            info!("using CouchDB storage backend");
            tokio::spawn(storage_supervisor::run(state, || async {
                let config = CouchConfig::from_env()?;
                let store = CouchRosterStore::connect(config).await?;
                Ok(Arc::new(store) as Arc<dyn RosterStore>)
            }));
        }
        other => anyhow::bail!(
            "unsupported STORE_BACKEND `{other}` (expected memory, mongo, or couch)"
        ),
    }

    Ok(())
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

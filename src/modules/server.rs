use axum::{routing::get, Router};
use std::{io, sync::Arc};
use tokio::{net::TcpListener, task::JoinHandle};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use super::config::ImportSpec;
use super::importer::{import_all, ImportSummary};
use super::store::RemoteStore;

pub const READY_MESSAGE: &str = "🟢 Server is running!";

pub fn router() -> Router {
    Router::new()
        .route("/", get(ready))
        .layer(TraceLayer::new_for_http())
}

async fn ready() -> &'static str {
    READY_MESSAGE
}

// the import run fired once the listener is up; its result is only logged
pub struct StartupImport {
    store: Arc<dyn RemoteStore>,
    specs: Vec<ImportSpec>,
}

impl StartupImport {
    pub fn new(store: Arc<dyn RemoteStore>, specs: Vec<ImportSpec>) -> StartupImport {
        StartupImport { store, specs }
    }

    pub fn spawn(self) -> JoinHandle<Option<ImportSummary>> {
        let StartupImport { store, specs } = self;

        tokio::spawn(async move {
            match import_all(store.as_ref(), &specs).await {
                Ok(summary) => {
                    info!("Initial CSV import done!");
                    Some(summary)
                }
                Err(err) => {
                    error!("Error during initial CSV import: {}", err);
                    None
                }
            }
        })
    }
}

pub async fn run(port: u16, startup_import: Option<StartupImport>) -> io::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    serve(listener, startup_import).await
}

// serve until the process ends; a failed import never stops serving
pub async fn serve(listener: TcpListener, startup_import: Option<StartupImport>) -> io::Result<()> {
    let address = listener.local_addr()?;
    info!("Server running at http://localhost:{}", address.port());

    if let Some(import) = startup_import {
        import.spawn();
    }

    axum::serve(listener, router()).await
}

//! Server wiring for the MCP (stdio) and REST (HTTP) surfaces.
//!
//! Provides [`serve_stdio`] and [`serve_http`] entry points that wire up the
//! database, optional embedding provider, and the surface-specific handlers
//! into a running server.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use rmcp::ServiceExt;

use crate::config::DossierConfig;
use crate::db;
use crate::embedding;
use crate::http::{self, AppState};
use crate::tools::DossierTools;

/// Shared setup: open DB, create the embedding provider, record the model.
/// Returns (db, embedding, config) wrapped in Arc for sharing.
fn setup_shared_state(
    config: DossierConfig,
) -> Result<(
    Arc<Mutex<rusqlite::Connection>>,
    Option<Arc<dyn embedding::EmbeddingProvider>>,
    Arc<DossierConfig>,
)> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), project = %config.storage.default_project, "database ready");

    let provider = embedding::create_provider(&config.embedding)?;
    let provider: Option<Arc<dyn embedding::EmbeddingProvider>> =
        provider.map(|p| Arc::from(p));

    if provider.is_some() {
        // Vectors written under a different model only refresh on their next write
        match db::migrations::stored_embedding_model(&conn)? {
            Some(stored) if stored != config.embedding.model => {
                tracing::warn!(
                    stored = %stored,
                    configured = %config.embedding.model,
                    "embedding model changed — existing vectors refresh when their context is next written"
                );
                db::migrations::set_embedding_model(&conn, &config.embedding.model)?;
            }
            Some(_) => {}
            None => db::migrations::set_embedding_model(&conn, &config.embedding.model)?,
        }
        tracing::info!("embedding provider ready");
    } else {
        tracing::info!("vector search disabled");
    }

    Ok((Arc::new(Mutex::new(conn)), provider, Arc::new(config)))
}

/// Start the MCP server over stdio transport.
pub async fn serve_stdio(config: DossierConfig) -> Result<()> {
    tracing::info!("starting dossier MCP server on stdio");

    let (db, embedding, config) = setup_shared_state(config)?;

    let tools = DossierTools::new(db, embedding, config);
    let transport = rmcp::transport::stdio();

    let server = tools.serve(transport).await?;
    tracing::info!("MCP server ready, waiting for a client");

    server.waiting().await?;
    tracing::info!("MCP client disconnected, exiting");

    Ok(())
}

/// Start the REST API server.
pub async fn serve_http(config: DossierConfig) -> Result<()> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let bind_addr = format!("{host}:{port}");

    tracing::info!(addr = %bind_addr, "starting dossier REST API");

    let (db, embedding, config) = setup_shared_state(config)?;

    let router = http::router(AppState {
        db,
        embedding,
        config,
    });

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "REST API listening at http://{bind_addr}/contexts");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to listen for ctrl-c");
            tracing::info!("shutting down REST API");
        })
        .await?;

    Ok(())
}

pub mod context_stats;
pub mod delete_context;
pub mod get_context;
pub mod list_contexts;
pub mod search_context;
pub mod store_context;

use context_stats::ContextStatsParams;
use delete_context::DeleteContextParams;
use get_context::{GetContextParams, GetContextResponse};
use list_contexts::{ContextListing, ListContextsParams, ListContextsResponse};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use rusqlite::Connection;
use search_context::{SearchContextParams, SearchContextResponse};
use std::sync::{Arc, Mutex};
use store_context::StoreContextParams;

use crate::config::DossierConfig;
use crate::context::instructions::instruction_for;
use crate::context::summary::preview;
use crate::context::types::{ContextError, Priority};
use crate::context::{delete, query, search, stats, store};
use crate::embedding::{embed_degraded, EmbeddingProvider};

/// The dossier MCP tool handler. Holds shared state (db connection, optional
/// embedding provider, config) and exposes all MCP tools via the
/// `#[tool_router]` macro. The project namespace comes from configuration,
/// not from the caller.
#[derive(Clone)]
pub struct DossierTools {
    tool_router: ToolRouter<Self>,
    db: Arc<Mutex<Connection>>,
    embedding: Option<Arc<dyn EmbeddingProvider>>,
    config: Arc<DossierConfig>,
}

impl DossierTools {
    fn project(&self) -> String {
        self.config.storage.default_project.clone()
    }

    /// Run a repository operation against the locked connection on the
    /// blocking pool. The inner result keeps its typed error so callers can
    /// distinguish a miss from a failure.
    async fn with_conn<T, E, F>(&self, f: F) -> Result<Result<T, E>, String>
    where
        T: Send + 'static,
        E: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, E> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let mut conn = db.lock().map_err(|e| format!("db lock poisoned: {e}"))?;
            Ok(f(&mut conn))
        })
        .await
        .map_err(|e| format!("db task failed: {e}"))?
    }
}

#[tool_router]
impl DossierTools {
    pub fn new(
        db: Arc<Mutex<Connection>>,
        embedding: Option<Arc<dyn EmbeddingProvider>>,
        config: Arc<DossierConfig>,
    ) -> Self {
        Self {
            tool_router: Self::tool_router(),
            db,
            embedding,
            config,
        }
    }

    /// Store context from the current session for later retrieval.
    #[tool(description = "Store a context note under a key for later retrieval. Captures architecture decisions, code patterns, TODOs, or anything worth keeping between sessions. Storing to an existing key replaces it.")]
    async fn store_context(
        &self,
        Parameters(params): Parameters<StoreContextParams>,
    ) -> Result<String, String> {
        let priority = match params.priority.as_deref() {
            Some(raw) => raw.parse::<Priority>().map_err(|e: String| e)?,
            None => Priority::default(),
        };
        let tags = params.tags.unwrap_or_default();
        let project = self.project();

        tracing::info!(
            key = %params.key,
            content_len = params.content.len(),
            priority = %priority,
            project = %project,
            "store_context called"
        );

        let embedding = embed_degraded(self.embedding.clone(), &params.content).await;

        let key = params.key;
        let content = params.content;
        let result = self
            .with_conn(move |conn| {
                store::put_context(
                    conn,
                    &project,
                    &key,
                    &content,
                    &tags,
                    priority,
                    embedding.as_deref(),
                )
            })
            .await?
            .map_err(|e| format!("store failed: {e}"))?;

        tracing::info!(
            key = %result.context.key,
            created = result.created,
            "context stored"
        );

        serde_json::to_string(&result).map_err(|e| format!("serialization failed: {e}"))
    }

    /// Retrieve previously stored context by its key.
    #[tool(description = "Retrieve a stored context by key, with a usage directive derived from its tags and priority.")]
    async fn get_context(
        &self,
        Parameters(params): Parameters<GetContextParams>,
    ) -> Result<String, String> {
        let project = self.project();
        tracing::info!(key = %params.key, project = %project, "get_context called");

        let key = params.key;
        let result = self
            .with_conn(move |conn| query::get_context(conn, &project, &key))
            .await?;

        let context = match result {
            Ok(context) => context,
            Err(ContextError::NotFound { key, .. }) => {
                return Ok(serde_json::json!({
                    "found": false,
                    "error": format!("no context found with key '{key}'"),
                    "suggestion": "Use list_contexts to see available keys"
                })
                .to_string());
            }
            Err(e) => return Err(format!("get failed: {e}")),
        };

        let instruction = params
            .include_instructions
            .unwrap_or(true)
            .then(|| instruction_for(&context.tags, context.priority));

        let response = GetContextResponse {
            found: true,
            context,
            instruction,
        };
        serde_json::to_string(&response).map_err(|e| format!("serialization failed: {e}"))
    }

    /// List available contexts, optionally filtered by tag.
    #[tool(description = "List stored contexts for the current project, newest first, optionally filtered by an exact tag.")]
    async fn list_contexts(
        &self,
        Parameters(params): Parameters<ListContextsParams>,
    ) -> Result<String, String> {
        let project = self.project();
        let limit = params.limit.unwrap_or(self.config.retrieval.list_limit);
        // Blank filters mean "no filter" (clients sometimes send empty strings)
        let tag = params
            .tag
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        tracing::info!(project = %project, tag = ?tag, limit, "list_contexts called");

        let tag_for_query = tag.clone();
        let contexts = self
            .with_conn(move |conn| {
                query::list_contexts(conn, &project, tag_for_query.as_deref())
            })
            .await?
            .map_err(|e| format!("list failed: {e}"))?;

        let contexts: Vec<ContextListing> = contexts
            .into_iter()
            .take(limit)
            .map(|c| ContextListing {
                key: c.key,
                summary: c.summary.unwrap_or_else(|| preview(&c.content, 100)),
                tags: c.tags,
                priority: c.priority,
                updated_at: c.updated_at,
            })
            .collect();

        let response = ListContextsResponse {
            count: contexts.len(),
            contexts,
            tag,
        };
        serde_json::to_string(&response).map_err(|e| format!("serialization failed: {e}"))
    }

    /// Delete a context by its key.
    #[tool(description = "Delete a stored context that is no longer relevant.")]
    async fn delete_context(
        &self,
        Parameters(params): Parameters<DeleteContextParams>,
    ) -> Result<String, String> {
        let project = self.project();
        tracing::info!(key = %params.key, project = %project, "delete_context called");

        let key = params.key.clone();
        let deleted = self
            .with_conn(move |conn| delete::delete_context(conn, &project, &key))
            .await?
            .map_err(|e| format!("delete failed: {e}"))?;

        let message = if deleted {
            format!("context '{}' deleted", params.key)
        } else {
            format!("no context found with key '{}'", params.key)
        };
        Ok(serde_json::json!({ "deleted": deleted, "message": message }).to_string())
    }

    /// Search contexts by meaning rather than key.
    #[tool(description = "Semantic search over stored contexts. Returns the closest matches by embedding similarity; returns nothing when vector search is disabled.")]
    async fn search_context(
        &self,
        Parameters(params): Parameters<SearchContextParams>,
    ) -> Result<String, String> {
        let project = self.project();
        let k = params
            .max_results
            .unwrap_or(self.config.retrieval.default_max_results);

        tracing::info!(query = %params.query, project = %project, k, "search_context called");

        let Some(query_embedding) = embed_degraded(self.embedding.clone(), &params.query).await
        else {
            // Disabled or unreachable provider: empty result, fall back to list_contexts
            let response = SearchContextResponse {
                count: 0,
                results: Vec::new(),
                message: Some(
                    "vector search unavailable; use list_contexts with a tag filter".into(),
                ),
            };
            return serde_json::to_string(&response)
                .map_err(|e| format!("serialization failed: {e}"));
        };

        let results = self
            .with_conn(move |conn| search::search_contexts(conn, &project, &query_embedding, k))
            .await?
            .map_err(|e| format!("search failed: {e}"))?;

        let response = SearchContextResponse {
            count: results.len(),
            results,
            message: None,
        };
        serde_json::to_string(&response).map_err(|e| format!("serialization failed: {e}"))
    }

    /// Get statistics about the context store.
    #[tool(description = "Context store statistics: totals, counts by priority and tag, embedded count, storage size.")]
    async fn context_stats(
        &self,
        Parameters(params): Parameters<ContextStatsParams>,
    ) -> Result<String, String> {
        let project = (!params.all_projects.unwrap_or(false)).then(|| self.project());
        let db_path = self.config.resolved_db_path();

        tracing::info!(project = ?project, "context_stats called");

        let response = self
            .with_conn(move |conn| {
                stats::context_stats(conn, project.as_deref(), Some(&db_path))
            })
            .await?
            .map_err(|e| format!("stats failed: {e}"))?;

        serde_json::to_string(&response).map_err(|e| format!("serialization failed: {e}"))
    }
}

#[tool_handler]
impl ServerHandler for DossierTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "Dossier is a project-scoped context store. Use store_context to save \
                 notes (decisions, TODOs, patterns), get_context to retrieve them by key, \
                 list_contexts to browse by tag, and search_context to find them by meaning."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

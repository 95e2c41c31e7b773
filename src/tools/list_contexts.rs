use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::context::types::Priority;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListContextsParams {
    #[schemars(
        description = "Optional tag to filter by (e.g. 'todo', 'architecture', 'tech-debt')"
    )]
    pub tag: Option<String>,

    #[schemars(description = "Maximum number of contexts to return. Defaults to 20.")]
    pub limit: Option<usize>,
}

/// One row of a listing: summary-level fields only.
#[derive(Debug, Serialize)]
pub struct ContextListing {
    pub key: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub priority: Priority,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct ListContextsResponse {
    pub count: usize,
    pub contexts: Vec<ContextListing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

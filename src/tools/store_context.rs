use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StoreContextParams {
    #[schemars(
        description = "Unique identifier for this context within the project (e.g. 'auth-pattern', 'todo-refactor-api')"
    )]
    pub key: String,

    #[schemars(description = "The full context text to store")]
    pub content: String,

    #[schemars(
        description = "Tags for categorization (e.g. ['architecture', 'security']). Trimmed and lowercased on write."
    )]
    pub tags: Option<Vec<String>>,

    #[schemars(description = "Priority level: 'low', 'medium', or 'high'. Defaults to medium.")]
    pub priority: Option<String>,
}

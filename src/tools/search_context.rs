use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::context::search::SearchHit;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchContextParams {
    #[schemars(description = "Free-text query to match against stored context content")]
    pub query: String,

    #[schemars(description = "Maximum number of results to return. Defaults to 5.")]
    pub max_results: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchContextResponse {
    pub count: usize,
    pub results: Vec<SearchHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

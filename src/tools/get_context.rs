use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::context::types::Context;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetContextParams {
    #[schemars(description = "The unique identifier of the context to retrieve")]
    pub key: String,

    #[schemars(
        description = "Whether to include a usage directive derived from tags and priority. Defaults to true."
    )]
    pub include_instructions: Option<bool>,
}

/// Successful get response: the context plus its read-time instruction.
#[derive(Debug, Serialize)]
pub struct GetContextResponse {
    pub found: bool,
    #[serde(flatten)]
    pub context: Context,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
}

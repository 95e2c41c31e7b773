use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DeleteContextParams {
    #[schemars(description = "The unique identifier of the context to delete")]
    pub key: String,
}

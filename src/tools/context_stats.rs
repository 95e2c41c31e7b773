use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ContextStatsParams {
    #[schemars(
        description = "When true, report across all projects instead of just the current one"
    )]
    pub all_projects: Option<bool>,
}

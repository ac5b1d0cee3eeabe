use serde::{Deserialize, Serialize};

/// A Core-Based Statistical Area as listed by the jobs API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cbsa {
    #[serde(rename = "cbsa_code")]
    pub code: String,
    #[serde(rename = "cbsa_name")]
    pub name: String,
    #[serde(default)]
    pub total_jobs: u64,
}

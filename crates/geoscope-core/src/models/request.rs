//! Request payloads sent to the analysis service.

use serde::{Deserialize, Serialize};

use super::Platform;

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AnalysisRequest {
    pub query: String,
    pub brand_domain: String,
    #[serde(default)]
    pub competitors: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default = "default_num_queries")]
    pub num_queries: u32,
}

fn default_num_queries() -> u32 {
    10
}

/// Body of `POST /compare`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompareRequest {
    pub query: String,
    pub domains: Vec<String>,
    pub platforms: Vec<Platform>,
}

//! Parameter structures for geoscope operations.
//!
//! These are the raw, interface-agnostic inputs a front end collects from the
//! user. They carry no framework derives; the CLI wraps them with clap
//! arguments and converts with `.into()`. Conversion into wire requests
//! (`TryFrom`) is where form-level validation happens, before any tracker
//! state is touched or any request is issued.
//!
//! ```rust
//! use geoscope_core::{models::Platform, params::AnalysisForm};
//! use geoscope_core::models::AnalysisRequest;
//!
//! let form = AnalysisForm {
//!     query: "best CRM software for small business".to_string(),
//!     brand_domain: "hubspot.com".to_string(),
//!     competitors: "salesforce.com, zoho.com, ,pipedrive.com".to_string(),
//!     platforms: vec![Platform::Chatgpt],
//!     num_queries: 5,
//! };
//! let request = AnalysisRequest::try_from(form).unwrap();
//! assert_eq!(request.competitors, ["salesforce.com", "zoho.com", "pipedrive.com"]);
//! ```

use crate::{
    error::{GeoscopeError, Result},
    models::{AnalysisRequest, CompareRequest, Platform},
};

/// Smallest accepted number of query variations.
pub const MIN_QUERIES: u32 = 1;
/// Largest accepted number of query variations.
pub const MAX_QUERIES: u32 = 10;
/// Query variations used when the user does not choose.
pub const DEFAULT_QUERIES: u32 = 5;

/// Fewest domains a comparison accepts.
pub const MIN_COMPARE_DOMAINS: usize = 2;
/// Most domains a comparison accepts.
pub const MAX_COMPARE_DOMAINS: usize = 5;

/// Largest history page the service returns.
pub const MAX_HISTORY_LIMIT: u32 = 50;

/// Raw analysis form input.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisForm {
    pub query: String,
    pub brand_domain: String,
    /// Comma-separated competitor domains
    pub competitors: String,
    pub platforms: Vec<Platform>,
    pub num_queries: u32,
}

impl TryFrom<AnalysisForm> for AnalysisRequest {
    type Error = GeoscopeError;

    fn try_from(form: AnalysisForm) -> Result<Self> {
        let query = required("query", &form.query)?;
        let brand_domain = required("brand_domain", &form.brand_domain)?;

        if form.platforms.is_empty() {
            return Err(GeoscopeError::invalid_input("platforms")
                .with_reason("Select at least one platform"));
        }

        if !(MIN_QUERIES..=MAX_QUERIES).contains(&form.num_queries) {
            return Err(GeoscopeError::invalid_input("num_queries").with_reason(format!(
                "Must be between {MIN_QUERIES} and {MAX_QUERIES}, got {}",
                form.num_queries
            )));
        }

        Ok(AnalysisRequest {
            query,
            brand_domain,
            competitors: split_domains(&form.competitors),
            platforms: dedup_platforms(form.platforms),
            num_queries: form.num_queries,
        })
    }
}

/// Raw comparison form input.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareForm {
    pub query: String,
    /// Comma-separated domains
    pub domains: String,
    /// Defaults to ChatGPT and Perplexity when empty
    pub platforms: Vec<Platform>,
}

impl TryFrom<CompareForm> for CompareRequest {
    type Error = GeoscopeError;

    fn try_from(form: CompareForm) -> Result<Self> {
        let query = required("query", &form.query)?;
        let domains = split_domains(&form.domains);

        if !(MIN_COMPARE_DOMAINS..=MAX_COMPARE_DOMAINS).contains(&domains.len()) {
            return Err(GeoscopeError::invalid_input("domains").with_reason(format!(
                "Enter {MIN_COMPARE_DOMAINS}-{MAX_COMPARE_DOMAINS} comma-separated domains, got {}",
                domains.len()
            )));
        }

        let platforms = if form.platforms.is_empty() {
            Platform::DEFAULTS.to_vec()
        } else {
            dedup_platforms(form.platforms)
        };

        Ok(CompareRequest {
            query,
            domains,
            platforms,
        })
    }
}

/// History listing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListHistory {
    pub limit: u32,
}

impl ListHistory {
    /// Limit clamped to what the service serves.
    pub fn effective_limit(&self) -> u32 {
        self.limit.clamp(1, MAX_HISTORY_LIMIT)
    }
}

impl Default for ListHistory {
    fn default() -> Self {
        Self { limit: 20 }
    }
}

/// Splits a comma-separated domain list, trimming and dropping empties.
pub fn split_domains(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from)
        .collect()
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(GeoscopeError::invalid_input(field).with_reason("Must not be empty"))
    } else {
        Ok(trimmed.to_string())
    }
}

fn dedup_platforms(platforms: Vec<Platform>) -> Vec<Platform> {
    let mut unique = Vec::with_capacity(platforms.len());
    for platform in platforms {
        if !unique.contains(&platform) {
            unique.push(platform);
        }
    }
    unique
}

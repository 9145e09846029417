//! Command-line argument definitions using clap.
//!
//! Argument structs carry the clap derives; core parameter types stay free of
//! them. Each struct converts into its core counterpart with `From`/`TryFrom`,
//! so form validation still happens in the core.
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Session
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use geoscope_core::{
    models::Platform,
    params::{AnalysisForm, CompareForm, ListHistory, DEFAULT_QUERIES},
    presets::{analysis_preset, comparison_preset, ANALYSIS_PRESETS, COMPARISON_PRESETS},
};

/// Terminal client for GEO visibility analyses
///
/// Geoscope asks a remote multi-agent analysis service how often AI
/// assistants mention a brand for a query, why, and what to do about it.
/// Progress is shown step by step while the service works, and every
/// completed analysis is kept in a local archive.
#[derive(Parser)]
#[command(version, about, name = "geo")]
pub struct Args {
    /// Base URL of the analysis API, e.g. http://localhost:8000/api.
    /// Overrides GEOSCOPE_API_URL and origin-based inference.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Dashboard origin used to infer the API location when no API URL is
    /// given. Defaults to http://localhost:8000
    #[arg(long, global = true)]
    pub origin: Option<String>,

    /// Path to the SQLite archive. Defaults to
    /// $XDG_DATA_HOME/geoscope/geoscope.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a visibility analysis for a brand
    #[command(alias = "a")]
    Analyze(AnalyzeArgs),
    /// Compare the visibility of several domains
    #[command(alias = "c")]
    Compare(CompareArgs),
    /// List past analyses
    #[command(aliases = ["h", "ls"])]
    History(HistoryArgs),
    /// Show an archived analysis
    #[command(alias = "s")]
    Show(ShowArgs),
    /// Delete every analysis from the local archive
    ClearHistory(ClearHistoryArgs),
    /// Show connection mode and backend health
    Status,
    /// List the ready-made analysis and comparison examples
    Examples,
}

/// AI platform to query.
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    Chatgpt,
    Perplexity,
    Claude,
    GoogleAi,
}

impl From<PlatformArg> for Platform {
    fn from(val: PlatformArg) -> Self {
        match val {
            PlatformArg::Chatgpt => Platform::Chatgpt,
            PlatformArg::Perplexity => Platform::Perplexity,
            PlatformArg::Claude => Platform::Claude,
            PlatformArg::GoogleAi => Platform::GoogleAi,
        }
    }
}

fn platforms(args: Vec<PlatformArg>) -> Vec<Platform> {
    args.into_iter().map(Platform::from).collect()
}

/// Run a visibility analysis
///
/// Either fill in the form with flags, or start from one of the examples
/// (`geo examples`) with `--example N` and override individual fields.
#[derive(ClapArgs)]
pub struct AnalyzeArgs {
    /// Search query to test, e.g. "best CRM software for small business"
    #[arg(short, long)]
    pub query: Option<String>,
    /// Brand domain to measure, e.g. hubspot.com
    #[arg(short, long)]
    pub brand: Option<String>,
    /// Competitor domains, comma-separated
    #[arg(short, long)]
    pub competitors: Option<String>,
    /// Platform to query; repeat for several. Defaults to chatgpt and perplexity
    #[arg(short, long = "platform", value_enum)]
    pub platforms: Vec<PlatformArg>,
    /// Number of query variations (1-10)
    #[arg(short, long)]
    pub num_queries: Option<u32>,
    /// Start from example N of `geo examples`
    #[arg(short, long)]
    pub example: Option<usize>,
    /// Print the raw result as JSON instead of a report
    #[arg(long)]
    pub json: bool,
}

impl TryFrom<AnalyzeArgs> for AnalysisForm {
    type Error = anyhow::Error;

    fn try_from(val: AnalyzeArgs) -> Result<Self> {
        let mut form = match val.example {
            Some(number) => analysis_preset(number).map(AnalysisForm::from).ok_or_else(|| {
                anyhow!(
                    "No analysis example {number}; choose 1-{}",
                    ANALYSIS_PRESETS.len()
                )
            })?,
            None => AnalysisForm {
                query: String::new(),
                brand_domain: String::new(),
                competitors: String::new(),
                platforms: Platform::DEFAULTS.to_vec(),
                num_queries: DEFAULT_QUERIES,
            },
        };

        if let Some(query) = val.query {
            form.query = query;
        }
        if let Some(brand) = val.brand {
            form.brand_domain = brand;
        }
        if let Some(competitors) = val.competitors {
            form.competitors = competitors;
        }
        if !val.platforms.is_empty() {
            form.platforms = platforms(val.platforms);
        }
        if let Some(num_queries) = val.num_queries {
            form.num_queries = num_queries;
        }
        Ok(form)
    }
}

/// Compare several domains for one query
#[derive(ClapArgs)]
pub struct CompareArgs {
    /// Search query to test
    #[arg(short, long)]
    pub query: Option<String>,
    /// 2-5 domains, comma-separated
    #[arg(short, long)]
    pub domains: Option<String>,
    /// Platform to query; repeat for several. Defaults to chatgpt and perplexity
    #[arg(short, long = "platform", value_enum)]
    pub platforms: Vec<PlatformArg>,
    /// Start from comparison example N of `geo examples`
    #[arg(short, long)]
    pub example: Option<usize>,
    /// Print the raw result as JSON
    #[arg(long)]
    pub json: bool,
}

impl TryFrom<CompareArgs> for CompareForm {
    type Error = anyhow::Error;

    fn try_from(val: CompareArgs) -> Result<Self> {
        let mut form = match val.example {
            Some(number) => comparison_preset(number).map(CompareForm::from).ok_or_else(|| {
                anyhow!(
                    "No comparison example {number}; choose 1-{}",
                    COMPARISON_PRESETS.len()
                )
            })?,
            None => CompareForm {
                query: String::new(),
                domains: String::new(),
                platforms: Vec::new(),
            },
        };

        if let Some(query) = val.query {
            form.query = query;
        }
        if let Some(domains) = val.domains {
            form.domains = domains;
        }
        if !val.platforms.is_empty() {
            form.platforms = platforms(val.platforms);
        }
        Ok(form)
    }
}

/// List past analyses
///
/// Reads from the analysis service unless `--local`, `--brand` or `--search`
/// is given, or no service is reachable; those read the local archive.
#[derive(ClapArgs)]
pub struct HistoryArgs {
    /// Read from the local archive
    #[arg(long)]
    pub local: bool,
    /// Only analyses for this brand domain (local archive)
    #[arg(short, long)]
    pub brand: Option<String>,
    /// Substring to look for in query, brand or summary (local archive)
    #[arg(short, long)]
    pub search: Option<String>,
    /// Maximum number of analyses to list
    #[arg(short, long, default_value_t = 20)]
    pub limit: u32,
}

impl HistoryArgs {
    pub fn wants_local(&self) -> bool {
        self.local || self.brand.is_some() || self.search.is_some()
    }
}

impl From<&HistoryArgs> for ListHistory {
    fn from(val: &HistoryArgs) -> Self {
        ListHistory { limit: val.limit }
    }
}

/// Show an archived analysis
#[derive(ClapArgs)]
pub struct ShowArgs {
    /// ID of the analysis
    pub id: String,
    /// Print the raw result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Delete every analysis from the local archive
#[derive(ClapArgs)]
pub struct ClearHistoryArgs {
    /// Confirm the deletion
    #[arg(long)]
    pub confirm: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(argv: &[&str]) -> AnalyzeArgs {
        let args = Args::try_parse_from(argv).expect("Arguments should parse");
        match args.command {
            Some(Commands::Analyze(analyze)) => analyze,
            _ => panic!("Expected analyze command"),
        }
    }

    #[test]
    fn test_analyze_from_flags() {
        let form = AnalysisForm::try_from(analyze(&[
            "geo",
            "analyze",
            "--query",
            "best CRM",
            "--brand",
            "hubspot.com",
            "--platform",
            "claude",
            "--platform",
            "google-ai",
            "--num-queries",
            "3",
        ]))
        .unwrap();

        assert_eq!(form.query, "best CRM");
        assert_eq!(form.brand_domain, "hubspot.com");
        assert_eq!(form.platforms, [Platform::Claude, Platform::GoogleAi]);
        assert_eq!(form.num_queries, 3);
        assert_eq!(form.competitors, "");
    }

    #[test]
    fn test_analyze_example_with_override() {
        let form = AnalysisForm::try_from(analyze(&[
            "geo", "analyze", "--example", "2", "--brand", "zoho.com",
        ]))
        .unwrap();

        assert_eq!(form.query, "best CRM software for small business");
        assert_eq!(form.brand_domain, "zoho.com");
        assert_eq!(form.platforms, Platform::DEFAULTS);
        assert_eq!(form.num_queries, DEFAULT_QUERIES);
    }

    #[test]
    fn test_unknown_example_is_rejected() {
        let err = AnalysisForm::try_from(analyze(&["geo", "analyze", "--example", "9"]))
            .unwrap_err();
        assert!(err.to_string().contains("choose 1-5"));
    }

    #[test]
    fn test_history_source_selection() {
        let args = Args::try_parse_from(["geo", "history", "--brand", "hubspot.com"]).unwrap();
        match args.command {
            Some(Commands::History(history)) => {
                assert!(history.wants_local());
                assert_eq!(ListHistory::from(&history).limit, 20);
            }
            _ => panic!("Expected history command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args =
            Args::try_parse_from(["geo", "status", "--origin", "https://geo.example.com"]).unwrap();
        assert_eq!(args.origin.as_deref(), Some("https://geo.example.com"));
        assert!(matches!(args.command, Some(Commands::Status)));
    }
}

//! Ready-made analysis and comparison inputs drawn from real markets.

use crate::{
    models::Platform,
    params::{AnalysisForm, CompareForm, DEFAULT_QUERIES},
};

/// A pre-filled analysis form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisPreset {
    pub name: &'static str,
    pub query: &'static str,
    pub brand_domain: &'static str,
    /// Comma-separated, as typed into the form
    pub competitors: &'static str,
    pub description: &'static str,
}

/// A pre-filled comparison form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonPreset {
    pub name: &'static str,
    pub query: &'static str,
    pub domains: &'static str,
}

pub const ANALYSIS_PRESETS: [AnalysisPreset; 5] = [
    AnalysisPreset {
        name: "AI Project Management Tools",
        query: "best AI project management software 2024",
        brand_domain: "monday.com",
        competitors: "asana.com, clickup.com, notion.so, linear.app",
        description: "Analyze visibility for AI-powered project management platforms",
    },
    AnalysisPreset {
        name: "CRM Software Comparison",
        query: "best CRM software for small business",
        brand_domain: "hubspot.com",
        competitors: "salesforce.com, zoho.com, pipedrive.com, freshsales.io",
        description: "Compare CRM platform visibility in AI recommendations",
    },
    AnalysisPreset {
        name: "Marketing Automation Tools",
        query: "best marketing automation platform",
        brand_domain: "mailchimp.com",
        competitors: "hubspot.com, activecampaign.com, klaviyo.com, constant-contact.com",
        description: "Track marketing automation tool visibility",
    },
    AnalysisPreset {
        name: "Cloud Storage Solutions",
        query: "best cloud storage for businesses",
        brand_domain: "dropbox.com",
        competitors: "box.com, google.com/drive, onedrive.com, sync.com",
        description: "Analyze cloud storage provider visibility",
    },
    AnalysisPreset {
        name: "E-commerce Platforms",
        query: "best e-commerce platform for startups",
        brand_domain: "shopify.com",
        competitors: "woocommerce.com, bigcommerce.com, wix.com, squarespace.com",
        description: "Compare e-commerce platform recommendations",
    },
];

pub const COMPARISON_PRESETS: [ComparisonPreset; 5] = [
    ComparisonPreset {
        name: "CRM Platforms",
        query: "best CRM software",
        domains: "hubspot.com, salesforce.com, pipedrive.com, zoho.com",
    },
    ComparisonPreset {
        name: "Project Management",
        query: "best project management tool",
        domains: "asana.com, monday.com, clickup.com, notion.so",
    },
    ComparisonPreset {
        name: "Email Marketing",
        query: "best email marketing software",
        domains: "mailchimp.com, constant-contact.com, sendinblue.com, activecampaign.com",
    },
    ComparisonPreset {
        name: "E-commerce",
        query: "best e-commerce platform",
        domains: "shopify.com, woocommerce.com, bigcommerce.com, wix.com",
    },
    ComparisonPreset {
        name: "Cloud Storage",
        query: "best cloud storage service",
        domains: "dropbox.com, box.com, google.com, onedrive.com",
    },
];

/// Looks up an analysis preset by its 1-based position.
pub fn analysis_preset(number: usize) -> Option<&'static AnalysisPreset> {
    number.checked_sub(1).and_then(|i| ANALYSIS_PRESETS.get(i))
}

/// Looks up a comparison preset by its 1-based position.
pub fn comparison_preset(number: usize) -> Option<&'static ComparisonPreset> {
    number.checked_sub(1).and_then(|i| COMPARISON_PRESETS.get(i))
}

impl From<&AnalysisPreset> for AnalysisForm {
    fn from(preset: &AnalysisPreset) -> Self {
        AnalysisForm {
            query: preset.query.to_string(),
            brand_domain: preset.brand_domain.to_string(),
            competitors: preset.competitors.to_string(),
            platforms: Platform::DEFAULTS.to_vec(),
            num_queries: DEFAULT_QUERIES,
        }
    }
}

impl From<&ComparisonPreset> for CompareForm {
    fn from(preset: &ComparisonPreset) -> Self {
        CompareForm {
            query: preset.query.to_string(),
            domains: preset.domains.to_string(),
            platforms: Vec::new(),
        }
    }
}

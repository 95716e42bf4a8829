use crate::lifecycle::RevisitPolicy;
use crate::models::{Dimension, Status, TextField};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Lifecycle chains and transition policies
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Filter defaults
    #[serde(default)]
    pub filter: FilterConfig,

    /// Aggregation and chart-facing options
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the embedded defaults, an optional file and
    /// the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("SERVICE_RECORDS_CONFIG")
            .unwrap_or_else(|_| "config/service-records.toml".to_string());

        Self::builder()
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: SVC_REC)
            .add_source(
                config::Environment::with_prefix("SVC_REC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load the embedded defaults overridden by one specific file
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()
    }

    fn builder() -> config::ConfigBuilder<config::builder::DefaultState> {
        config::Config::builder().add_source(config::File::from_str(
            include_str!("../config/default.toml"),
            config::FileFormat::Toml,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Policy for re-entering an already visited status
    #[serde(default)]
    pub revisit_policy: RevisitPolicy,

    /// Whether terminal statuses can be left
    #[serde(default = "default_true")]
    pub terminal_is_final: bool,

    /// Ordered chains per record kind
    #[serde(default)]
    pub chains: ChainsConfig,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            revisit_policy: RevisitPolicy::default(),
            terminal_is_final: true,
            chains: ChainsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainsConfig {
    #[serde(default = "default_procurement_chain")]
    pub contract: ChainConfig,

    #[serde(default = "default_procurement_chain")]
    pub order: ChainConfig,

    #[serde(default = "default_report_chain")]
    pub report: ChainConfig,
}

impl Default for ChainsConfig {
    fn default() -> Self {
        Self {
            contract: default_procurement_chain(),
            order: default_procurement_chain(),
            report: default_report_chain(),
        }
    }
}

/// One kind's chain as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Forward statuses in order
    pub statuses: Vec<Status>,

    /// Absorbing failure status
    pub failure: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Fields scanned by the free-text search
    #[serde(default = "default_search_fields")]
    pub search_fields: Vec<TextField>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            search_fields: default_search_fields(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Dimensions to build distributions for
    #[serde(default = "default_dimensions")]
    pub dimensions: Vec<Dimension>,

    /// Maximum characters of a chart-axis label before truncation
    #[serde(default = "default_label_max_chars")]
    pub label_max_chars: usize,

    /// Bucket name for records without a value for a dimension
    #[serde(default = "default_unassigned_label")]
    pub unassigned_label: String,

    /// Series colors, assigned by rank
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            dimensions: default_dimensions(),
            label_max_chars: default_label_max_chars(),
            unassigned_label: default_unassigned_label(),
            palette: default_palette(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_procurement_chain() -> ChainConfig {
    ChainConfig {
        statuses: vec![
            Status::New,
            Status::Approved,
            Status::Contracted,
            Status::Delivered,
        ],
        failure: Status::Rejected,
    }
}

fn default_report_chain() -> ChainConfig {
    ChainConfig {
        statuses: vec![Status::Open, Status::Closed],
        failure: Status::OutOfOrder,
    }
}

fn default_search_fields() -> Vec<TextField> {
    vec![
        TextField::Id,
        TextField::Title,
        TextField::Description,
        TextField::Reference,
        TextField::Facility,
        TextField::Supplier,
        TextField::Category,
    ]
}

fn default_dimensions() -> Vec<Dimension> {
    vec![Dimension::Facility, Dimension::Supplier, Dimension::Category]
}

fn default_label_max_chars() -> usize {
    15
}

fn default_unassigned_label() -> String {
    "Unspecified".to_string()
}

fn default_palette() -> Vec<String> {
    [
        "#4E79A7", "#F28E2B", "#E15759", "#76B7B2", "#59A14F", "#EDC948", "#B07AA1", "#FF9DA7",
        "#9C755F", "#BAB0AC",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

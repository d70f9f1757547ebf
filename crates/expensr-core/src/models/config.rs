//! Configuration structures for the ingestion pipeline.

use serde::{Deserialize, Serialize};

/// Main configuration for the expensr pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpensrConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Classification configuration.
    pub classify: ClassifyConfig,

    /// Cash-flow forecast configuration.
    pub forecast: ForecastConfig,

    /// Caller identity policy.
    pub identity: IdentityConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Currency assumed when none is detected in the text.
    pub default_currency: String,

    /// Maximum stored length of normalized OCR text, in chars.
    pub max_text_length: usize,

    /// Number of leading non-blank lines scanned for the vendor name.
    pub vendor_scan_lines: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_currency: "MYR".to_string(),
            max_text_length: 3500,
            vendor_scan_lines: 15,
        }
    }
}

/// Classification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Size of the text sample handed to the AI collaborator, in chars.
    pub sample_chars: usize,

    /// Upper bound on a single AI call, in milliseconds.
    pub ai_timeout_ms: u64,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            sample_chars: 2000,
            ai_timeout_ms: 10_000,
        }
    }
}

/// Cash-flow forecast configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Number of future weekly periods to project.
    pub horizon_weeks: usize,

    /// Minimum historical weeks required before projecting.
    pub min_history_weeks: usize,

    /// Per-step multiplicative decay applied to the trend contribution.
    pub trend_dampening: f64,

    /// Freshness window for cached forecast results, in hours.
    pub cache_max_age_hours: i64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_weeks: 8,
            min_history_weeks: 4,
            trend_dampening: 0.9,
            cache_max_age_hours: 24,
        }
    }
}

/// Policy for attributing ingested documents when no caller identity is
/// supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Allow ingestion without an `uploaded_by` id. When enabled, documents
    /// are attributed to a deterministic per-organization placeholder
    /// principal; when disabled (the default), a missing id is a validation
    /// error.
    pub allow_anonymous: bool,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            allow_anonymous: false,
        }
    }
}

impl ExpensrConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

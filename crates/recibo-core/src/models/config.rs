//! Configuration structures for receipt validation.

use serde::{Deserialize, Serialize};

/// Main configuration for the recibo pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReciboConfig {
    /// OCR trust gate configuration.
    pub trust: TrustConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// CLI output configuration.
    pub output: OutputConfig,
}

/// Thresholds deciding whether OCR output may be read at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustConfig {
    /// Minimum average word confidence (0.0 - 1.0), inclusive.
    pub min_confidence: f64,

    /// Maximum number of suspicious tokens, inclusive.
    pub max_suspicious_tokens: usize,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.70,
            max_suspicious_tokens: 5,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// How the generic strategy settles several distinct amounts
    /// when none equals the expected amount.
    pub amount_tie_break: AmountTieBreak,
}

/// Tie-break for ambiguous amounts in the generic strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountTieBreak {
    /// Take the largest amount; the transferred total is usually the largest figure.
    #[default]
    Largest,
    /// Take the first amount in document order.
    FirstInDocument,
    /// Refuse to guess and report the ambiguity.
    Reject,
}

/// Output formatting for the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json", "text" or "csv").
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
        }
    }
}

impl ReciboConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the pipeline cannot honour.
    pub fn check(&self) -> crate::Result<()> {
        let confidence = self.trust.min_confidence;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(crate::ReciboError::Config(format!(
                "trust.min_confidence must be within 0.0 and 1.0, got {}",
                confidence
            )));
        }
        Ok(())
    }
}

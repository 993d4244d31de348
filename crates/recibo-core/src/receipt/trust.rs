//! OCR trust gate.

use tracing::{debug, warn};

use crate::models::config::TrustConfig;
use crate::models::receipt::OcrMetadata;

/// Decides whether OCR output is reliable enough to read at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrustGate {
    /// Minimum average confidence, inclusive.
    pub min_confidence: f64,
    /// Maximum suspicious tokens, inclusive.
    pub max_suspicious_tokens: usize,
}

impl TrustGate {
    pub fn new(min_confidence: f64, max_suspicious_tokens: usize) -> Self {
        Self {
            min_confidence,
            max_suspicious_tokens,
        }
    }

    pub fn from_config(config: &TrustConfig) -> Self {
        Self::new(config.min_confidence, config.max_suspicious_tokens)
    }

    /// Whether the metadata passes both thresholds. NaN confidence never passes.
    pub fn is_trustable(&self, meta: &OcrMetadata) -> bool {
        let confident = meta.average_confidence >= self.min_confidence;
        let clean = meta.suspicious_token_count <= self.max_suspicious_tokens;

        if confident && clean {
            debug!(
                "OCR trusted: confidence {:.3}, {} suspicious tokens",
                meta.average_confidence, meta.suspicious_token_count
            );
        } else {
            warn!(
                "OCR rejected: confidence {:.3} (min {:.2}), {} suspicious tokens (max {})",
                meta.average_confidence,
                self.min_confidence,
                meta.suspicious_token_count,
                self.max_suspicious_tokens
            );
        }

        confident && clean
    }
}

impl Default for TrustGate {
    fn default() -> Self {
        Self::from_config(&TrustConfig::default())
    }
}

/// Check OCR metadata against the default thresholds.
pub fn is_trustable(meta: &OcrMetadata) -> bool {
    TrustGate::default().is_trustable(meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(confidence: f64, suspicious: usize) -> OcrMetadata {
        OcrMetadata::new("Importe $ 10,00", confidence, suspicious)
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        assert!(is_trustable(&meta(0.70, 5)));
        assert!(is_trustable(&meta(1.0, 0)));
        assert!(!is_trustable(&meta(0.70, 6)));
    }

    #[test]
    fn test_low_confidence_never_passes() {
        for suspicious in [0, 1, 5, 50] {
            assert!(!is_trustable(&meta(0.69, suspicious)));
        }
    }

    #[test]
    fn test_nan_confidence() {
        assert!(!is_trustable(&meta(f64::NAN, 0)));
    }

    #[test]
    fn test_custom_gate() {
        let gate = TrustGate::new(0.9, 0);
        assert!(!gate.is_trustable(&meta(0.85, 0)));
        assert!(!gate.is_trustable(&meta(0.95, 1)));
        assert!(gate.is_trustable(&meta(0.95, 0)));
    }
}

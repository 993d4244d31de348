//! End-to-end receipt validation: trust gate, normalization, extraction,
//! comparison.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::config::ReciboConfig;
use crate::models::receipt::{ExpectedValues, Extraction, OcrMetadata, Validation, ValidationStatus};

use super::registry::Registry;
use super::text::normalize;
use super::trust::TrustGate;
use super::validator::validate;
use super::{ReceiptExtractor, Result};

/// Validates OCR'd transfer receipts against expected payment values.
///
/// Stateless across calls; one validator may serve any number of receipts.
#[derive(Debug, Clone)]
pub struct ReceiptValidator<E = Registry> {
    gate: TrustGate,
    extractor: E,
}

impl ReceiptValidator<Registry> {
    /// Create a validator with default thresholds and policies.
    pub fn new() -> Self {
        Self::with_extractor(TrustGate::default(), Registry::new())
    }

    pub fn from_config(config: &ReciboConfig) -> Self {
        Self::with_extractor(
            TrustGate::from_config(&config.trust),
            Registry::from_config(&config.extraction),
        )
    }
}

impl Default for ReceiptValidator<Registry> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ReceiptExtractor> ReceiptValidator<E> {
    pub fn with_extractor(gate: TrustGate, extractor: E) -> Self {
        Self { gate, extractor }
    }

    /// Read the payment facts without comparing them.
    ///
    /// Fails with `UntrustworthyOcr` before any extraction when the OCR
    /// metadata does not pass the trust gate.
    pub fn extract(&self, meta: &OcrMetadata, expected: &ExpectedValues) -> Result<Extraction> {
        if !self.gate.is_trustable(meta) {
            return Err(ExtractionError::UntrustworthyOcr);
        }

        let text = normalize(&meta.text);
        debug!("Normalized receipt: {} lines", text.lines().count());

        self.extractor.extract(&text, expected)
    }

    /// Read the receipt and check it against `expected`.
    pub fn validate(&self, meta: &OcrMetadata, expected: &ExpectedValues) -> Result<Validation> {
        let start = Instant::now();

        let extraction = self.extract(meta, expected)?;
        validate(&extraction.result, expected)?;

        info!(
            "Receipt validated by {} strategy in {}ms{}",
            extraction.strategy,
            start.elapsed().as_millis(),
            if extraction.is_guessed() { " (tie-break used)" } else { "" }
        );

        Ok(Validation {
            status: ValidationStatus::Validated,
            extraction,
        })
    }
}

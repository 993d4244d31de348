//! Core library for validating Argentine bank-transfer receipts.
//!
//! This crate provides:
//! - An OCR trust gate deciding whether recognized text may be read at all
//! - Text normalization that keeps the receipt's line layout
//! - Amount, date and CBU/CVU/alias extraction primitives
//! - Layout-aware extraction strategies for nine Argentine banks and wallets,
//!   plus a generic fallback that settles ambiguity against expected values
//! - Validation of extracted facts against the expected payment
//!
//! OCR itself happens upstream; the crate consumes its text and quality
//! signals as [`OcrMetadata`].

pub mod error;
pub mod models;
pub mod receipt;

pub use error::{ExtractionError, Field, ReciboError, Result};
pub use models::config::{AmountTieBreak, ReciboConfig};
pub use models::receipt::{
    ExpectedValues, Extraction, FieldDecision, OcrMetadata, ParseResult, Resolution, Validation, ValidationStatus,
};
pub use receipt::{
    is_trustable, normalize, select_strategy, validate, Bank, GenericStrategy, ReceiptExtractor, ReceiptValidator,
    Registry, Strategy, TrustGate,
};

//! Transfer receipt reading and validation.

pub mod banks;
pub mod layout;
pub mod pipeline;
pub mod registry;
pub mod rules;
pub mod text;
pub mod trust;
pub mod validator;

pub use banks::{Bank, GenericStrategy};
pub use pipeline::ReceiptValidator;
pub use registry::{select_strategy, Registry, Strategy};
pub use text::normalize;
pub use trust::{is_trustable, TrustGate};
pub use validator::validate;

use crate::error::ExtractionError;
use crate::models::receipt::{ExpectedValues, Extraction};

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for receipt extractors.
pub trait ReceiptExtractor {
    /// Extract payment facts from normalized receipt text.
    fn extract(&self, text: &str, expected: &ExpectedValues) -> Result<Extraction>;
}

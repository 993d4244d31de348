//! Strategy selection.

use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::receipt::{ExpectedValues, Extraction};

use super::banks::{Bank, GenericStrategy};
use super::{ReceiptExtractor, Result};

/// Extraction strategy chosen for a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Bank(Bank),
    Generic(GenericStrategy),
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Bank(bank) => bank.name(),
            Strategy::Generic(_) => super::banks::generic::NAME,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Strategy::Bank(bank) => bank.display_name(),
            Strategy::Generic(_) => "Generic",
        }
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, Strategy::Generic(_))
    }

    /// Extract payment facts. Bank strategies ignore `expected`; only the
    /// generic strategy uses it to settle ambiguity.
    pub fn extract(&self, text: &str, expected: &ExpectedValues) -> Result<Extraction> {
        match self {
            Strategy::Bank(bank) => bank.extract(text),
            Strategy::Generic(generic) => generic.extract(text, expected),
        }
    }
}

/// Picks the strategy for a receipt: the first bank, in [`Bank::ALL`]
/// order, whose detector claims the text, else the generic strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registry {
    generic: GenericStrategy,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            generic: GenericStrategy::from_config(config),
        }
    }

    pub fn select(&self, text: &str) -> Strategy {
        match Bank::ALL.into_iter().find(|bank| bank.matches(text)) {
            Some(bank) => {
                debug!("Receipt claimed by {}", bank.name());
                Strategy::Bank(bank)
            }
            None => {
                debug!("No bank claimed the receipt, using generic strategy");
                Strategy::Generic(self.generic)
            }
        }
    }

    /// Every bank whose detector claims the text, in priority order.
    pub fn candidates(&self, text: &str) -> Vec<Bank> {
        Bank::ALL.into_iter().filter(|bank| bank.matches(text)).collect()
    }
}

impl ReceiptExtractor for Registry {
    fn extract(&self, text: &str, expected: &ExpectedValues) -> Result<Extraction> {
        let strategy = self.select(text);
        info!("Extracting with {} strategy", strategy.name());
        strategy.extract(text, expected)
    }
}

/// Select a strategy with the default configuration.
pub fn select_strategy(text: &str) -> Strategy {
    Registry::default().select(text)
}

//! Normalized symbol and source identifiers

use crate::utils::normalize_code;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a traded instrument, normalized once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol from raw feed or user input.
    pub fn new(raw: &str) -> Self {
        Symbol(normalize_code(raw))
    }

    /// Returns the normalized text of the symbol
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when nothing is left after normalization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Candle symbols carry an attribute block after the base symbol, as in `AAPL{=D}`.
    pub fn is_candle(&self) -> bool {
        match self.0.find('{') {
            Some(open) => open > 0 && self.0.ends_with('}'),
            None => false,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(raw: &str) -> Self {
        Symbol::new(raw)
    }
}

impl From<String> for Symbol {
    fn from(raw: String) -> Self {
        Symbol::new(&raw)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

/// Identifier of a liquidity venue or synthetic aggregate source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Source(String);

impl Source {
    /// Creates a source from raw feed or user input.
    pub fn new(raw: &str) -> Self {
        Source(normalize_code(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Source {
    fn from(raw: &str) -> Self {
        Source::new(raw)
    }
}

impl From<String> for Source {
    fn from(raw: String) -> Self {
        Source::new(&raw)
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        source.0
    }
}

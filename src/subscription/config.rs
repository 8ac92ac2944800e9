//! Serializable subscription configuration

use crate::events::EventType;
use crate::view::OrderViewError;
use serde::{Deserialize, Serialize};

/// Declarative description of an order view subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionConfig {
    /// Event type carried by the channel
    #[serde(default)]
    pub event_type: EventType,

    /// Sources to consolidate; must not be empty
    pub sources: Vec<String>,

    /// Symbols to subscribe initially
    #[serde(default)]
    pub symbols: Vec<String>,
}

impl SubscriptionConfig {
    pub fn new(sources: &[&str], symbols: &[&str]) -> Self {
        Self {
            event_type: EventType::Order,
            sources: sources.iter().map(|source| source.to_string()).collect(),
            symbols: symbols.iter().map(|symbol| symbol.to_string()).collect(),
        }
    }

    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, OrderViewError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, OrderViewError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

//! Order view error types

use crate::events::EventType;
use std::fmt;

/// Failure reported by the feed handler when a snapshot handle cannot be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedError {
    /// Symbol the handle was requested for
    pub symbol: String,
    /// Source the handle was requested for
    pub source: String,
    /// Reason given by the feed handler
    pub reason: String,
}

impl FeedError {
    pub fn new(symbol: &str, source: &str, reason: impl Into<String>) -> Self {
        Self {
            symbol: symbol.to_string(),
            source: source.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot create snapshot for {}#{}: {}",
            self.symbol, self.source, self.reason
        )
    }
}

impl std::error::Error for FeedError {}

/// Errors raised by the configuration surface of an order view
#[derive(Debug)]
pub enum OrderViewError {
    /// A symbol was added before the source set was configured
    SourcesNotSet,

    /// The source set can only be configured once
    SourcesAlreadySet,

    /// The configured source set was empty
    EmptySources,

    /// A symbol or source was empty after normalization
    EmptySymbol,

    /// Candle symbols cannot be subscribed on an order channel
    CandleSymbol(String),

    /// The channel event type is not an indexed order kind
    UnsupportedEventType(EventType),

    /// The subscription was closed
    Closed,

    /// Configuration could not be parsed
    InvalidConfig(String),

    /// Error from the underlying feed handler
    Feed(FeedError),
}

impl fmt::Display for OrderViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderViewError::SourcesNotSet => {
                write!(f, "Sources must be configured before adding symbols")
            }
            OrderViewError::SourcesAlreadySet => write!(f, "Sources are already configured"),
            OrderViewError::EmptySources => write!(f, "Source set must not be empty"),
            OrderViewError::EmptySymbol => write!(f, "Identifier must not be empty"),
            OrderViewError::CandleSymbol(symbol) => {
                write!(f, "Candle symbol not supported by an order view: {}", symbol)
            }
            OrderViewError::UnsupportedEventType(event_type) => {
                write!(f, "Unsupported event type for an order view: {}", event_type)
            }
            OrderViewError::Closed => write!(f, "Subscription is closed"),
            OrderViewError::InvalidConfig(message) => {
                write!(f, "Invalid configuration: {}", message)
            }
            OrderViewError::Feed(err) => write!(f, "Feed error: {}", err),
        }
    }
}

impl std::error::Error for OrderViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrderViewError::Feed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FeedError> for OrderViewError {
    fn from(err: FeedError) -> Self {
        OrderViewError::Feed(err)
    }
}

impl From<serde_json::Error> for OrderViewError {
    fn from(err: serde_json::Error) -> Self {
        OrderViewError::InvalidConfig(err.to_string())
    }
}

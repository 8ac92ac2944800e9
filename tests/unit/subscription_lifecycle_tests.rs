//! Subscription configuration and feed handle lifecycle

use orderview_rs::{
    EventType, FeedError, OrderViewError, OrderViewSubscription, SnapshotFeed, Source,
    SubscriptionConfig, Symbol,
};
use std::sync::{Arc, Mutex};

/// Feed whose open handles are observable after the subscription is dropped
#[derive(Clone, Default)]
struct SharedFeed {
    open: Arc<Mutex<Vec<String>>>,
    refuse: Option<String>,
}

impl SnapshotFeed for SharedFeed {
    fn create_snapshot(
        &mut self,
        symbol: &Symbol,
        source: &Source,
        _event_type: EventType,
    ) -> Result<(), FeedError> {
        let handle = format!("{}#{}", symbol, source);
        if self.refuse.as_deref() == Some(handle.as_str()) {
            return Err(FeedError::new(symbol.as_str(), source.as_str(), "refused"));
        }
        self.open.lock().unwrap().push(handle);
        Ok(())
    }

    fn close_snapshot(&mut self, symbol: &Symbol, source: &Source, _event_type: EventType) {
        let handle = format!("{}#{}", symbol, source);
        self.open.lock().unwrap().retain(|open| *open != handle);
    }
}

#[cfg(test)]
mod subscription_lifecycle_tests {
    use super::*;
    use orderview_rs::ConsolidatedBook;

    #[test]
    fn test_drop_closes_all_handles() {
        let feed = SharedFeed::default();
        let open = Arc::clone(&feed.open);
        {
            let config = SubscriptionConfig::new(&["NTV", "DEX"], &["AAPL", "IBM"]);
            let subscription = OrderViewSubscription::from_config(
                feed,
                &config,
                Arc::new(ConsolidatedBook::new()),
            )
            .unwrap();
            assert_eq!(subscription.symbols().len(), 2);
            assert_eq!(open.lock().unwrap().len(), 4);
        }
        assert!(open.lock().unwrap().is_empty());
    }

    #[test]
    fn test_config_with_refused_handle_leaves_nothing_open() {
        let feed = SharedFeed {
            refuse: Some("IBM#DEX".to_string()),
            ..SharedFeed::default()
        };
        let open = Arc::clone(&feed.open);
        let config = SubscriptionConfig::from_json(
            r#"{"sources": ["NTV", "DEX"], "symbols": ["AAPL", "IBM"]}"#,
        )
        .unwrap();

        let result =
            OrderViewSubscription::from_config(feed, &config, Arc::new(ConsolidatedBook::new()));
        match result {
            Err(OrderViewError::Feed(err)) => {
                assert_eq!(err.symbol, "IBM");
                assert_eq!(err.source, "DEX");
            }
            _ => panic!("expected feed error"),
        }
        assert!(open.lock().unwrap().is_empty());
    }

    #[test]
    fn test_config_errors_surface() {
        let config = SubscriptionConfig::new(&[], &["AAPL"]);
        let result = OrderViewSubscription::from_config(
            SharedFeed::default(),
            &config,
            Arc::new(ConsolidatedBook::new()),
        );
        assert!(matches!(result, Err(OrderViewError::EmptySources)));
    }
}

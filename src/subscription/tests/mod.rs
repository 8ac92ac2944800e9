
#[cfg(test)]
pub(crate) mod support {
    use crate::{EventType, FeedError, SnapshotFeed, Source, Symbol};

    /// Feed that records handle traffic and can be told to refuse one pair
    #[derive(Debug, Default)]
    pub struct RecordingFeed {
        pub opened: Vec<(String, String)>,
        pub closed: Vec<(String, String)>,
        pub fail_on: Option<(String, String)>,
    }

    impl RecordingFeed {
        pub fn failing_on(symbol: &str, source: &str) -> Self {
            Self {
                fail_on: Some((symbol.to_string(), source.to_string())),
                ..Self::default()
            }
        }

        /// Handles opened and not closed again
        pub fn open_handles(&self) -> Vec<(String, String)> {
            let mut open = self.opened.clone();
            for handle in &self.closed {
                if let Some(position) = open.iter().position(|opened| opened == handle) {
                    open.remove(position);
                }
            }
            open
        }
    }

    impl SnapshotFeed for RecordingFeed {
        fn create_snapshot(
            &mut self,
            symbol: &Symbol,
            source: &Source,
            _event_type: EventType,
        ) -> Result<(), FeedError> {
            let handle = (symbol.to_string(), source.to_string());
            if self.fail_on.as_ref() == Some(&handle) {
                return Err(FeedError::new(symbol.as_str(), source.as_str(), "refused"));
            }
            self.opened.push(handle);
            Ok(())
        }

        fn close_snapshot(&mut self, symbol: &Symbol, source: &Source, _event_type: EventType) {
            self.closed.push((symbol.to_string(), source.to_string()));
        }
    }
}

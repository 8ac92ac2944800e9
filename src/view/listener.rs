//! Listener boundary receiving consolidated snapshots and updates

use crate::events::EventBatch;

/// Sink for the output of an order view.
///
/// `on_snapshot` fires once per readiness cycle of a symbol with the union of
/// all configured sources; `on_update` fires for every consistent change
/// afterwards. Consumers apply events by index: upsert, or remove when
/// [`EventBatch::is_removal`] holds.
pub trait OrderViewListener: Send + Sync {
    fn on_snapshot(&self, batch: &EventBatch);

    fn on_update(&self, batch: &EventBatch);
}

/// The two kinds of output an order view produces.
#[derive(Debug, Clone, Copy)]
pub enum Notification<'a> {
    Snapshot(&'a EventBatch),
    Update(&'a EventBatch),
}

impl<'a> Notification<'a> {
    pub fn batch(&self) -> &'a EventBatch {
        match self {
            Notification::Snapshot(batch) | Notification::Update(batch) => batch,
        }
    }

    /// Route the notification to the matching listener callback.
    pub fn dispatch(self, listener: &dyn OrderViewListener) {
        match self {
            Notification::Snapshot(batch) => listener.on_snapshot(batch),
            Notification::Update(batch) => listener.on_update(batch),
        }
    }
}

/// Adapts a closure over [`Notification`] into a listener.
pub struct FnListener<F>(pub F);

impl<F> OrderViewListener for FnListener<F>
where
    F: Fn(Notification<'_>) + Send + Sync,
{
    fn on_snapshot(&self, batch: &EventBatch) {
        (self.0)(Notification::Snapshot(batch));
    }

    fn on_update(&self, batch: &EventBatch) {
        (self.0)(Notification::Update(batch));
    }
}

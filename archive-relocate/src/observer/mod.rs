//! Lifecycle notifications for pipeline observers.
//!
//! Two families of hooks exist on [`Observer`]:
//!
//! - **Consumer hooks** (`on_recv`, `on_download`, `on_process`, ...) are
//!   fired by the host pipeline as a message moves through it.
//! - **Engine hooks** (`pre_extract`, `watch_broker`, `on_engine_success`,
//!   `on_engine_failure`) are fired by [`crate::relocate::RelocateStage`]
//!   while it handles one archive.
//!
//! Every hook has an empty default body, so an observer only implements what
//! it cares about.
//!
//! # Delivery
//!
//! [`ObserverSet::notify`] calls observers synchronously, on the caller's
//! thread, in registration order. Nothing is isolated: a panicking observer
//! unwinds through the stage that fired the hook.

mod logging;

pub use logging::LoggingObserver;

use crate::broker::Broker;
use crate::error::RelocateError;
use crate::relocate::UploadReport;
use std::error::Error;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Listener for pipeline lifecycle events.
pub trait Observer: Send + Sync {
    /// A message was taken off the queue.
    fn on_recv(&self, _broker: &Broker) {}

    /// The archive for the current message has been retrieved locally.
    fn on_download(&self, _local_path: &Path) {}

    /// The engine produced a result for the current message.
    fn on_process(&self, _broker: &Broker, _result: &str) {}

    /// The engine did not finish within the host's deadline.
    fn on_process_timeout(&self) {}

    /// The result was published downstream.
    fn on_consumer_success(&self, _broker: &Broker, _result: &str) {}

    /// The host gave up on the current message.
    fn on_consumer_failure(&self, _broker: &Broker, _error: &dyn Error) {}

    /// The message was skipped by the host's filters.
    fn on_not_handled(&self, _broker: &Broker) {}

    /// The relocation stage is about to inspect the archive.
    fn pre_extract(&self, _broker: &Broker, _local_path: &Path) {}

    /// The relocation stage has read its inputs from the broker.
    fn watch_broker(&self, _broker: &Broker) {}

    /// The archive was uploaded and a report built.
    fn on_engine_success(&self, _broker: &Broker, _report: &UploadReport) {}

    /// The relocation stage rejected the archive.
    fn on_engine_failure(&self, _broker: &Broker, _error: &RelocateError) {}
}

/// Ordered collection of observers owned by a stage.
#[derive(Clone, Default)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn Observer>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observer; it will be notified after all existing ones.
    pub fn register(&mut self, observer: Arc<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, observer: Arc<dyn Observer>) -> Self {
        self.register(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Invoke `hook` on every observer in registration order.
    ///
    /// ```
    /// use archive_relocate::broker::Broker;
    /// use archive_relocate::observer::{LoggingObserver, ObserverSet};
    /// use archive_relocate::log::NoOpLogger;
    /// use std::sync::Arc;
    ///
    /// let observers = ObserverSet::new()
    ///     .with(Arc::new(LoggingObserver::new(Arc::new(NoOpLogger))));
    /// let broker = Broker::new();
    /// observers.notify(|o| o.on_recv(&broker));
    /// ```
    pub fn notify(&self, hook: impl Fn(&dyn Observer)) {
        for observer in &self.observers {
            hook(observer.as_ref());
        }
    }
}

impl fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSet")
            .field("len", &self.observers.len())
            .finish()
    }
}

impl FromIterator<Arc<dyn Observer>> for ObserverSet {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Observer>>>(iter: I) -> Self {
        Self {
            observers: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Tagged {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Observer for Tagged {
        fn on_recv(&self, _broker: &Broker) {
            self.log.lock().push(format!("{}:recv", self.tag));
        }

        fn on_download(&self, local_path: &Path) {
            self.log
                .lock()
                .push(format!("{}:download:{}", self.tag, local_path.display()));
        }
    }

    struct Silent;

    impl Observer for Silent {}

    #[test]
    fn test_notify_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut observers = ObserverSet::new();
        observers.register(Arc::new(Tagged { tag: "first", log: log.clone() }));
        observers.register(Arc::new(Silent));
        observers.register(Arc::new(Tagged { tag: "second", log: log.clone() }));
        assert_eq!(observers.len(), 3);

        let broker = Broker::new();
        observers.notify(|o| o.on_recv(&broker));
        observers.notify(|o| o.on_download(Path::new("/tmp/a.tgz")));

        assert_eq!(
            *log.lock(),
            vec![
                "first:recv",
                "second:recv",
                "first:download:/tmp/a.tgz",
                "second:download:/tmp/a.tgz",
            ]
        );
    }

    #[test]
    fn test_empty_set_is_a_no_op() {
        let observers = ObserverSet::new();
        assert!(observers.is_empty());
        observers.notify(|o| o.on_process_timeout());
    }

    #[test]
    fn test_from_iterator_and_debug() {
        let observers: ObserverSet = vec![Arc::new(Silent) as Arc<dyn Observer>]
            .into_iter()
            .collect();
        assert_eq!(format!("{:?}", observers), "ObserverSet { len: 1 }");
    }
}

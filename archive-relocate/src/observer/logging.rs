//! Observer that writes one log line per lifecycle event.

use super::Observer;
use crate::broker::{Broker, S3_PATH_KEY};
use crate::error::RelocateError;
use crate::log::Logger;
use crate::relocate::UploadReport;
use crate::{log_debug, log_info, log_warn};
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

const COMPONENT: &str = "observer";

/// Logs every hook through the injected [`Logger`].
pub struct LoggingObserver {
    logger: Arc<dyn Logger>,
}

impl LoggingObserver {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

fn source_path(broker: &Broker) -> &str {
    broker
        .get(S3_PATH_KEY)
        .and_then(|v| v.as_str())
        .unwrap_or("<unknown>")
}

impl Observer for LoggingObserver {
    fn on_recv(&self, broker: &Broker) {
        log_debug!(self.logger, COMPONENT, "Received message for {}", source_path(broker));
    }

    fn on_download(&self, local_path: &Path) {
        log_debug!(self.logger, COMPONENT, "Archive downloaded to {}", local_path.display());
    }

    fn on_process(&self, broker: &Broker, _result: &str) {
        log_debug!(self.logger, COMPONENT, "Processed {}", source_path(broker));
    }

    fn on_process_timeout(&self) {
        log_warn!(self.logger, COMPONENT, "Processing timed out");
    }

    fn on_consumer_success(&self, broker: &Broker, _result: &str) {
        log_debug!(self.logger, COMPONENT, "Published result for {}", source_path(broker));
    }

    fn on_consumer_failure(&self, broker: &Broker, error: &dyn Error) {
        log_warn!(
            self.logger,
            COMPONENT,
            "Message for {} failed: {}",
            source_path(broker),
            error
        );
    }

    fn on_not_handled(&self, broker: &Broker) {
        log_debug!(self.logger, COMPONENT, "Message for {} not handled", source_path(broker));
    }

    fn pre_extract(&self, _broker: &Broker, local_path: &Path) {
        log_debug!(self.logger, COMPONENT, "Inspecting archive at {}", local_path.display());
    }

    fn watch_broker(&self, broker: &Broker) {
        let keys: Vec<&str> = broker.keys().collect();
        log_debug!(self.logger, COMPONENT, "Broker keys: {}", keys.join(", "));
    }

    fn on_engine_success(&self, _broker: &Broker, report: &UploadReport) {
        log_info!(
            self.logger,
            COMPONENT,
            "Relocated {} to {}",
            report.original_path,
            report.path
        );
    }

    fn on_engine_failure(&self, broker: &Broker, error: &RelocateError) {
        log_warn!(
            self.logger,
            COMPONENT,
            "Relocation of {} failed: {}",
            source_path(broker),
            error
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{LogLevel, MemoryLogger};

    #[test]
    fn test_failure_is_logged_as_warning() {
        let logger = Arc::new(MemoryLogger::new());
        let observer = LoggingObserver::new(logger.clone());
        let mut broker = Broker::new();
        broker.set(S3_PATH_KEY, "bad/path");

        let error = RelocateError::PatternMismatch {
            path: "bad/path".to_string(),
        };
        observer.on_engine_failure(&broker, &error);

        let warnings = logger.at_level(LogLevel::Warn);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].component, "observer");
        assert!(warnings[0].message.contains("bad/path"));
    }

    #[test]
    fn test_success_logs_both_paths() {
        let logger = Arc::new(MemoryLogger::new());
        let observer = LoggingObserver::new(logger.clone());
        let report = UploadReport::new("dest/key.tar.gz", "src/key", Default::default());

        observer.on_engine_success(&Broker::new(), &report);

        assert!(logger.contains("Relocated src/key to dest/key.tar.gz"));
    }

    #[test]
    fn test_missing_source_path_is_tolerated() {
        let logger = Arc::new(MemoryLogger::new());
        let observer = LoggingObserver::new(logger.clone());
        observer.on_recv(&Broker::new());
        assert!(logger.contains("<unknown>"));
    }
}

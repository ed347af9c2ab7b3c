//! Prometheus metric names.
//!
//! Dashboards and alerts key on these, so they are kept in one place and
//! treated as a stable interface.

/// Messages taken off the queue.
pub const RECEIVED_TOTAL: &str = "ccx_consumer_received_total";

/// Archives retrieved locally.
pub const DOWNLOADED_TOTAL: &str = "ccx_downloaded_total";

/// Messages the engine produced a result for.
pub const PROCESSED_TOTAL: &str = "ccx_engine_processed_total";

/// Messages the engine did not finish in time.
pub const PROCESS_TIMEOUTS_TOTAL: &str = "ccx_engine_processed_timeout_total";

/// Results published downstream.
pub const PUBLISHED_TOTAL: &str = "ccx_published_total";

/// Messages the host gave up on.
pub const FAILURES_TOTAL: &str = "ccx_failures_total";

/// Messages skipped by the host's filters.
pub const NOT_HANDLED_TOTAL: &str = "ccx_not_handled_total";

/// Seconds between receiving a message and having its archive locally.
pub const DOWNLOAD_DURATION_SECONDS: &str = "ccx_download_duration_seconds";

/// Seconds the engine spent on the last archive.
pub const PROCESS_DURATION_SECONDS: &str = "ccx_process_duration_seconds";

/// Seconds between the engine result and its publication.
pub const PUBLISH_DURATION_SECONDS: &str = "ccx_publish_duration_seconds";

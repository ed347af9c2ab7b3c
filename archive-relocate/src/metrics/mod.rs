//! Prometheus metrics for the pipeline.
//!
//! [`StatsObserver`] is an [`Observer`](crate::observer::Observer) that
//! counts messages through the consumer phases and records how long the last
//! message spent in each. Its registry is served over HTTP by a
//! [`MetricsExporter`] running on its own thread.
//!
//! ```no_run
//! use archive_relocate::log::TracingLogger;
//! use archive_relocate::metrics::{MetricsPort, StatsObserver};
//! use std::sync::Arc;
//!
//! let port: MetricsPort = "9500".parse()?;
//! let stats = StatsObserver::new(port, Arc::new(TracingLogger::new()))?;
//! # Ok::<(), archive_relocate::metrics::MetricsError>(())
//! ```

mod exporter;
pub mod names;
mod port;
mod stats;

pub use exporter::{encode_text, MetricsExporter};
pub use port::{MetricsError, MetricsPort, DEFAULT_METRICS_PORT, MIN_METRICS_PORT};
pub use stats::StatsObserver;

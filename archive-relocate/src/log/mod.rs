//! Logging abstraction layer.
//!
//! Components never reach for a global logger. Each one is handed an
//! `Arc<dyn Logger>` at construction and tags every record with the name of
//! the component that emitted it, so a relocation stage and the observers
//! attached to it can be told apart in the output.
//!
//! # Architecture
//!
//! - `Logger` trait: the interface that all components use for logging
//! - `TracingLogger`: production adapter that delegates to the `tracing` crate
//! - `NoOpLogger`: silent logger for tests and benchmarks
//! - `MemoryLogger`: captures records so tests can assert on them
//!
//! # Usage
//!
//! ```
//! use archive_relocate::log::{Logger, NoOpLogger};
//! use archive_relocate::{log_debug, log_info};
//! use std::sync::Arc;
//!
//! struct Mover {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! impl Mover {
//!     fn run(&self, key: &str) {
//!         log_info!(self.logger, "mover", "Moving {}", key);
//!         log_debug!(self.logger, "mover", "Moved {}", key);
//!     }
//! }
//!
//! Mover { logger: Arc::new(NoOpLogger) }.run("a/b");
//! ```

mod memory;
mod noop;
mod tracing_adapter;
mod r#trait;

pub use memory::{LogRecord, MemoryLogger};
pub use noop::NoOpLogger;
pub use r#trait::{LogLevel, Logger};
pub use tracing_adapter::TracingLogger;

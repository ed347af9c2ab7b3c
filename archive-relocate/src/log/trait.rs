//! Logger trait definition.

use std::fmt::{self, Arguments};

/// Log level for filtering messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Verbose debugging information
    Trace,
    /// Debugging information
    Debug,
    /// General information
    Info,
    /// Warning messages
    Warn,
    /// Error messages
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// Logging interface for pipeline components.
///
/// Every record carries the `component` that produced it (for example
/// `"relocate"` or `"stats"`). Implementations must be `Send + Sync` because
/// observers are shared with the metrics exporter thread.
pub trait Logger: Send + Sync {
    /// Log a message at the specified level on behalf of `component`.
    fn log(&self, level: LogLevel, component: &str, args: Arguments<'_>);

    /// Log a trace-level message.
    fn trace(&self, component: &str, args: Arguments<'_>) {
        self.log(LogLevel::Trace, component, args);
    }

    /// Log a debug-level message.
    fn debug(&self, component: &str, args: Arguments<'_>) {
        self.log(LogLevel::Debug, component, args);
    }

    /// Log an info-level message.
    fn info(&self, component: &str, args: Arguments<'_>) {
        self.log(LogLevel::Info, component, args);
    }

    /// Log a warning-level message.
    fn warn(&self, component: &str, args: Arguments<'_>) {
        self.log(LogLevel::Warn, component, args);
    }

    /// Log an error-level message.
    fn error(&self, component: &str, args: Arguments<'_>) {
        self.log(LogLevel::Error, component, args);
    }
}

/// Convenience macros: `log_info!(logger, "component", "format {}", arg)`.
#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $component:expr, $($arg:tt)*) => {
        $logger.trace($component, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $component:expr, $($arg:tt)*) => {
        $logger.debug($component, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $component:expr, $($arg:tt)*) => {
        $logger.info($component, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $component:expr, $($arg:tt)*) => {
        $logger.warn($component, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $component:expr, $($arg:tt)*) => {
        $logger.error($component, format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("INFO".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!(" debug ".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_level_display_round_trips_through_parse() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(level.to_string().parse::<LogLevel>(), Ok(level));
        }
    }
}

//! Observer that turns pipeline hooks into Prometheus counters and gauges.

use super::exporter::{encode_text, MetricsExporter};
use super::names;
use super::port::{MetricsError, MetricsPort};
use crate::broker::Broker;
use crate::log::Logger;
use crate::observer::Observer;
use parking_lot::Mutex;
use prometheus::{Gauge, IntCounter, Opts, Registry};
use std::error::Error;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// When the current message entered each phase.
#[derive(Debug, Default)]
struct PhaseClock {
    received: Option<Instant>,
    downloaded: Option<Instant>,
    processed: Option<Instant>,
}

/// Seconds since `start`, or `None` if the phase was never entered.
fn elapsed_since(start: Option<Instant>, now: Instant) -> Option<f64> {
    start.map(|t| now.saturating_duration_since(t).as_secs_f64())
}

struct Metrics {
    received: IntCounter,
    downloaded: IntCounter,
    processed: IntCounter,
    process_timeouts: IntCounter,
    published: IntCounter,
    failures: IntCounter,
    not_handled: IntCounter,
    download_duration: Gauge,
    process_duration: Gauge,
    publish_duration: Gauge,
}

impl Metrics {
    fn register(registry: &Registry) -> Result<Self, MetricsError> {
        let counter = |name: &str, help: &str| -> Result<IntCounter, MetricsError> {
            let c = IntCounter::with_opts(Opts::new(name, help))?;
            registry.register(Box::new(c.clone()))?;
            Ok(c)
        };
        let gauge = |name: &str, help: &str| -> Result<Gauge, MetricsError> {
            let g = Gauge::with_opts(Opts::new(name, help))?;
            registry.register(Box::new(g.clone()))?;
            Ok(g)
        };

        Ok(Self {
            received: counter(names::RECEIVED_TOTAL, "Counter of received messages")?,
            downloaded: counter(names::DOWNLOADED_TOTAL, "Counter of downloaded items")?,
            processed: counter(names::PROCESSED_TOTAL, "Counter of files processed by the engine")?,
            process_timeouts: counter(
                names::PROCESS_TIMEOUTS_TOTAL,
                "Counter of files that timed out while processing",
            )?,
            published: counter(names::PUBLISHED_TOTAL, "Counter of published results")?,
            failures: counter(names::FAILURES_TOTAL, "Counter of failures during the pipeline")?,
            not_handled: counter(
                names::NOT_HANDLED_TOTAL,
                "Counter of received messages that were not handled",
            )?,
            download_duration: gauge(
                names::DOWNLOAD_DURATION_SECONDS,
                "Seconds spent downloading the last archive",
            )?,
            process_duration: gauge(
                names::PROCESS_DURATION_SECONDS,
                "Seconds spent processing the last archive",
            )?,
            publish_duration: gauge(
                names::PUBLISH_DURATION_SECONDS,
                "Seconds spent publishing the last result",
            )?,
        })
    }
}

/// Tracks pipeline counters and phase durations for Prometheus.
///
/// Counters and gauges are atomic; only the phase timestamps sit behind a
/// lock. The clock tracks a single in-flight message, which matches a host
/// that handles one message at a time.
pub struct StatsObserver {
    registry: Registry,
    metrics: Metrics,
    clock: Mutex<PhaseClock>,
    exporter: Option<MetricsExporter>,
}

impl StatsObserver {
    /// Create the observer and serve its metrics on `port`.
    ///
    /// The endpoint reports its lifecycle through `logger`.
    pub fn new(port: MetricsPort, logger: Arc<dyn Logger>) -> Result<Self, MetricsError> {
        Self::bind(port.socket_addr(), logger)
    }

    /// Create the observer and serve its metrics on an explicit address.
    pub fn bind(addr: SocketAddr, logger: Arc<dyn Logger>) -> Result<Self, MetricsError> {
        let mut observer = Self::unexported()?;
        observer.exporter = Some(MetricsExporter::start(
            observer.registry.clone(),
            addr,
            logger,
        )?);
        Ok(observer)
    }

    /// Create the observer without an HTTP endpoint.
    pub fn unexported() -> Result<Self, MetricsError> {
        let registry = Registry::new();
        let metrics = Metrics::register(&registry)?;
        Ok(Self {
            registry,
            metrics,
            clock: Mutex::new(PhaseClock::default()),
            exporter: None,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Address of the HTTP endpoint, if one is running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.exporter.as_ref().map(MetricsExporter::local_addr)
    }

    /// Current metrics in the Prometheus text format.
    pub fn gather_text(&self) -> Result<String, MetricsError> {
        encode_text(&self.registry)
    }

    pub fn received(&self) -> u64 {
        self.metrics.received.get()
    }

    pub fn downloaded(&self) -> u64 {
        self.metrics.downloaded.get()
    }

    pub fn processed(&self) -> u64 {
        self.metrics.processed.get()
    }

    pub fn process_timeouts(&self) -> u64 {
        self.metrics.process_timeouts.get()
    }

    pub fn published(&self) -> u64 {
        self.metrics.published.get()
    }

    pub fn failures(&self) -> u64 {
        self.metrics.failures.get()
    }

    pub fn not_handled(&self) -> u64 {
        self.metrics.not_handled.get()
    }

    /// Last download duration in seconds.
    pub fn download_duration(&self) -> f64 {
        self.metrics.download_duration.get()
    }

    /// Last processing duration in seconds.
    pub fn process_duration(&self) -> f64 {
        self.metrics.process_duration.get()
    }

    /// Last publish duration in seconds.
    pub fn publish_duration(&self) -> f64 {
        self.metrics.publish_duration.get()
    }
}

impl Observer for StatsObserver {
    fn on_recv(&self, _broker: &Broker) {
        self.metrics.received.inc();
        *self.clock.lock() = PhaseClock {
            received: Some(Instant::now()),
            ..PhaseClock::default()
        };
    }

    fn on_download(&self, _local_path: &Path) {
        self.metrics.downloaded.inc();
        let now = Instant::now();
        let mut clock = self.clock.lock();
        if let Some(secs) = elapsed_since(clock.received, now) {
            self.metrics.download_duration.set(secs);
        }
        clock.downloaded = Some(now);
    }

    fn on_process(&self, _broker: &Broker, _result: &str) {
        self.metrics.processed.inc();
        let now = Instant::now();
        let mut clock = self.clock.lock();
        if let Some(secs) = elapsed_since(clock.downloaded, now) {
            self.metrics.process_duration.set(secs);
        }
        clock.processed = Some(now);
    }

    fn on_process_timeout(&self) {
        self.metrics.process_timeouts.inc();
    }

    fn on_consumer_success(&self, _broker: &Broker, _result: &str) {
        self.metrics.published.inc();
        let now = Instant::now();
        let clock = self.clock.lock();
        if let Some(secs) = elapsed_since(clock.processed, now) {
            self.metrics.publish_duration.set(secs);
        }
    }

    fn on_consumer_failure(&self, _broker: &Broker, _error: &dyn Error) {
        self.metrics.failures.inc();
    }

    fn on_not_handled(&self, _broker: &Broker) {
        self.metrics.not_handled.inc();
    }
}

impl std::fmt::Debug for StatsObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsObserver")
            .field("received", &self.received())
            .field("exporter", &self.exporter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::thread::sleep;
    use std::time::Duration;

    fn observer() -> StatsObserver {
        StatsObserver::unexported().unwrap()
    }

    #[test]
    fn test_counters_start_at_zero() {
        let stats = observer();
        assert_eq!(stats.received(), 0);
        assert_eq!(stats.downloaded(), 0);
        assert_eq!(stats.processed(), 0);
        assert_eq!(stats.published(), 0);
        assert_eq!(stats.failures(), 0);
        assert_eq!(stats.not_handled(), 0);
        assert_eq!(stats.process_timeouts(), 0);
    }

    #[test]
    fn test_full_message_lifecycle() {
        let stats = observer();
        let broker = Broker::new();

        stats.on_recv(&broker);
        sleep(Duration::from_millis(5));
        stats.on_download(Path::new("/tmp/archive.tgz"));
        sleep(Duration::from_millis(5));
        stats.on_process(&broker, "{}");
        sleep(Duration::from_millis(5));
        stats.on_consumer_success(&broker, "{}");

        assert_eq!(stats.received(), 1);
        assert_eq!(stats.downloaded(), 1);
        assert_eq!(stats.processed(), 1);
        assert_eq!(stats.published(), 1);
        assert!(stats.download_duration() >= 0.005);
        assert!(stats.process_duration() >= 0.005);
        assert!(stats.publish_duration() >= 0.005);
    }

    #[test]
    fn test_download_without_recv_leaves_gauge_untouched() {
        let stats = observer();
        stats.on_download(Path::new("/tmp/a"));
        assert_eq!(stats.downloaded(), 1);
        assert_eq!(stats.download_duration(), 0.0);
    }

    #[test]
    fn test_recv_resets_phase_timestamps() {
        let stats = observer();
        let broker = Broker::new();

        stats.on_recv(&broker);
        stats.on_download(Path::new("/tmp/a"));
        stats.on_process(&broker, "{}");
        let before = stats.process_duration();

        stats.on_recv(&broker);
        stats.on_process(&broker, "{}");
        assert_eq!(stats.process_duration(), before);
        assert_eq!(stats.processed(), 2);
    }

    #[test]
    fn test_failure_counters() {
        let stats = observer();
        let broker = Broker::new();
        let error = io::Error::new(io::ErrorKind::Other, "boom");

        stats.on_consumer_failure(&broker, &error);
        stats.on_consumer_failure(&broker, &error);
        stats.on_not_handled(&broker);
        stats.on_process_timeout();

        assert_eq!(stats.failures(), 2);
        assert_eq!(stats.not_handled(), 1);
        assert_eq!(stats.process_timeouts(), 1);
    }

    #[test]
    fn test_gather_text_lists_all_metrics() {
        let stats = observer();
        stats.on_recv(&Broker::new());
        let text = stats.gather_text().unwrap();

        assert!(text.contains(&format!("{} 1", names::RECEIVED_TOTAL)));
        for name in [
            names::DOWNLOADED_TOTAL,
            names::PROCESSED_TOTAL,
            names::PROCESS_TIMEOUTS_TOTAL,
            names::PUBLISHED_TOTAL,
            names::FAILURES_TOTAL,
            names::NOT_HANDLED_TOTAL,
            names::DOWNLOAD_DURATION_SECONDS,
            names::PROCESS_DURATION_SECONDS,
            names::PUBLISH_DURATION_SECONDS,
        ] {
            assert!(text.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_unexported_has_no_address() {
        assert!(observer().local_addr().is_none());
    }

    #[test]
    fn test_observers_have_independent_registries() {
        let a = observer();
        let b = observer();
        a.on_not_handled(&Broker::new());
        assert_eq!(a.not_handled(), 1);
        assert_eq!(b.not_handled(), 0);
    }
}

//! The exporter's own metrics: remote call latency and outcome, cache refreshes and scrape duration.

use eyre::Result;
use prometheus::{
    proto::MetricFamily,
    Histogram,
    HistogramOpts,
    HistogramVec,
    IntCounter,
    IntCounterVec,
    Opts,
    Registry,
};
use std::time::Duration;

/// Registry owning every self-metric. Cloning shares the underlying collectors.
#[derive(Clone)]
pub struct ExporterMetrics {
    registry: Registry,
    request_latency: HistogramVec,
    failed_request_latency: HistogramVec,
    request_counter: IntCounter,
    failed_request_counter: IntCounterVec,
    cache_refreshes: IntCounterVec,
    scrape_duration: Histogram,
}

impl ExporterMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let request_latency = HistogramVec::new(
            HistogramOpts::new("aliyun_api_request_latency_seconds", "Aliyun API request latency"),
            &["api"],
        )?;
        let failed_request_latency = HistogramVec::new(
            HistogramOpts::new(
                "aliyun_api_failed_request_latency_seconds",
                "Aliyun API failed request latency",
            ),
            &["api"],
        )?;
        let request_counter = IntCounter::new("aliyun_api_request_counter", "Aliyun API request counter")?;
        let failed_request_counter = IntCounterVec::new(
            Opts::new("aliyun_api_failed_request_counter", "Aliyun API failed request counter"),
            &["api"],
        )?;
        let cache_refreshes = IntCounterVec::new(
            Opts::new("aliyun_rds_cache_refresh_total", "Number of cached query refreshes"),
            &["query"],
        )?;
        let scrape_duration = Histogram::with_opts(HistogramOpts::new(
            "aliyun_rds_scrape_duration_seconds",
            "Time spent assembling the metrics of one scrape",
        ))?;

        registry.register(Box::new(request_latency.clone()))?;
        registry.register(Box::new(failed_request_latency.clone()))?;
        registry.register(Box::new(request_counter.clone()))?;
        registry.register(Box::new(failed_request_counter.clone()))?;
        registry.register(Box::new(cache_refreshes.clone()))?;
        registry.register(Box::new(scrape_duration.clone()))?;

        Ok(Self {
            registry,
            request_latency,
            failed_request_latency,
            request_counter,
            failed_request_counter,
            cache_refreshes,
            scrape_duration,
        })
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    pub fn observe_success(&self, api: &str, elapsed: Duration) {
        self.request_latency
            .with_label_values(&[api])
            .observe(elapsed.as_secs_f64());
        self.request_counter.inc();
    }

    pub fn observe_failure(&self, api: &str, elapsed: Duration) {
        self.failed_request_latency
            .with_label_values(&[api])
            .observe(elapsed.as_secs_f64());
        self.request_counter.inc();
        self.failed_request_counter.with_label_values(&[api]).inc();
    }

    pub fn record_cache_refresh(&self, query: &str) {
        self.cache_refreshes.with_label_values(&[query]).inc();
    }

    pub fn observe_scrape(&self, elapsed: Duration) {
        self.scrape_duration.observe(elapsed.as_secs_f64());
    }

    pub fn requests(&self) -> u64 {
        self.request_counter.get()
    }

    pub fn failed_requests(&self, api: &str) -> u64 {
        self.failed_request_counter.with_label_values(&[api]).get()
    }

    pub fn cache_refreshes(&self, query: &str) -> u64 {
        self.cache_refreshes.with_label_values(&[query]).get()
    }
}

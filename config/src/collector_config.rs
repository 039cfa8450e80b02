use serde::{
    Deserialize,
    Serialize,
};
use std::time::Duration;
use url::Url;

/// Tuning for the collection pipeline. All fields have defaults, so the section may be omitted entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// RDS API endpoint.
    pub endpoint: Url,
    /// Page size used when listing instances.
    pub page_size: u32,
    /// Maximum number of remote calls in flight during one fan-out.
    pub workers: usize,
    /// Length of the time window requested for performance data.
    pub performance_window_seconds: u64,
    pub request_timeout_seconds: u64,
    pub ttl: TtlConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse("https://rds.aliyuncs.com/").expect("valid default endpoint"),
            page_size: 20,
            workers: 50,
            performance_window_seconds: 180,
            request_timeout_seconds: 10,
            ttl: TtlConfig::default(),
        }
    }
}

impl CollectorConfig {
    pub fn performance_window(&self) -> Duration {
        Duration::from_secs(self.performance_window_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Time-to-live of each cached query, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtlConfig {
    pub instances: u64,
    pub performance: u64,
    pub details: u64,
    pub resource_usage: u64,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            instances: 300,
            performance: 50,
            details: 60,
            resource_usage: 60,
        }
    }
}

impl TtlConfig {
    pub fn instances(&self) -> Duration {
        Duration::from_secs(self.instances)
    }

    pub fn performance(&self) -> Duration {
        Duration::from_secs(self.performance)
    }

    pub fn details(&self) -> Duration {
        Duration::from_secs(self.details)
    }

    pub fn resource_usage(&self) -> Duration {
        Duration::from_secs(self.resource_usage)
    }
}

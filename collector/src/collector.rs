use prometheus::proto::MetricFamily;
use std::{
    future::Future,
    pin::Pin,
};

/// Something that can be scraped for metric families
pub trait Collector: Send + Sync {
    /// Collect every family available right now. Never fails: missing data is simply absent from the result.
    fn collect(&self) -> Pin<Box<dyn Future<Output = Vec<MetricFamily>> + Send + '_>>;
}

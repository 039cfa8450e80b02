use crate::{
    collector::Collector,
    metrics::ExporterMetrics,
    queries::QueryLayer,
    transform::{
        detail_observations,
        performance_observations,
        resource_usage_observations,
        status_observations,
        Observation,
    },
};
use aliyun_rds_client::RemoteClient;
use eyre::Result;
use prometheus::proto::{
    Gauge,
    LabelPair,
    Metric,
    MetricFamily,
    MetricType,
};
use rds_exporter_config::Config;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::Arc,
    time::Instant,
};

/// Drives the cached queries and the transformers on every scrape
pub struct Orchestrator {
    queries: QueryLayer,
    metrics: ExporterMetrics,
}

impl Orchestrator {
    /// Create an orchestrator with a fresh self-metrics registry
    pub fn new(config: Config, client: Arc<dyn RemoteClient>) -> Result<Self> {
        let metrics = ExporterMetrics::new()?;
        Ok(Self {
            queries: QueryLayer::new(config, client, metrics.clone()),
            metrics,
        })
    }

    pub fn metrics(&self) -> &ExporterMetrics {
        &self.metrics
    }

    async fn scrape(&self) -> Vec<MetricFamily> {
        let start = Instant::now();

        let (performance, resource_usage, instances, details) = futures::join!(
            self.queries.performance_samples(),
            self.queries.resource_usage(),
            self.queries.instances(),
            self.queries.instance_details(),
        );

        let observations = performance_observations(&performance)
            .chain(resource_usage_observations(&resource_usage))
            .chain(status_observations(&instances))
            .chain(detail_observations(&details));
        let families = group_families(observations);

        let elapsed = start.elapsed();
        self.metrics.observe_scrape(elapsed);
        debug!(families = families.len(), instances = instances.len(), ?elapsed, "scrape collected");
        families
    }
}

impl Collector for Orchestrator {
    fn collect(&self) -> Pin<Box<dyn Future<Output = Vec<MetricFamily>> + Send + '_>> {
        Box::pin(self.scrape())
    }
}

/// Fold observations into one gauge family per metric name, families ordered by first appearance.
pub fn group_families(observations: impl IntoIterator<Item = Observation>) -> Vec<MetricFamily> {
    let mut families: Vec<MetricFamily> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for observation in observations {
        let Observation {
            name,
            help,
            labels,
            value,
        } = observation;

        let slot = match index.get(&name) {
            Some(slot) => *slot,
            None => {
                let mut family = MetricFamily::default();
                family.set_name(name.clone());
                family.set_help(help.to_string());
                family.set_field_type(MetricType::GAUGE);
                families.push(family);
                index.insert(name, families.len() - 1);
                families.len() - 1
            }
        };

        let mut metric = Metric::default();
        for (label, value) in labels {
            let mut pair = LabelPair::default();
            pair.set_name(label.to_string());
            pair.set_value(value);
            metric.mut_label().push(pair);
        }
        let mut gauge = Gauge::default();
        gauge.set_value(value);
        metric.set_gauge(gauge);
        families[slot].mut_metric().push(metric);
    }

    families
}

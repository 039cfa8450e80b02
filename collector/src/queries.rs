use crate::{
    cache::TtlSlot,
    fan_out::FanOutExecutor,
    invoker::InstrumentedInvoker,
    metrics::ExporterMetrics,
    records::{
        InstancePage,
        InstanceRecord,
    },
    Payload,
};
use aliyun_rds_client::{
    ApiRequest,
    RemoteClient,
};
use chrono::{
    DateTime,
    Utc,
};
use rds_exporter_config::Config;
use std::sync::Arc;

/// Time format of the performance window bounds.
const WINDOW_FORMAT: &str = "%Y-%m-%dT%H:%MZ";

/// Upper bound on directory pages fetched in one refresh.
const MAX_DIRECTORY_PAGES: u32 = 1000;

/// The four upstream queries, each memoized in its own [`TtlSlot`].
///
/// Every accessor returns the cached dataset while it is fresh and refreshes it otherwise. Fetch failures never reach
/// the caller: a failed directory listing yields an empty directory, failed per-instance calls yield `None` payloads.
/// Cloning is cheap and shares the slots.
#[derive(Clone)]
pub struct QueryLayer {
    shared: Arc<Shared>,
}

struct Shared {
    config: Config,
    invoker: InstrumentedInvoker,
    fan_out: FanOutExecutor,
    metrics: ExporterMetrics,
    instances: TtlSlot<Vec<InstanceRecord>>,
    performance: TtlSlot<Vec<Payload>>,
    details: TtlSlot<Vec<Payload>>,
    resource_usage: TtlSlot<Vec<Payload>>,
}

impl QueryLayer {
    pub fn new(config: Config, client: Arc<dyn RemoteClient>, metrics: ExporterMetrics) -> Self {
        let invoker = InstrumentedInvoker::new(client, metrics.clone());
        let fan_out = FanOutExecutor::new(invoker.clone(), config.collector.workers);
        let ttl = &config.collector.ttl;
        let shared = Shared {
            instances: TtlSlot::new("instances", ttl.instances()),
            performance: TtlSlot::new("performance", ttl.performance()),
            details: TtlSlot::new("details", ttl.details()),
            resource_usage: TtlSlot::new("resource_usage", ttl.resource_usage()),
            config,
            invoker,
            fan_out,
            metrics,
        };
        Self {
            shared: Arc::new(shared),
        }
    }

    pub async fn instances(&self) -> Arc<Vec<InstanceRecord>> {
        let this = self.clone();
        self.shared
            .instances
            .get_or_refresh(move || async move {
                this.shared.metrics.record_cache_refresh(this.shared.instances.name());
                this.fetch_instances().await
            })
            .await
    }

    pub async fn performance_samples(&self) -> Arc<Vec<Payload>> {
        let this = self.clone();
        self.shared
            .performance
            .get_or_refresh(move || async move {
                this.shared.metrics.record_cache_refresh(this.shared.performance.name());
                let instances = this.instances().await;
                let requests = this.performance_requests(&instances, Utc::now());
                this.shared.fan_out.execute(requests).await
            })
            .await
    }

    pub async fn instance_details(&self) -> Arc<Vec<Payload>> {
        let this = self.clone();
        self.shared
            .details
            .get_or_refresh(move || async move {
                this.shared.metrics.record_cache_refresh(this.shared.details.name());
                let instances = this.instances().await;
                let requests = instances
                    .iter()
                    .map(|instance| ApiRequest::DescribeDbInstanceAttribute {
                        instance_id: instance.instance_id.clone(),
                    })
                    .collect();
                this.shared.fan_out.execute(requests).await
            })
            .await
    }

    pub async fn resource_usage(&self) -> Arc<Vec<Payload>> {
        let this = self.clone();
        self.shared
            .resource_usage
            .get_or_refresh(move || async move {
                this.shared.metrics.record_cache_refresh(this.shared.resource_usage.name());
                let instances = this.instances().await;
                let requests = instances
                    .iter()
                    .map(|instance| ApiRequest::DescribeResourceUsage {
                        instance_id: instance.instance_id.clone(),
                    })
                    .collect();
                this.shared.fan_out.execute(requests).await
            })
            .await
    }

    /// Page through the instance listing until a page reports zero records. Any failed page discards the whole
    /// listing. Stops after [`MAX_DIRECTORY_PAGES`] pages.
    async fn fetch_instances(&self) -> Vec<InstanceRecord> {
        let page_size = self.shared.config.collector.page_size;
        let mut instances = Vec::new();
        let mut page_number = 1;
        loop {
            if page_number > MAX_DIRECTORY_PAGES {
                warn!(
                    pages = MAX_DIRECTORY_PAGES,
                    count = instances.len(),
                    "instance listing did not end, keeping the pages listed so far"
                );
                break;
            }
            let request = ApiRequest::DescribeDbInstances { page_number, page_size };
            let Some(body) = self.shared.invoker.invoke(&request).await else {
                warn!(page_number, "instance listing failed, using empty directory");
                return Vec::new();
            };
            let page: InstancePage = match serde_json::from_slice(&body) {
                Ok(page) => page,
                Err(err) => {
                    error!(page_number, error = %err, "malformed instance listing, using empty directory");
                    return Vec::new();
                }
            };
            if page.page_record_count == 0 {
                break;
            }
            instances.extend(page.items.instances);
            page_number += 1;
        }
        info!(count = instances.len(), pages = page_number, "refreshed instance directory");
        instances
    }

    /// One request per (instance, performance key) pair, keys chosen by the instance's engine.
    fn performance_requests(&self, instances: &[InstanceRecord], now: DateTime<Utc>) -> Vec<ApiRequest> {
        let window = chrono::Duration::from_std(self.shared.config.collector.performance_window())
            .unwrap_or_else(|_| chrono::Duration::minutes(3));
        let start_time = (now - window).format(WINDOW_FORMAT).to_string();
        let end_time = now.format(WINDOW_FORMAT).to_string();

        instances
            .iter()
            .flat_map(|instance| {
                let keys = self.shared.config.performance_keys(&instance.engine);
                if keys.is_empty() {
                    debug!(instance = %instance.instance_id, engine = %instance.engine, "no performance keys for engine");
                }
                keys.iter().map(|key| ApiRequest::DescribeDbInstancePerformance {
                    instance_id: instance.instance_id.clone(),
                    key: key.clone(),
                    start_time: start_time.clone(),
                    end_time: end_time.clone(),
                })
            })
            .collect()
    }
}

//! Scripted [`RemoteClient`] used by the unit tests.

use aliyun_rds_client::{
    ApiRequest,
    RemoteClient,
};
use bytes::Bytes;
use std::{
    future::Future,
    pin::Pin,
    sync::{
        atomic::{
            AtomicUsize,
            Ordering,
        },
        Arc,
        Mutex,
    },
    time::Duration,
};

type Handler = dyn Fn(&ApiRequest) -> eyre::Result<serde_json::Value> + Send + Sync;
type Delay = dyn Fn(&ApiRequest) -> Duration + Send + Sync;

/// Answers requests from a closure and records what was asked.
pub(crate) struct ScriptedClient {
    handler: Box<Handler>,
    delay: Box<Delay>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedClient {
    pub(crate) fn new(
        handler: impl Fn(&ApiRequest) -> eyre::Result<serde_json::Value> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self::build(handler, |_| Duration::ZERO))
    }

    pub(crate) fn with_delay(
        handler: impl Fn(&ApiRequest) -> eyre::Result<serde_json::Value> + Send + Sync + 'static,
        delay: impl Fn(&ApiRequest) -> Duration + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self::build(handler, delay))
    }

    fn build(
        handler: impl Fn(&ApiRequest) -> eyre::Result<serde_json::Value> + Send + Sync + 'static,
        delay: impl Fn(&ApiRequest) -> Duration + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            delay: Box::new(delay),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn calls_for(&self, action: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.action() == action)
            .count()
    }
}

impl RemoteClient for ScriptedClient {
    fn invoke(&self, request: &ApiRequest) -> Pin<Box<dyn Future<Output = eyre::Result<Bytes>> + Send + '_>> {
        let request = request.clone();
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let delay = (self.delay)(&request);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let result = (self.handler)(&request).map(|value| Bytes::from(value.to_string()));

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        })
    }
}

/// A directory page as returned by `DescribeDBInstances`.
pub(crate) fn directory_page(ids: &[&str]) -> serde_json::Value {
    let items = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "DBInstanceId": id,
                "DBInstanceDescription": format!("{id} description"),
                "DBInstanceStatus": "Running",
                "DBInstanceType": "Primary",
                "Engine": "MySQL",
                "EngineVersion": "8.0",
                "CreateTime": "2023-01-01T00:00:00Z",
                "ExpireTime": "",
                "LockMode": "Unlock",
                "PayType": "Postpaid",
                "RegionId": "cn-hangzhou",
            })
        })
        .collect::<Vec<_>>();
    serde_json::json!({
        "PageNumber": 1,
        "PageRecordCount": ids.len(),
        "TotalRecordCount": ids.len(),
        "Items": { "DBInstance": items },
    })
}

pub(crate) fn test_config() -> rds_exporter_config::Config {
    rds_exporter_config::Config {
        server: Default::default(),
        credential: rds_exporter_config::Credentials {
            access_key_id: "id".to_string(),
            access_key_secret: "secret".to_string(),
            region_id: "cn-hangzhou".to_string(),
        },
        performance_list: [(
            "MySQL".to_string(),
            vec!["MySQL_MemCpuUsage".to_string(), "MySQL_IOPS".to_string()],
        )]
        .into_iter()
        .collect(),
        collector: Default::default(),
    }
}

use crate::{
    metrics::ExporterMetrics,
    Payload,
};
use aliyun_rds_client::{
    ApiRequest,
    RemoteClient,
};
use std::{
    sync::Arc,
    time::Instant,
};

/// Wraps every remote call with latency and outcome metrics.
///
/// Failures never propagate: they are logged, counted and turned into the `None` sentinel so that callers can carry on
/// with whatever data the other calls produced.
#[derive(Clone)]
pub struct InstrumentedInvoker {
    client: Arc<dyn RemoteClient>,
    metrics: ExporterMetrics,
}

impl InstrumentedInvoker {
    pub fn new(client: Arc<dyn RemoteClient>, metrics: ExporterMetrics) -> Self {
        Self { client, metrics }
    }

    pub async fn invoke(&self, request: &ApiRequest) -> Payload {
        let api = request.action();
        let start = Instant::now();
        match self.client.invoke(request).await {
            Ok(body) => {
                let elapsed = start.elapsed();
                self.metrics.observe_success(api, elapsed);
                debug!(api, instance = ?request.instance_id(), ?elapsed, len = body.len(), "Aliyun API response");
                Some(body)
            }
            Err(err) => {
                self.metrics.observe_failure(api, start.elapsed());
                error!(api, instance = ?request.instance_id(), error = ?err, "Error requesting Aliyun API");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedClient;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn success_returns_payload() {
        let client = ScriptedClient::new(|_| Ok(serde_json::json!({ "ok": true })));
        let metrics = ExporterMetrics::new().unwrap();
        let invoker = InstrumentedInvoker::new(client.clone(), metrics.clone());

        let payload = invoker
            .invoke(&ApiRequest::DescribeResourceUsage {
                instance_id: "rm-1".to_string(),
            })
            .await;

        assert_eq!(payload.as_deref(), Some(br#"{"ok":true}"#.as_slice()));
        assert_eq!(metrics.requests(), 1);
        assert_eq!(metrics.failed_requests("DescribeResourceUsage"), 0);
    }

    #[tokio::test]
    async fn failure_becomes_sentinel() {
        let client = ScriptedClient::new(|_| Err(eyre::eyre!("connection reset")));
        let metrics = ExporterMetrics::new().unwrap();
        let invoker = InstrumentedInvoker::new(client.clone(), metrics.clone());

        let payload = invoker
            .invoke(&ApiRequest::DescribeDbInstanceAttribute {
                instance_id: "rm-1".to_string(),
            })
            .await;

        assert!(payload.is_none());
        assert_eq!(client.calls(), 1);
        assert_eq!(metrics.requests(), 1);
        assert_eq!(metrics.failed_requests("DescribeDBInstanceAttribute"), 1);
    }
}

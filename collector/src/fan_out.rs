use crate::{
    invoker::InstrumentedInvoker,
    Payload,
};
use aliyun_rds_client::ApiRequest;
use futures::{
    stream,
    StreamExt as _,
};

/// Runs a batch of independent requests with a bounded number in flight.
///
/// The result at index `i` always belongs to the request at index `i`, regardless of completion order. Failed requests
/// leave a `None` in their slot and do not affect their siblings.
#[derive(Clone)]
pub struct FanOutExecutor {
    invoker: InstrumentedInvoker,
    width: usize,
}

impl FanOutExecutor {
    pub fn new(invoker: InstrumentedInvoker, width: usize) -> Self {
        Self {
            invoker,
            width: width.max(1),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub async fn execute(&self, requests: Vec<ApiRequest>) -> Vec<Payload> {
        let count = requests.len();
        let started = std::time::Instant::now();
        let results = stream::iter(requests)
            .map(|request| {
                let invoker = self.invoker.clone();
                async move { invoker.invoke(&request).await }
            })
            .buffered(self.width)
            .collect::<Vec<_>>()
            .await;

        let failed = results.iter().filter(|result| result.is_none()).count();
        debug!(count, failed, elapsed = ?started.elapsed(), "fan-out finished");
        results
    }
}

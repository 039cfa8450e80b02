use crate::{
    request::API_VERSION,
    signature::sign,
    ApiRequest,
    RemoteClient,
};
use bytes::Bytes;
use chrono::Utc;
use eyre::{
    bail,
    Context as _,
    Result,
};
use std::{
    future::Future,
    pin::Pin,
    time::Duration,
};
use url::Url;

/// Validated access credentials. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub access_key_secret: String,
    pub region_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"<redacted>")
            .field("region_id", &self.region_id)
            .finish()
    }
}

/// Signs and sends RPC style requests to the RDS control plane.
#[derive(Debug, Clone)]
pub struct AliyunRpcClient {
    endpoint: Url,
    credentials: Credentials,
    http_client: reqwest::Client,
}

impl AliyunRpcClient {
    pub fn new(endpoint: Url, credentials: Credentials, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            endpoint,
            credentials,
            http_client,
        })
    }

    /// Common parameters plus the action parameters, including the signature.
    fn signed_params(&self, request: &ApiRequest) -> Vec<(String, String)> {
        let mut params = vec![
            ("Format".to_string(), "JSON".to_string()),
            ("Version".to_string(), API_VERSION.to_string()),
            ("AccessKeyId".to_string(), self.credentials.access_key_id.clone()),
            ("SignatureMethod".to_string(), "HMAC-SHA1".to_string()),
            ("SignatureVersion".to_string(), "1.0".to_string()),
            ("SignatureNonce".to_string(), uuid::Uuid::new_v4().to_string()),
            ("Timestamp".to_string(), Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()),
            ("Action".to_string(), request.action().to_string()),
            ("RegionId".to_string(), self.credentials.region_id.clone()),
        ];
        params.extend(
            request
                .params()
                .into_iter()
                .map(|(key, value)| (key.to_string(), value)),
        );
        let signature = sign(&self.credentials.access_key_secret, &params);
        params.push(("Signature".to_string(), signature));
        params
    }

    async fn send(&self, request: &ApiRequest) -> Result<Bytes> {
        let params = self.signed_params(request);
        let response = self
            .http_client
            .get(self.endpoint.clone())
            .query(&params)
            .send()
            .await
            .wrap_err_with(|| format!("{} request failed", request.action()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .wrap_err_with(|| format!("Failed to read {} response body", request.action()))?;
        if !status.is_success() {
            bail!(
                "{} returned {}: {}",
                request.action(),
                status,
                String::from_utf8_lossy(&body)
            );
        }
        trace!(action = request.action(), len = body.len(), "received response");
        Ok(body)
    }
}

impl RemoteClient for AliyunRpcClient {
    fn invoke(&self, request: &ApiRequest) -> Pin<Box<dyn Future<Output = Result<Bytes>> + Send + '_>> {
        let request = request.clone();
        Box::pin(async move { self.send(&request).await })
    }
}

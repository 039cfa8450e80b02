//! # Aliyun RDS Client
//!
//! Typed request descriptors for the four RDS control-plane actions the exporter needs and a signed RPC client
//! that executes them.
//!
//! - **`ApiRequest`**: One remote call, identified by its action name and parameters
//! - **`RemoteClient`**: The seam the collector talks to. Returns the raw JSON payload or an error
//! - **`AliyunRpcClient`**: Production implementation signing requests with the RPC signature v1 scheme

#[macro_use]
extern crate tracing;

mod request;
mod rpc;
mod signature;

pub use request::ApiRequest;
pub use rpc::{
    AliyunRpcClient,
    Credentials,
};
pub use signature::sign;

use bytes::Bytes;
use std::{
    future::Future,
    pin::Pin,
};

/// Executes a single request against the control plane.
pub trait RemoteClient: Send + Sync {
    /// Issue `request` once and return the raw response body.
    fn invoke(&self, request: &ApiRequest) -> Pin<Box<dyn Future<Output = eyre::Result<Bytes>> + Send + '_>>;
}

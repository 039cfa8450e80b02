//! # Aliyun RDS Collector
//!
//! Turns the Aliyun RDS control plane into Prometheus metric families.
//!
//! ## Architecture
//!
//! Data flows one way, from the scrape down to the remote API:
//!
//! - **`orchestrator`**: [`Orchestrator`] drives one scrape and groups observations into gauge families
//! - **`queries`**: [`QueryLayer`] memoizes the instance directory and the three per-instance datasets, each in its
//!   own [`TtlSlot`]
//! - **`fan_out`**: [`FanOutExecutor`] issues a batch of requests with bounded concurrency, keeping input order
//! - **`invoker`**: [`InstrumentedInvoker`] times every call and turns failures into the `None` sentinel
//! - **`transform`**: pure mappings from cached datasets to [`Observation`]s
//! - **`metrics`**: [`ExporterMetrics`], the exporter's own registry
//!
//! A scrape never fails. Whatever could not be fetched or parsed is logged, counted and left out.

#[macro_use]
extern crate tracing;

pub mod cache;
pub mod collector;
pub mod fan_out;
pub mod invoker;
pub mod metrics;
pub mod orchestrator;
pub mod queries;
pub mod records;
pub mod transform;

#[cfg(test)]
mod testing;

pub use cache::TtlSlot;
pub use collector::Collector;
pub use fan_out::FanOutExecutor;
pub use invoker::InstrumentedInvoker;
pub use metrics::ExporterMetrics;
pub use orchestrator::Orchestrator;
pub use queries::QueryLayer;
pub use transform::Observation;

/// Raw body of one remote call, `None` when the call failed.
pub type Payload = Option<bytes::Bytes>;

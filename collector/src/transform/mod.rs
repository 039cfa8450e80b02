//! # Transformers
//!
//! Pure mappings from a cached dataset to a lazy sequence of gauge [`Observation`]s. Records that cannot be used
//! (failed calls, unparsable payloads, empty series) are skipped with a warning and never abort the sequence.

mod detail;
mod performance;
mod resource_usage;
mod status;

pub use detail::detail_observations;
pub use performance::performance_observations;
pub use resource_usage::resource_usage_observations;
pub use status::status_observations;

use crate::Payload;
use serde::de::DeserializeOwned;

/// A single gauge sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub name: String,
    pub help: &'static str,
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
}

impl Observation {
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(label, _)| *label == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Replace every character that is not allowed in a Prometheus metric name with `_`.
pub fn sanitize_metric_name(name: &str) -> String {
    name.chars()
        .enumerate()
        .map(|(i, c)| match c {
            'a'..='z' | 'A'..='Z' | '_' | ':' => c,
            '0'..='9' if i > 0 => c,
            _ => '_',
        })
        .collect()
}

/// Decode the payload at `index`. Sentinels and malformed payloads are logged and yield `None`.
fn decode<T: DeserializeOwned>(dataset: &'static str, index: usize, payload: &Payload) -> Option<T> {
    let Some(body) = payload else {
        warn!(dataset, index, "no data, request failed");
        return None;
    };
    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(dataset, index, error = %err, "malformed payload");
            None
        }
    }
}

//! Typed views of the RDS API payloads.
//!
//! Upstream fields are loosely typed (numbers arrive as strings and vice versa, optional fields come back as `null`),
//! so the string and number fields deserialize leniently.

use serde::{
    Deserialize,
    Deserializer,
};
use serde_json::Value;

/// Conversion factor of `DBInstanceMemory` (MiB) to bytes.
pub const MIB: u64 = 1024 * 1024;

/// Separator of compound performance values and formats, e.g. `"10&20"` and `"cpu&mem"`.
pub const PERFORMANCE_SEPARATOR: char = '&';

/// One database instance as listed by `DescribeDBInstances`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InstanceRecord {
    #[serde(rename = "DBInstanceId", deserialize_with = "lenient_string")]
    pub instance_id: String,
    #[serde(rename = "DBInstanceDescription", deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(rename = "DBInstanceStatus", deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(rename = "DBInstanceType", deserialize_with = "lenient_string")]
    pub instance_type: String,
    #[serde(rename = "Engine", deserialize_with = "lenient_string")]
    pub engine: String,
    #[serde(rename = "EngineVersion", deserialize_with = "lenient_string")]
    pub engine_version: String,
    #[serde(rename = "CreateTime", deserialize_with = "lenient_string")]
    pub create_time: String,
    #[serde(rename = "ExpireTime", deserialize_with = "lenient_string")]
    pub expire_time: String,
    #[serde(rename = "LockMode", deserialize_with = "lenient_string")]
    pub lock_mode: String,
    #[serde(rename = "PayType", deserialize_with = "lenient_string")]
    pub pay_type: String,
    #[serde(rename = "RegionId", deserialize_with = "lenient_string")]
    pub region_id: String,
}

impl InstanceRecord {
    pub fn is_empty(&self) -> bool {
        self.instance_id.is_empty()
    }
}

/// One page of `DescribeDBInstances`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstancePage {
    pub page_record_count: u64,
    #[serde(default)]
    pub items: InstanceItems,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstanceItems {
    #[serde(rename = "DBInstance", default)]
    pub instances: Vec<InstanceRecord>,
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

/// Latest value of one performance key of one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceSample {
    pub instance_id: String,
    pub key: String,
    pub unit: String,
    pub value_format: String,
    pub value: String,
}

impl PerformanceSample {
    /// Pair up the sub-metric names of the value format with the sub-values.
    ///
    /// Returns `None` if the two sequences have different lengths or are empty.
    pub fn sub_metrics(&self) -> Option<Vec<(&str, &str)>> {
        let names = self.value_format.split(PERFORMANCE_SEPARATOR).collect::<Vec<_>>();
        let values = self.value.split(PERFORMANCE_SEPARATOR).collect::<Vec<_>>();
        if self.value.is_empty() || names.len() != values.len() {
            return None;
        }
        Some(names.into_iter().zip(values).collect())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PerformanceResponse {
    #[serde(rename = "DBInstanceId", deserialize_with = "lenient_string", default)]
    pub instance_id: String,
    #[serde(default)]
    pub performance_keys: PerformanceKeys,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PerformanceKeys {
    #[serde(rename = "PerformanceKey", default)]
    pub keys: Vec<PerformanceKey>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PerformanceKey {
    #[serde(deserialize_with = "lenient_string")]
    pub key: String,
    #[serde(deserialize_with = "lenient_string")]
    pub unit: String,
    #[serde(deserialize_with = "lenient_string")]
    pub value_format: String,
    pub values: PerformanceValues,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PerformanceValues {
    #[serde(rename = "PerformanceValue", default)]
    pub values: Vec<PerformanceValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PerformanceValue {
    #[serde(deserialize_with = "lenient_string")]
    pub value: String,
    #[serde(deserialize_with = "lenient_string")]
    pub date: String,
}

impl PerformanceResponse {
    /// The most recent sample of every key in the response. Keys without any value in the window are left out.
    pub fn latest_samples(self) -> impl Iterator<Item = PerformanceSample> {
        let instance_id = self.instance_id;
        self.performance_keys.keys.into_iter().filter_map(move |key| {
            let latest = key.values.values.into_iter().last()?;
            Some(PerformanceSample {
                instance_id: instance_id.clone(),
                key: key.key,
                unit: key.unit,
                value_format: key.value_format,
                value: latest.value,
            })
        })
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

/// Memory and CPU of one instance, from `DescribeDBInstanceAttribute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDetail {
    pub instance_id: String,
    pub memory_bytes: u64,
    pub cpu: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeResponse {
    #[serde(default)]
    pub items: AttributeItems,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttributeItems {
    #[serde(rename = "DBInstanceAttribute", default)]
    pub attributes: Vec<InstanceAttribute>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InstanceAttribute {
    #[serde(rename = "DBInstanceId", deserialize_with = "lenient_string")]
    pub instance_id: String,
    /// In MiB.
    #[serde(rename = "DBInstanceMemory", deserialize_with = "lenient_number")]
    pub memory: Option<f64>,
    #[serde(rename = "DBInstanceCPU", deserialize_with = "lenient_string")]
    pub cpu: String,
}

impl AttributeResponse {
    /// The first attribute record, if it carries an id and the memory size.
    pub fn into_detail(self) -> Option<InstanceDetail> {
        let attribute = self.items.attributes.into_iter().next()?;
        let memory = attribute.memory?;
        let memory_bytes = memory * MIB as f64;
        let representable = memory_bytes.is_finite() && memory >= 0.0 && memory_bytes < u64::MAX as f64;
        if attribute.instance_id.is_empty() || !representable {
            return None;
        }
        Some(InstanceDetail {
            instance_id: attribute.instance_id,
            memory_bytes: memory_bytes as u64,
            cpu: attribute.cpu,
        })
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

/// Fields of a `DescribeResourceUsage` response that identify the record rather than measure anything.
pub const RESOURCE_USAGE_IDENTITY_FIELDS: [&str; 3] = ["Engine", "RequestId", "DBInstanceId"];

/// Numeric usage figures of one instance, from `DescribeResourceUsage`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceUsage {
    pub instance_id: String,
    pub engine: String,
    pub usage: Vec<(String, f64)>,
}

impl ResourceUsage {
    /// Extract the numeric, non-identity fields of the response.
    ///
    /// Returns `None` for records without an instance id or without any usage field.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(fields) = value else {
            return None;
        };
        let instance_id = fields.get("DBInstanceId").and_then(value_as_string)?;
        let engine = fields
            .get("Engine")
            .and_then(value_as_string)
            .unwrap_or_default();
        let mut usage = fields
            .iter()
            .filter(|(name, _)| !RESOURCE_USAGE_IDENTITY_FIELDS.contains(&name.as_str()))
            .filter_map(|(name, value)| value_as_f64(value).map(|v| (name.clone(), v)))
            .collect::<Vec<_>>();
        usage.sort_by(|a, b| a.0.cmp(&b.0));
        if instance_id.is_empty() || usage.is_empty() {
            return None;
        }
        Some(Self {
            instance_id,
            engine,
            usage,
        })
    }
}

// -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-

pub(crate) fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(value_as_string(&Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(value_as_f64(&Value::deserialize(deserializer)?))
}

use super::{
    decode,
    sanitize_metric_name,
    Observation,
};
use crate::{
    records::ResourceUsage,
    Payload,
};

pub const RESOURCE_USAGE_PREFIX: &str = "aliyun_rds_resource_usage";

/// One gauge per numeric usage field of every instance.
pub fn resource_usage_observations(payloads: &[Payload]) -> impl Iterator<Item = Observation> + '_ {
    payloads
        .iter()
        .enumerate()
        .filter_map(|(index, payload)| {
            let value: serde_json::Value = decode("resource_usage", index, payload)?;
            let usage = ResourceUsage::from_value(value);
            if usage.is_none() {
                debug!(index, "resource usage without usage figures");
            }
            usage
        })
        .flat_map(|usage| {
            let ResourceUsage {
                instance_id,
                engine,
                usage,
            } = usage;
            usage.into_iter().map(move |(name, value)| Observation {
                name: sanitize_metric_name(&format!("{RESOURCE_USAGE_PREFIX}_{name}")),
                help: "Aliyun RDS resource usage",
                labels: vec![("instanceId", instance_id.clone()), ("Engine", engine.clone())],
                value,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> Payload {
        Some(value.to_string().into())
    }

    #[test]
    fn emits_usage_fields_without_identity() {
        let payloads = vec![payload(json!({
            "RequestId": "8F2C",
            "DBInstanceId": "rm-1",
            "Engine": "MySQL",
            "DiskUsed": 1073741824,
            "LogSize": 52428800,
        }))];
        let observations = resource_usage_observations(&payloads).collect::<Vec<_>>();
        assert_eq!(
            observations,
            vec![
                Observation {
                    name: "aliyun_rds_resource_usage_DiskUsed".to_string(),
                    help: "Aliyun RDS resource usage",
                    labels: vec![("instanceId", "rm-1".to_string()), ("Engine", "MySQL".to_string())],
                    value: 1073741824.0,
                },
                Observation {
                    name: "aliyun_rds_resource_usage_LogSize".to_string(),
                    help: "Aliyun RDS resource usage",
                    labels: vec![("instanceId", "rm-1".to_string()), ("Engine", "MySQL".to_string())],
                    value: 52428800.0,
                },
            ]
        );
    }

    #[test]
    fn failed_and_identity_only_records_are_skipped() {
        let payloads = vec![
            None,
            payload(json!({ "RequestId": "8F2C" })),
            payload(json!({ "RequestId": "8F2C", "DBInstanceId": "rm-2", "Engine": "MySQL" })),
            payload(json!({ "RequestId": "8F2C", "DBInstanceId": "rm-3", "Engine": "MySQL", "DataSize": 7 })),
        ];
        let ids = resource_usage_observations(&payloads)
            .map(|o| o.label("instanceId").unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["rm-3".to_string()]);
    }
}

use super::{
    decode,
    sanitize_metric_name,
    Observation,
};
use crate::{
    records::{
        PerformanceResponse,
        PerformanceSample,
    },
    Payload,
};

pub const PERFORMANCE_PREFIX: &str = "aliyun_rds_performance";

/// One gauge per sub-metric of the most recent value of every performance sample.
pub fn performance_observations(payloads: &[Payload]) -> impl Iterator<Item = Observation> + '_ {
    payloads
        .iter()
        .enumerate()
        .filter_map(|(index, payload)| decode::<PerformanceResponse>("performance", index, payload))
        .flat_map(|response| {
            let instance_id = response.instance_id.clone();
            let samples = response.latest_samples().collect::<Vec<_>>();
            if samples.is_empty() {
                warn!(instance = %instance_id, "no performance values in window");
            }
            samples
        })
        .flat_map(sample_observations)
}

fn sample_observations(sample: PerformanceSample) -> Vec<Observation> {
    let Some(pairs) = sample.sub_metrics() else {
        warn!(
            instance = %sample.instance_id,
            key = %sample.key,
            format = %sample.value_format,
            value = %sample.value,
            "performance value does not match its format"
        );
        return Vec::new();
    };

    pairs
        .into_iter()
        .filter_map(|(name, value)| {
            let value = match value.trim().parse::<f64>() {
                Ok(value) => value,
                Err(_) => {
                    warn!(instance = %sample.instance_id, key = %sample.key, sub_metric = name, value, "non-numeric performance value");
                    return None;
                }
            };
            let metric = sanitize_metric_name(&format!("{PERFORMANCE_PREFIX}_{}_{}", sample.key, name.trim()));
            trace!(metric = %metric, value, "performance");
            Some(Observation {
                name: metric,
                help: "Aliyun RDS performance metric",
                labels: vec![
                    ("instanceId", sample.instance_id.clone()),
                    ("Unit", sample.unit.clone()),
                ],
                value,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload(key: &str, unit: &str, format: &str, values: &[&str]) -> Payload {
        let values = values
            .iter()
            .enumerate()
            .map(|(i, v)| json!({ "Value": v, "Date": format!("2024-05-01T10:0{i}:00Z") }))
            .collect::<Vec<_>>();
        Some(
            json!({
                "DBInstanceId": "rm-1",
                "Engine": "MySQL",
                "PerformanceKeys": { "PerformanceKey": [{
                    "Key": key,
                    "Unit": unit,
                    "ValueFormat": format,
                    "Values": { "PerformanceValue": values },
                }]},
            })
            .to_string()
            .into(),
        )
    }

    fn rendered(observations: &[Observation]) -> Vec<String> {
        observations
            .iter()
            .map(|o| {
                let labels = o
                    .labels
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{}{{{}}}={}", o.name, labels, o.value)
            })
            .collect()
    }

    #[test]
    fn compound_value_becomes_one_gauge_per_sub_metric() {
        let payloads = vec![payload("db-load", "percent", "cpu&mem", &["10&20"])];
        let observations = performance_observations(&payloads).collect::<Vec<_>>();
        assert_eq!(
            rendered(&observations),
            vec![
                "aliyun_rds_performance_db_load_cpu{instanceId=rm-1,Unit=percent}=10".to_string(),
                "aliyun_rds_performance_db_load_mem{instanceId=rm-1,Unit=percent}=20".to_string(),
            ]
        );
    }

    #[test]
    fn uses_most_recent_value() {
        let payloads = vec![payload("MySQL_IOPS", "count", "io", &["1", "2", "3"])];
        let observations = performance_observations(&payloads).collect::<Vec<_>>();
        assert_eq!(
            rendered(&observations),
            vec!["aliyun_rds_performance_MySQL_IOPS_io{instanceId=rm-1,Unit=count}=3".to_string()]
        );
    }

    #[test]
    fn unusable_samples_emit_nothing() {
        let payloads = vec![
            None,
            payload("db-load", "percent", "cpu&mem", &["10"]),
            payload("db-load", "percent", "cpu&mem", &[]),
            payload("db-load", "percent", "cpu", &[""]),
            Some("{\"PerformanceKeys\": 1}".into()),
        ];
        assert_eq!(performance_observations(&payloads).count(), 0);
    }

    #[test]
    fn non_numeric_sub_value_is_skipped_alone() {
        let payloads = vec![payload("MySQL_MemCpuUsage", "%", "cpuusage&memusage", &["abc&42.5"])];
        let observations = performance_observations(&payloads).collect::<Vec<_>>();
        assert_eq!(
            rendered(&observations),
            vec!["aliyun_rds_performance_MySQL_MemCpuUsage_memusage{instanceId=rm-1,Unit=%}=42.5".to_string()]
        );
    }
}

use super::Observation;
use crate::records::InstanceRecord;

pub const STATUS_METRIC: &str = "aliyun_rds_status";

/// Label names of the status gauge, in emission order.
pub const STATUS_LABELS: [&str; 11] = [
    "CreateTime",
    "DBInstanceDescription",
    "instanceId",
    "DBInstanceStatus",
    "DBInstanceType",
    "Engine",
    "EngineVersion",
    "ExpireTime",
    "LockMode",
    "PayType",
    "RegionId",
];

/// One gauge with value 1 per instance, carrying all instance attributes as labels.
pub fn status_observations(instances: &[InstanceRecord]) -> impl Iterator<Item = Observation> + '_ {
    instances.iter().filter_map(|record| {
        if record.is_empty() {
            warn!(?record, "instance record without id");
            return None;
        }
        let values = [
            &record.create_time,
            &record.description,
            &record.instance_id,
            &record.status,
            &record.instance_type,
            &record.engine,
            &record.engine_version,
            &record.expire_time,
            &record.lock_mode,
            &record.pay_type,
            &record.region_id,
        ];
        Some(Observation {
            name: STATUS_METRIC.to_string(),
            help: "Aliyun RDS instance status and attributes",
            labels: STATUS_LABELS
                .into_iter()
                .zip(values.into_iter().cloned())
                .collect(),
            value: 1.0,
        })
    })
}

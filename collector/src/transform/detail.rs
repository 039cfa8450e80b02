use super::{
    decode,
    Observation,
};
use crate::{
    records::AttributeResponse,
    Payload,
};

pub const DETAIL_METRIC: &str = "aliyun_rds_detail";

/// One gauge with value 1 per instance, labeled with its memory in bytes and its CPU count.
pub fn detail_observations(payloads: &[Payload]) -> impl Iterator<Item = Observation> + '_ {
    payloads.iter().enumerate().filter_map(|(index, payload)| {
        let response: AttributeResponse = decode("detail", index, payload)?;
        let Some(detail) = response.into_detail() else {
            warn!(index, "instance attribute without id or memory");
            return None;
        };
        Some(Observation {
            name: DETAIL_METRIC.to_string(),
            help: "Aliyun RDS instance memory (bytes) and CPU count",
            labels: vec![
                ("DBInstanceMemory", detail.memory_bytes.to_string()),
                ("instanceId", detail.instance_id),
                ("DBInstanceCPU", detail.cpu),
            ],
            value: 1.0,
        })
    })
}

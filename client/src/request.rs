/// API version of the RDS RPC surface.
pub const API_VERSION: &str = "2014-08-15";

/// A single remote call against the RDS control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    DescribeDbInstances {
        page_number: u32,
        page_size: u32,
    },
    DescribeDbInstancePerformance {
        instance_id: String,
        key: String,
        start_time: String,
        end_time: String,
    },
    DescribeResourceUsage {
        instance_id: String,
    },
    DescribeDbInstanceAttribute {
        instance_id: String,
    },
}

impl ApiRequest {
    /// The RPC action name. Also used as the `api` label of the request metrics.
    pub fn action(&self) -> &'static str {
        match self {
            ApiRequest::DescribeDbInstances { .. } => "DescribeDBInstances",
            ApiRequest::DescribeDbInstancePerformance { .. } => "DescribeDBInstancePerformance",
            ApiRequest::DescribeResourceUsage { .. } => "DescribeResourceUsage",
            ApiRequest::DescribeDbInstanceAttribute { .. } => "DescribeDBInstanceAttribute",
        }
    }

    /// Action specific query parameters, without the common signing parameters.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            ApiRequest::DescribeDbInstances { page_number, page_size } => vec![
                ("PageNumber", page_number.to_string()),
                ("PageSize", page_size.to_string()),
            ],
            ApiRequest::DescribeDbInstancePerformance {
                instance_id,
                key,
                start_time,
                end_time,
            } => vec![
                ("DBInstanceId", instance_id.clone()),
                ("Key", key.clone()),
                ("StartTime", start_time.clone()),
                ("EndTime", end_time.clone()),
            ],
            ApiRequest::DescribeResourceUsage { instance_id } | ApiRequest::DescribeDbInstanceAttribute { instance_id } => {
                vec![("DBInstanceId", instance_id.clone())]
            }
        }
    }

    pub fn instance_id(&self) -> Option<&str> {
        match self {
            ApiRequest::DescribeDbInstances { .. } => None,
            ApiRequest::DescribeDbInstancePerformance { instance_id, .. }
            | ApiRequest::DescribeResourceUsage { instance_id }
            | ApiRequest::DescribeDbInstanceAttribute { instance_id } => Some(instance_id),
        }
    }
}

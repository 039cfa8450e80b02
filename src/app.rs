use aliyun_rds_client::AliyunRpcClient;
use eyre::{
    Result,
    WrapErr as _,
};
use rds_exporter_collector::Orchestrator;
use rds_exporter_config::Config;
use std::sync::Arc;

/// Build the signed client and the orchestrator from a validated config, then serve until shutdown.
pub async fn run(config: Config) -> Result<()> {
    let client = AliyunRpcClient::new(
        config.collector.endpoint.clone(),
        config.credential.clone(),
        config.collector.request_timeout(),
    )
    .wrap_err("Failed to create Aliyun RDS client")?;

    info!(
        region = %config.credential.region_id,
        endpoint = %config.collector.endpoint,
        engines = ?config.performance_list.keys().collect::<Vec<_>>(),
        workers = config.collector.workers,
        "starting exporter"
    );

    let server = config.server.clone();
    let orchestrator = Arc::new(Orchestrator::new(config, Arc::new(client))?);
    rds_exporter_http::serve(&server, orchestrator).await
}

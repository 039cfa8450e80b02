use aliyun_rds_exporter::{
    init_errors,
    init_logging,
    run,
};
use clap::Parser;
use color_eyre::Result;
use rds_exporter_config::{
    Args,
    Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_errors()?;
    let args = Args::parse();
    init_logging(args.debug)?;
    run(Config::from_args(&args)?).await
}

use clap::Parser;
use std::path::PathBuf;

/// Aliyun RDS Exporter for Prometheus.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to config file.
    #[arg(short, long, env = "RDS_EXPORTER_CONFIG", default_value = "config/config.yaml")]
    pub config: PathBuf,

    /// Print debug messages.
    #[arg(short, long)]
    pub debug: bool,
}

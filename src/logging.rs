use eyre::Result;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};

/// Install panic and error report hooks: readable backtraces in debug builds, a crash report in release builds.
pub fn init_errors() -> Result<()> {
    color_eyre::install()?;

    #[cfg(debug_assertions)]
    better_panic::install();

    #[cfg(not(debug_assertions))]
    human_panic::setup_panic!();

    Ok(())
}

/// `RUST_LOG` wins, otherwise `debug` with `--debug` and `info` without.
pub fn init_logging(debug: bool) -> Result<()> {
    let default_directive = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_filter(filter))
        .with(tracing_error::ErrorLayer::default())
        .try_init()?;

    Ok(())
}

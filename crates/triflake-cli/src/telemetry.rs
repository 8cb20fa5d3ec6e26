//! Log output for the CLI.
//!
//! Events go to stderr so generated IDs on stdout stay pipeable. The filter
//! comes from `RUST_LOG` and defaults to `info`; set `RUST_LOG=triflake=trace`
//! to see per-ID generation spans and sequence exhaustion.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()?;

    Ok(())
}

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Install the global subscriber. `RUST_LOG` wins over the configured level;
/// an unparsable level falls back to `info`.
pub fn init(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|err| Error::Config(format!("failed to create log filter: {err}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| Error::Config(format!("tracing init error: {err}")))
}

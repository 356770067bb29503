//! Logging initialization.

use anyhow::{anyhow, Result};
use tracing::Level;
use tracing_subscriber::fmt;

use crate::LogLevel;

/// Install the stderr logger for one CLI invocation.
///
/// Object output owns stdout, so every diagnostic goes to stderr. Below
/// debug the format is compact and timestamp-free: the interesting content
/// is the structured fields (bucket, prefix, phase), not the log plumbing.
/// Debug and trace keep timestamps and module targets so probe, drain and
/// retry activity can be told apart.
pub fn init_logging(level: LogLevel) -> Result<()> {
    let detailed = level >= LogLevel::Debug;

    let builder = fmt::Subscriber::builder()
        .with_max_level(Level::from(level))
        .with_writer(std::io::stderr)
        .with_target(detailed);

    let installed = if detailed {
        builder.try_init()
    } else {
        builder.compact().without_time().try_init()
    };

    installed.map_err(|e| anyhow!("failed to install logger: {e}"))
}

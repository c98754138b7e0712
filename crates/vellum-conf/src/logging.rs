//! Log subscriber setup

use crate::settings::{LogFormat, LoggingSettings};
use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber.
///
/// `RUST_LOG` wins over `settings.level` when set. Returns `false` when a
/// global subscriber was already installed, in which case nothing changes.
pub fn init_logging(settings: &LoggingSettings) -> bool {
	let filter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(&settings.level))
		.unwrap_or_else(|_| EnvFilter::new("info"));
	let builder = tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(filter);

	let installed = match settings.format {
		LogFormat::Compact => builder.compact().try_init(),
		LogFormat::Pretty => builder.pretty().try_init(),
		LogFormat::Json => builder.json().try_init(),
	};
	installed.is_ok()
}

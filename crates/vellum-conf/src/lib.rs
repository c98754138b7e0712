//! Configuration for Vellum
//!
//! Settings are assembled from layered sources, highest priority last:
//!
//! - **Defaults** (priority 0)
//! - **Config files**, TOML or JSON (priority 50)
//! - **Environment variables** prefixed `VELLUM_`, with `__` between section
//!   and key (priority 100)
//!
//! ```
//! use vellum_conf::{LogFormat, SettingsBuilder};
//! use vellum_conf::sources::EnvSource;
//!
//! let settings = SettingsBuilder::new()
//!     .add_source(EnvSource::new().with_vars([("VELLUM_LOGGING__FORMAT", "json")]))
//!     .build()
//!     .unwrap();
//! assert_eq!(settings.logging.format, LogFormat::Json);
//! assert_eq!(settings.validation.json_max_depth, 64);
//! ```

pub mod builder;
pub mod logging;
pub mod settings;
pub mod sources;

pub use builder::{ConfError, SettingsBuilder};
pub use logging::init_logging;
pub use settings::{
	CompatSettings, LogFormat, LoggingSettings, PersistenceSettings, ValidationLimits,
	VellumSettings,
};

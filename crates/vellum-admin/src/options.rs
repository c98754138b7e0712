//! Runtime options of the admin services

use std::time::Duration;
use vellum_conf::VellumSettings;
use vellum_forms::{Validator, ValidatorConfig};

/// Knobs shared by the editors and the in-memory store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminOptions {
	/// Upper bound for each store call; `None` waits indefinitely
	pub persistence_timeout: Option<Duration>,
	/// Keep top-level section copies of legacy records in sync on update
	pub legacy_dual_write: bool,
	pub validator: ValidatorConfig,
}

impl AdminOptions {
	/// Options taken from loaded configuration.
	///
	/// # Examples
	///
	/// ```
	/// use std::time::Duration;
	/// use vellum_admin::AdminOptions;
	/// use vellum_conf::VellumSettings;
	///
	/// let mut settings = VellumSettings::default();
	/// settings.persistence.timeout_ms = Some(2_500);
	///
	/// let options = AdminOptions::from_settings(&settings);
	/// assert_eq!(options.persistence_timeout, Some(Duration::from_millis(2_500)));
	/// assert!(!options.legacy_dual_write);
	/// ```
	pub fn from_settings(settings: &VellumSettings) -> Self {
		Self {
			persistence_timeout: settings.persistence.timeout(),
			legacy_dual_write: settings.compat.legacy_dual_write,
			validator: ValidatorConfig {
				regex_size_limit: settings.validation.regex_size_limit,
				json_max_depth: settings.validation.json_max_depth,
			},
		}
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.persistence_timeout = Some(timeout);
		self
	}

	pub fn validator(&self) -> Validator {
		Validator::new(self.validator)
	}
}

impl From<&VellumSettings> for AdminOptions {
	fn from(settings: &VellumSettings) -> Self {
		Self::from_settings(settings)
	}
}

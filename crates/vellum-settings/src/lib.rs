//! Field settings schema and normalization for Vellum
//!
//! This crate owns the persisted shape of a content field and everything that
//! turns it into one canonical, fully-defaulted value:
//!
//! - **Schema**: typed `validation`, `appearance`, `advanced` and `ui_options`
//!   sections, each with an extension bag so unknown keys survive round trips
//! - **Settings normalizer**: section reads across the flat legacy and nested
//!   record shapes, deep-merge updates and update payload construction
//! - **Field-type normalizer**: per-type defaults filled into the settings bag
//! - **Api ids**: machine names derived from display names
//!
//! ## Architecture
//!
//! ```text
//! field record (JSON) --migrate_record--> FieldDefinition
//!                                           |
//!                                           +-- settings.<section> (canonical)
//!                                           |
//!                                           +-- normalize_for_type(type, advanced)
//! ```
//!
//! ## Example
//!
//! ```
//! use vellum_settings::{Section, build_update_payload, read_section};
//! use serde_json::json;
//!
//! let legacy = json!({"validation": {"required": true}});
//! assert_eq!(read_section(&legacy, Section::Validation), json!({"required": true}).as_object().unwrap().clone());
//!
//! let patch = json!({"uiVariant": "pill"}).as_object().unwrap().clone();
//! assert_eq!(
//!     build_update_payload(Section::Appearance, &patch),
//!     json!({"settings": {"appearance": {"uiVariant": "pill"}}})
//! );
//! ```

pub mod api_id;
pub mod field;
pub mod field_type;
pub mod merge;
pub mod normalizer;
pub mod schema;
pub mod typed;

pub use api_id::{derive_api_id, is_valid_api_id};
pub use field::FieldDefinition;
pub use field_type::FieldType;
pub use merge::{deep_merge, merged};
pub use normalizer::{
	build_update_payload, merge_record_section, merge_section, migrate_record, read_help_text,
	read_section,
};
pub use schema::{
	AdvancedSettings, AppearanceOverride, AppearanceSettings, Breakpoint, ColorRoles,
	ConditionalRule, FieldSettings, ResponsiveOverrides, Section, UiOptions, UiVariant,
	ValidationSettings,
};
pub use typed::{normalize_for_type, type_defaults};

/// Settings error types
pub mod error {
	use thiserror::Error;

	/// Errors raised by the strict entry points of this crate.
	///
	/// The normalization functions themselves are total; only text parsing
	/// and name lookups can fail.
	#[derive(Error, Debug)]
	pub enum SettingsError {
		/// Settings section name not recognized
		#[error("Unknown settings section: {0}")]
		UnknownSection(String),

		/// Field record text is not valid JSON
		#[error("Invalid field record JSON: {0}")]
		Json(#[from] serde_json::Error),
	}

	/// Result type for settings operations
	pub type SettingsResult<T> = Result<T, SettingsError>;
}

pub use error::{SettingsError, SettingsResult};

/// JSON object type used for every open settings bag.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

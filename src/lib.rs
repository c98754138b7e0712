//! # Vellum
//!
//! Field configuration, dynamic forms and validation for a headless CMS.
//!
//! ## Feature Flags
//!
//! - `settings` - Field settings schema and normalizers (always available)
//! - `forms` - Form rendering, predicate expressions and validation
//! - `conf` - Layered configuration and logging setup
//! - `admin` - Schema, settings and content editors over async stores
//! - `full` (default) - Everything above
//!
//! ## Example
//!
//! ```
//! # #[cfg(feature = "forms")]
//! # {
//! use vellum::forms::FormSession;
//! use vellum::settings::migrate_record;
//! use serde_json::json;
//!
//! let title = migrate_record(&json!({
//!     "id": "f1",
//!     "name": "Title",
//!     "type": "text",
//!     "validation": {"required": true}
//! }));
//! let mut session = FormSession::new(vec![title]);
//!
//! assert!(session.submit().is_err());
//! session.on_change("title", json!("Hello"));
//! assert!(session.submit().is_ok());
//! # }
//! ```

/// Field settings schema, normalizers and field types
pub mod settings {
	pub use vellum_settings::*;
}

#[cfg(feature = "forms")]
pub mod forms {
	pub use vellum_forms::*;
}

#[cfg(feature = "conf")]
pub mod conf {
	pub use vellum_conf::*;
}

#[cfg(feature = "admin")]
pub mod admin {
	pub use vellum_admin::*;
}

pub use vellum_settings::{FieldDefinition, FieldType, Section};

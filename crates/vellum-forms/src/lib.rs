//! Dynamic forms for Vellum content fields
//!
//! Turns a list of [`FieldDefinition`](vellum_settings::FieldDefinition)s into
//! a live data-entry form:
//!
//! - **Form state**: one value per data field, keyed by api id
//! - **Renderer**: one control per field, chosen by an exhaustive match on
//!   the field type, with unknown types rendered as placeholders
//! - **Validation engine**: required, length, numeric, pattern, custom
//!   predicate and JSON checks, producing an [`ErrorMap`]
//! - **Predicate language**: a small sandboxed expression language for
//!   custom validation rules
//!
//! ## Example
//!
//! ```
//! use vellum_forms::FormSession;
//! use vellum_settings::{FieldDefinition, FieldType};
//! use serde_json::json;
//!
//! let fields = vec![FieldDefinition::new("f1", "Title", FieldType::Text).required()];
//! let mut session = FormSession::new(fields);
//!
//! let errors = session.submit().unwrap_err();
//! assert_eq!(errors["title"], vec!["This field is required".to_string()]);
//!
//! session.on_change("title", json!("Hello"));
//! assert!(session.errors().is_empty());
//! assert_eq!(session.submit().unwrap()["title"], json!("Hello"));
//! ```

pub mod expr;
pub mod html;
pub mod json_editor;
pub mod renderer;
pub mod state;
pub mod validation;

pub use expr::{EvalContext, Expr, ExpressionError};
pub use html::render_html;
pub use json_editor::{parse_json_input, to_pretty_json};
pub use renderer::{FormRenderer, FormSession, RenderedControl, Widget};
pub use state::FormState;
pub use validation::{Validator, ValidatorConfig, validate};

use std::collections::HashMap;

/// Field key (api id) to the ordered messages raised for that field.
///
/// An empty map means the form is valid.
pub type ErrorMap = HashMap<String, Vec<String>>;

/// Form error types
pub mod error {
	use crate::expr::ExpressionError;
	use thiserror::Error;

	#[derive(Error, Debug, Clone, PartialEq)]
	pub enum FormError {
		/// Text entered in a JSON editor could not be parsed
		#[error("{0}")]
		Serialization(String),

		/// Custom predicate failed to parse or evaluate
		#[error(transparent)]
		Expression(#[from] ExpressionError),
	}

	pub type FormResult<T> = Result<T, FormError>;
}

pub use error::{FormError, FormResult};

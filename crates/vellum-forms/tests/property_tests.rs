//! Forms property-based tests
//!
//! Rendering and validation never fail, whatever the field list.

use proptest::prelude::*;
use rstest::*;
use serde_json::json;
use vellum_forms::{FormRenderer, FormState, validate};
use vellum_settings::{FieldDefinition, FieldType};

fn any_field_type() -> impl Strategy<Value = FieldType> {
	prop_oneof![
		prop::sample::select(FieldType::KNOWN.to_vec()),
		"[a-z]{1,12}".prop_map(|tag| FieldType::from_tag(&tag)),
	]
}

proptest! {
	/// Test: one control per field
	///
	/// Category: Property
	/// Verifies that rendering keeps the field count and order for any type mix.
	#[rstest]
	fn prop_render_one_control_per_field(types in prop::collection::vec(any_field_type(), 0..20)) {
		let fields: Vec<_> = types
			.into_iter()
			.enumerate()
			.map(|(i, t)| FieldDefinition::new(i.to_string(), format!("Field {i}"), t))
			.collect();
		let state = FormState::initialize(&fields);

		let controls = FormRenderer::new().render(&fields, &state);

		prop_assert_eq!(controls.len(), fields.len());
		for (control, field) in controls.iter().zip(&fields) {
			prop_assert_eq!(&control.key, &field.api_id);
		}
	}

	/// Test: optional fields never fail on their initial value
	///
	/// Category: Property
	/// Verifies that a freshly initialized form without required fields is valid.
	#[rstest]
	fn prop_initial_state_is_valid(types in prop::collection::vec(any_field_type(), 0..20)) {
		let fields: Vec<_> = types
			.into_iter()
			.enumerate()
			.map(|(i, t)| FieldDefinition::new(i.to_string(), format!("Field {i}"), t))
			.collect();

		prop_assert!(validate(&fields, &FormState::initialize(&fields)).is_empty());
	}

	/// Test: integers satisfy required
	///
	/// Category: Property
	/// Verifies that any number, zero included, satisfies a required numeric field.
	#[rstest]
	fn prop_numbers_satisfy_required(n in any::<i64>()) {
		let fields = vec![FieldDefinition::new("1", "Amount", FieldType::Number).required()];
		let state: FormState = [("amount".to_string(), json!(n))].into_iter().collect();

		prop_assert!(validate(&fields, &state).is_empty());
	}
}

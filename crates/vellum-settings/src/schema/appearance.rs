//! Appearance section: UI variant, colors, layout flags and per-breakpoint
//! overrides

use super::lenient::{take_bool, take_object, take_string, take_value, to_map};
use crate::JsonMap;
use crate::merge::deep_merge;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Visual style of a control. Unrecognized input falls back to `Standard`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UiVariant {
	#[default]
	Standard,
	Material,
	Pill,
	Borderless,
	Underlined,
}

impl UiVariant {
	/// Parses a variant name, coercing anything unknown to `Standard`.
	///
	/// # Examples
	///
	/// ```
	/// use vellum_settings::UiVariant;
	///
	/// assert_eq!(UiVariant::parse_lenient("Pill"), UiVariant::Pill);
	/// assert_eq!(UiVariant::parse_lenient("neon"), UiVariant::Standard);
	/// ```
	pub fn parse_lenient(raw: &str) -> Self {
		match raw.trim().to_ascii_lowercase().as_str() {
			"material" => UiVariant::Material,
			"pill" => UiVariant::Pill,
			"borderless" => UiVariant::Borderless,
			"underlined" => UiVariant::Underlined,
			_ => UiVariant::Standard,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			UiVariant::Standard => "standard",
			UiVariant::Material => "material",
			UiVariant::Pill => "pill",
			UiVariant::Borderless => "borderless",
			UiVariant::Underlined => "underlined",
		}
	}
}

impl fmt::Display for UiVariant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Viewport classes that may override the base appearance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Breakpoint {
	Mobile,
	Tablet,
	#[default]
	Desktop,
}

impl Breakpoint {
	pub const ALL: [Breakpoint; 3] = [Breakpoint::Mobile, Breakpoint::Tablet, Breakpoint::Desktop];

	pub fn as_str(&self) -> &'static str {
		match self {
			Breakpoint::Mobile => "mobile",
			Breakpoint::Tablet => "tablet",
			Breakpoint::Desktop => "desktop",
		}
	}
}

/// Color assigned to each visual role of a control.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColorRoles {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub border: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub background: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub focus: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(flatten)]
	pub extra: JsonMap,
}

impl ColorRoles {
	pub fn from_map(raw: &JsonMap) -> Self {
		let mut bag = raw.clone();
		Self {
			border: take_string(&mut bag, "border"),
			text: take_string(&mut bag, "text"),
			background: take_string(&mut bag, "background"),
			focus: take_string(&mut bag, "focus"),
			label: take_string(&mut bag, "label"),
			extra: bag,
		}
	}

	pub fn is_empty(&self) -> bool {
		self == &Self::default()
	}

	/// Returns `self` with every role set in `other` replaced.
	pub fn overlay(&self, other: &ColorRoles) -> ColorRoles {
		let mut extra = self.extra.clone();
		deep_merge(&mut extra, &other.extra);
		ColorRoles {
			border: other.border.clone().or_else(|| self.border.clone()),
			text: other.text.clone().or_else(|| self.text.clone()),
			background: other.background.clone().or_else(|| self.background.clone()),
			focus: other.focus.clone().or_else(|| self.focus.clone()),
			label: other.label.clone().or_else(|| self.label.clone()),
			extra,
		}
	}
}

/// Partial appearance: the base layer and each breakpoint override share this
/// shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceOverride {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ui_variant: Option<UiVariant>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub theme: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub colors: Option<ColorRoles>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub label_position: Option<String>,
	/// Either a number of pixels or a CSS length string
	#[serde(skip_serializing_if = "Option::is_none")]
	pub label_width: Option<Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub float_label: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub filled: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub rounded_corners: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field_size: Option<String>,
	#[serde(flatten)]
	pub extra: JsonMap,
}

impl AppearanceOverride {
	pub fn from_map(raw: &JsonMap) -> Self {
		let mut bag = raw.clone();
		let ui_variant = take_value(&mut bag, "uiVariant").map(|v| match v {
			Value::String(s) => UiVariant::parse_lenient(&s),
			_ => UiVariant::Standard,
		});
		Self {
			ui_variant,
			theme: take_string(&mut bag, "theme"),
			colors: take_object(&mut bag, "colors").map(|c| ColorRoles::from_map(&c)),
			label_position: take_string(&mut bag, "labelPosition"),
			label_width: take_value(&mut bag, "labelWidth"),
			float_label: take_bool(&mut bag, "floatLabel"),
			filled: take_bool(&mut bag, "filled"),
			rounded_corners: take_bool(&mut bag, "roundedCorners"),
			field_size: take_string(&mut bag, "fieldSize"),
			extra: bag,
		}
	}

	pub fn is_empty(&self) -> bool {
		self == &Self::default()
	}

	/// Layers `other` on top of `self`; set values in `other` win.
	pub fn overlay(&self, other: &AppearanceOverride) -> AppearanceOverride {
		let colors = match (&self.colors, &other.colors) {
			(Some(base), Some(top)) => Some(base.overlay(top)),
			(base, top) => top.clone().or_else(|| base.clone()),
		};
		let mut extra = self.extra.clone();
		deep_merge(&mut extra, &other.extra);
		AppearanceOverride {
			ui_variant: other.ui_variant.or(self.ui_variant),
			theme: other.theme.clone().or_else(|| self.theme.clone()),
			colors,
			label_position: other
				.label_position
				.clone()
				.or_else(|| self.label_position.clone()),
			label_width: other.label_width.clone().or_else(|| self.label_width.clone()),
			float_label: other.float_label.or(self.float_label),
			filled: other.filled.or(self.filled),
			rounded_corners: other.rounded_corners.or(self.rounded_corners),
			field_size: other.field_size.clone().or_else(|| self.field_size.clone()),
			extra,
		}
	}
}

/// Per-breakpoint overrides. Keys other than the three breakpoints are kept
/// in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponsiveOverrides {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub mobile: Option<AppearanceOverride>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tablet: Option<AppearanceOverride>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub desktop: Option<AppearanceOverride>,
	#[serde(flatten)]
	pub extra: JsonMap,
}

impl ResponsiveOverrides {
	pub fn from_map(raw: &JsonMap) -> Self {
		let mut bag = raw.clone();
		let mut take = |key: &str| take_object(&mut bag, key).map(|o| AppearanceOverride::from_map(&o));
		let mobile = take("mobile");
		let tablet = take("tablet");
		let desktop = take("desktop");
		Self {
			mobile,
			tablet,
			desktop,
			extra: bag,
		}
	}

	pub fn get(&self, breakpoint: Breakpoint) -> Option<&AppearanceOverride> {
		match breakpoint {
			Breakpoint::Mobile => self.mobile.as_ref(),
			Breakpoint::Tablet => self.tablet.as_ref(),
			Breakpoint::Desktop => self.desktop.as_ref(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self == &Self::default()
	}
}

/// Appearance section of a field's settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppearanceSettings {
	#[serde(flatten)]
	pub base: AppearanceOverride,
	#[serde(skip_serializing_if = "ResponsiveOverrides::is_empty")]
	pub responsive: ResponsiveOverrides,
}

impl AppearanceSettings {
	pub fn from_map(raw: &JsonMap) -> Self {
		let mut bag = raw.clone();
		let responsive = take_object(&mut bag, "responsive")
			.map(|r| ResponsiveOverrides::from_map(&r))
			.unwrap_or_default();
		Self {
			base: AppearanceOverride::from_map(&bag),
			responsive,
		}
	}

	pub fn from_value(raw: &Value) -> Self {
		raw.as_object().map(Self::from_map).unwrap_or_default()
	}

	pub fn to_map(&self) -> JsonMap {
		to_map(self)
	}

	pub fn is_empty(&self) -> bool {
		self.base.is_empty() && self.responsive.is_empty()
	}

	/// Effective variant, `Standard` when unset.
	pub fn variant(&self) -> UiVariant {
		self.base.ui_variant.unwrap_or_default()
	}

	/// Appearance as seen at `breakpoint`: the breakpoint override layered on
	/// the base, with the variant always resolved.
	///
	/// # Examples
	///
	/// ```
	/// use vellum_settings::{AppearanceSettings, Breakpoint, UiVariant};
	/// use serde_json::json;
	///
	/// let appearance = AppearanceSettings::from_value(&json!({
	///     "uiVariant": "material",
	///     "filled": false,
	///     "responsive": {"mobile": {"filled": true}}
	/// }));
	///
	/// let mobile = appearance.resolve(Breakpoint::Mobile);
	/// assert_eq!(mobile.ui_variant, Some(UiVariant::Material));
	/// assert_eq!(mobile.filled, Some(true));
	/// assert_eq!(appearance.resolve(Breakpoint::Desktop).filled, Some(false));
	/// ```
	pub fn resolve(&self, breakpoint: Breakpoint) -> AppearanceOverride {
		let mut resolved = match self.responsive.get(breakpoint) {
			Some(over) => self.base.overlay(over),
			None => self.base.clone(),
		};
		resolved.ui_variant = Some(resolved.ui_variant.unwrap_or_default());
		resolved
	}
}

impl<'de> Deserialize<'de> for AppearanceSettings {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = Value::deserialize(deserializer)?;
		Ok(Self::from_value(&raw))
	}
}

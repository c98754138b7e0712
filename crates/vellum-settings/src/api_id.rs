//! Machine names for fields and collections

use regex::Regex;
use std::sync::LazyLock;

// Lower snake case, not starting with a digit.
static API_ID_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("API_ID_REGEX: invalid regex pattern"));

/// Longest api id accepted by [`is_valid_api_id`].
pub const MAX_API_ID_LENGTH: usize = 64;

/// Derives an api id from a display name.
///
/// Runs of non-alphanumeric characters become a single underscore, camel-case
/// humps are split, and a leading digit gets an underscore prefix.
///
/// # Examples
///
/// ```
/// use vellum_settings::derive_api_id;
///
/// assert_eq!(derive_api_id("First Name"), "first_name");
/// assert_eq!(derive_api_id("  Hero -- Image! "), "hero_image");
/// assert_eq!(derive_api_id("publishedAt"), "published_at");
/// assert_eq!(derive_api_id("3D Model"), "_3d_model");
/// assert_eq!(derive_api_id("???"), "field");
/// ```
pub fn derive_api_id(display_name: &str) -> String {
	let mut out = String::with_capacity(display_name.len());
	let mut pending_separator = false;
	let mut previous_lower = false;

	for c in display_name.chars() {
		if !c.is_ascii_alphanumeric() {
			pending_separator = true;
			previous_lower = false;
			continue;
		}
		if c.is_ascii_uppercase() && previous_lower {
			pending_separator = true;
		}
		if pending_separator && !out.is_empty() {
			out.push('_');
		}
		pending_separator = false;
		previous_lower = c.is_ascii_lowercase();
		out.push(c.to_ascii_lowercase());
	}

	if out.is_empty() {
		return "field".to_string();
	}
	if out.starts_with(|c: char| c.is_ascii_digit()) {
		out.insert(0, '_');
	}
	out.truncate(MAX_API_ID_LENGTH);
	out
}

/// Checks that `api_id` is lower snake case and within the length limit.
pub fn is_valid_api_id(api_id: &str) -> bool {
	!api_id.is_empty() && api_id.len() <= MAX_API_ID_LENGTH && API_ID_REGEX.is_match(api_id)
}

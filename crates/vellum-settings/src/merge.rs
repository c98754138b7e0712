//! Recursive merge of JSON settings bags

use crate::JsonMap;
use serde_json::Value;

/// Deep-merges `patch` into `target`.
///
/// Keys in `patch` win on conflicts. When both sides hold an object under the
/// same key the objects are merged recursively instead of replaced. Arrays and
/// scalars are replaced wholesale.
///
/// # Examples
///
/// ```
/// use vellum_settings::deep_merge;
/// use serde_json::json;
///
/// let mut target = json!({"colors": {"border": "red", "text": "black"}, "theme": "light"})
///     .as_object().unwrap().clone();
/// let patch = json!({"colors": {"border": "blue"}}).as_object().unwrap().clone();
///
/// deep_merge(&mut target, &patch);
/// assert_eq!(
///     serde_json::Value::Object(target),
///     json!({"colors": {"border": "blue", "text": "black"}, "theme": "light"})
/// );
/// ```
pub fn deep_merge(target: &mut JsonMap, patch: &JsonMap) {
	for (key, incoming) in patch {
		if let Value::Object(nested) = incoming
			&& let Some(Value::Object(existing)) = target.get_mut(key)
		{
			deep_merge(existing, nested);
			continue;
		}
		target.insert(key.clone(), incoming.clone());
	}
}

/// Returns a new map holding `base` deep-merged with `patch`.
pub fn merged(base: &JsonMap, patch: &JsonMap) -> JsonMap {
	let mut out = base.clone();
	deep_merge(&mut out, patch);
	out
}

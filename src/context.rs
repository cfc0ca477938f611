//! Per-cycle route context and its extraction helpers.

use std::collections::HashMap;
use tracing::warn;

/// Immutable snapshot describing one navigation cycle.
///
/// Built fresh on every cycle, suppressed ones included, and shared with
/// every handler in the chain behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteContext {
	/// The normalized path that triggered the cycle, query and fragment
	/// stripped.
	pub path: String,
	/// The path split on `/` with the leading empty segment removed.
	pub path_parts: Vec<String>,
	/// Named parameters bound from `:name` pattern segments. A parameter
	/// whose path segment is missing or empty binds to `None`.
	pub params: HashMap<String, Option<String>>,
	/// Decoded query pairs. Duplicate keys keep the last value.
	pub query: HashMap<String, String>,
	/// The path of the previous cycle, if any.
	pub previous_path: Option<String>,
	/// Monotonic cycle counter, unique per router instance.
	pub generation: u64,
}

/// Splits a path for handler consumption, dropping the leading slash.
pub(crate) fn split_path(path: &str) -> Vec<String> {
	path.strip_prefix('/')
		.unwrap_or(path)
		.split('/')
		.map(str::to_string)
		.collect()
}

/// Binds `:name` segments of `pattern` against `path`.
///
/// Both sides keep their raw `/`-split segmentation so the indices used
/// during matching line up here too. A `:name` segment at an index where
/// the path has no segment, or an empty one, binds `None`.
pub(crate) fn extract_params(pattern: &str, path: &str) -> HashMap<String, Option<String>> {
	let path_parts: Vec<&str> = path.split('/').collect();
	let mut params = HashMap::new();

	for (i, part) in pattern.split('/').enumerate() {
		if let Some(name) = part.strip_prefix(':') {
			let value = path_parts
				.get(i)
				.filter(|segment| !segment.is_empty())
				.map(|segment| (*segment).to_string());
			params.insert(name.to_string(), value);
		}
	}

	params
}

/// Decodes the query portion of a raw location string.
///
/// Everything after the first `?` (fragment stripped) is parsed as form
/// pairs. Duplicate keys keep the last value. A malformed query logs a
/// warning and yields an empty map rather than failing the cycle.
pub(crate) fn extract_query(location: &str) -> HashMap<String, String> {
	let Some(start) = location.find('?') else {
		return HashMap::new();
	};
	let raw = &location[start + 1..];
	let raw = raw.split('#').next().unwrap_or(raw);

	match serde_urlencoded::from_str::<Vec<(String, String)>>(raw) {
		Ok(pairs) => pairs.into_iter().collect(),
		Err(error) => {
			warn!(query = raw, %error, "ignoring malformed query string");
			HashMap::new()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn split_path_drops_leading_slash() {
		assert_eq!(split_path("/users/42"), vec!["users", "42"]);
		assert_eq!(split_path("/"), vec![""]);
	}

	#[test]
	fn params_bind_by_segment_index() {
		let params = extract_params("/users/:id/posts/:post", "/users/42/posts/7");
		assert_eq!(params["id"], Some("42".to_string()));
		assert_eq!(params["post"], Some("7".to_string()));
	}

	#[rstest]
	#[case("/users/:id", "/users", None)]
	#[case("/users/:id", "/users/", None)]
	#[case("/users/:id", "/users/42", Some("42"))]
	fn missing_or_empty_segment_binds_none(
		#[case] pattern: &str,
		#[case] path: &str,
		#[case] expected: Option<&str>,
	) {
		let params = extract_params(pattern, path);
		assert_eq!(params["id"], expected.map(str::to_string));
	}

	#[test]
	fn literal_only_pattern_binds_nothing() {
		assert!(extract_params("/users/all", "/users/all").is_empty());
	}

	#[test]
	fn query_parses_pairs() {
		let query = extract_query("/search?q=rust&page=2");
		assert_eq!(query["q"], "rust");
		assert_eq!(query["page"], "2");
	}

	#[test]
	fn query_duplicate_key_keeps_last() {
		let query = extract_query("/a?k=first&k=last");
		assert_eq!(query["k"], "last");
	}

	#[test]
	fn query_decodes_percent_escapes() {
		let query = extract_query("/a?name=a%20b");
		assert_eq!(query["name"], "a b");
	}

	#[test]
	fn query_stops_at_fragment() {
		let query = extract_query("/a?k=v#section");
		assert_eq!(query["k"], "v");
		assert_eq!(query.len(), 1);
	}

	#[test]
	fn no_query_yields_empty_map() {
		assert!(extract_query("/plain").is_empty());
	}
}

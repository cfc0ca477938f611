//! Pattern matching against the route table.
//!
//! Pure first-match-in-declared-order semantics: no backtracking, no
//! longest-match preference. Paths and patterns are compared as raw
//! `/`-split segment lists, empty segments included, so a leading slash
//! counts as one (empty) segment on both sides and indices line up.

use crate::table::{DEFAULT_ROUTE, RouteEntry, RouteTable};

/// A successful table lookup.
#[derive(Debug)]
pub(crate) struct Matched<'t> {
	/// The matched entry's key (`__default` for the fallback).
	pub key: &'t str,
	/// The matched entry.
	pub entry: &'t RouteEntry,
	/// Whether the fallback was selected rather than pattern-matched.
	pub is_default: bool,
}

impl Matched<'_> {
	/// Whether this match may suppress handler execution.
	///
	/// The fallback never suppresses, even if its entry carries the flag.
	pub fn has_children(&self) -> bool {
		!self.is_default && self.entry.has_children()
	}
}

/// Matches `path` against the table in declaration order.
///
/// Each entry's effective pattern is `base` + key. An entry whose segment
/// count differs from the path's is skipped unless it declares
/// `has_children`: a parent entry must still match the longer paths owned
/// by its nested router. Disabled entries are treated as non-matches and
/// matching continues.
///
/// When nothing matches, the `__default` entry is selected if present,
/// except on a sub-router whose base prefix does not appear in the current
/// path (a nested fallback must not fire while its region is inactive).
pub(crate) fn match_path<'t>(
	table: &'t RouteTable,
	path: &str,
	base: &str,
	is_sub_router: bool,
) -> Option<Matched<'t>> {
	let path_parts: Vec<&str> = path.split('/').collect();

	for (key, entry) in table.iter() {
		if key == DEFAULT_ROUTE || entry.disabled() {
			continue;
		}

		let full_pattern = format!("{base}{key}");
		let route_parts: Vec<&str> = full_pattern.split('/').collect();

		if path_parts.len() != route_parts.len() && !entry.has_children() {
			continue;
		}

		if segments_match(&route_parts, &path_parts) {
			return Some(Matched {
				key,
				entry,
				is_default: false,
			});
		}
	}

	if let Some(entry) = table.default_entry() {
		if !is_sub_router || path.contains(base) {
			return Some(Matched {
				key: DEFAULT_ROUTE,
				entry,
				is_default: true,
			});
		}
	}

	None
}

/// Walks pattern segments against path segments.
///
/// `:name` and `*` match any segment, including one the path does not have
/// (a has-children pattern may be longer than the path). `**` matches
/// itself and absorbs the rest of the path. A literal must equal the path
/// segment at the same index.
fn segments_match(route_parts: &[&str], path_parts: &[&str]) -> bool {
	for (i, part) in route_parts.iter().enumerate() {
		if part.starts_with(':') || *part == "*" {
			continue;
		}
		if *part == "**" {
			return true;
		}
		if path_parts.get(i) != Some(part) {
			return false;
		}
	}
	true
}

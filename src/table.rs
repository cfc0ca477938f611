//! Route table: ordered pattern-to-handler bindings.

use crate::error::ConfigurationError;
use crate::handler::RouteHandler;
use std::sync::Arc;

/// Reserved route key selecting the fallback entry.
///
/// Never pattern-matched; chosen only when no other entry matches.
pub const DEFAULT_ROUTE: &str = "__default";

/// A single route table entry.
///
/// The shorthand form is just an ordered handler list; the extended form
/// additionally marks the entry as hosting a nested router
/// (`has_children`) or as temporarily disabled.
#[derive(Clone)]
pub enum RouteEntry {
	/// Plain ordered handler list.
	Shorthand(Vec<Arc<dyn RouteHandler>>),
	/// Handler list plus per-entry flags.
	Extended {
		/// Handlers run when this entry matches.
		handlers: Vec<Arc<dyn RouteHandler>>,
		/// The matched region hosts its own nested router; handler
		/// execution is suppressed on an exact consecutive repeat of the
		/// current path.
		has_children: bool,
		/// A disabled entry is treated as a non-match and matching
		/// continues with later entries.
		disabled: bool,
	},
}

impl RouteEntry {
	/// Creates an extended entry with both flags cleared.
	pub fn extended(handlers: Vec<Arc<dyn RouteHandler>>) -> Self {
		Self::Extended {
			handlers,
			has_children: false,
			disabled: false,
		}
	}

	/// Returns the entry's ordered handlers.
	pub fn handlers(&self) -> &[Arc<dyn RouteHandler>] {
		match self {
			Self::Shorthand(handlers) => handlers,
			Self::Extended { handlers, .. } => handlers,
		}
	}

	/// Whether this entry hosts a nested router.
	pub fn has_children(&self) -> bool {
		match self {
			Self::Shorthand(_) => false,
			Self::Extended { has_children, .. } => *has_children,
		}
	}

	/// Whether this entry is disabled.
	pub fn disabled(&self) -> bool {
		match self {
			Self::Shorthand(_) => false,
			Self::Extended { disabled, .. } => *disabled,
		}
	}

	/// Sets the nested-router flag, promoting a shorthand entry.
	pub fn with_children(self, has_children: bool) -> Self {
		match self {
			Self::Shorthand(handlers) => Self::Extended {
				handlers,
				has_children,
				disabled: false,
			},
			Self::Extended {
				handlers, disabled, ..
			} => Self::Extended {
				handlers,
				has_children,
				disabled,
			},
		}
	}

	/// Disables the entry, promoting a shorthand entry.
	pub fn disable(self) -> Self {
		match self {
			Self::Shorthand(handlers) => Self::Extended {
				handlers,
				has_children: false,
				disabled: true,
			},
			Self::Extended {
				handlers,
				has_children,
				..
			} => Self::Extended {
				handlers,
				has_children,
				disabled: true,
			},
		}
	}
}

impl std::fmt::Debug for RouteEntry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Shorthand(handlers) => f
				.debug_tuple("Shorthand")
				.field(&format_args!("{} handlers", handlers.len()))
				.finish(),
			Self::Extended {
				handlers,
				has_children,
				disabled,
			} => f
				.debug_struct("Extended")
				.field("handlers", &handlers.len())
				.field("has_children", has_children)
				.field("disabled", disabled)
				.finish(),
		}
	}
}

/// Ordered collection of pattern-to-entry bindings.
///
/// Declaration order is significant: the first satisfying entry wins.
/// Patterns are `/`-separated segment strings where a segment is a
/// literal, `:name` (named parameter), `*` (single-segment wildcard) or
/// `**` (matches itself and everything after). The reserved key
/// [`DEFAULT_ROUTE`] binds the fallback entry.
#[derive(Clone, Default)]
pub struct RouteTable {
	entries: Vec<(String, RouteEntry)>,
}

impl RouteTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a shorthand entry.
	pub fn route(
		self,
		pattern: impl Into<String>,
		handlers: Vec<Arc<dyn RouteHandler>>,
	) -> Self {
		self.entry(pattern, RouteEntry::Shorthand(handlers))
	}

	/// Adds an entry in any form at the end of the declaration order.
	pub fn entry(mut self, pattern: impl Into<String>, entry: RouteEntry) -> Self {
		self.entries.push((pattern.into(), entry));
		self
	}

	/// Adds the `__default` fallback entry.
	pub fn fallback(self, handlers: Vec<Arc<dyn RouteHandler>>) -> Self {
		self.entry(DEFAULT_ROUTE, RouteEntry::Shorthand(handlers))
	}

	/// Number of entries, fallback included.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the table has no entries at all.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates entries in declaration order, fallback included.
	pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &RouteEntry)> {
		self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
	}

	/// Returns the fallback entry, if declared.
	pub(crate) fn default_entry(&self) -> Option<&RouteEntry> {
		self.entries
			.iter()
			.find(|(key, _)| key == DEFAULT_ROUTE)
			.map(|(_, entry)| entry)
	}

	/// Validates the table at router construction time.
	pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
		let defaults = self
			.entries
			.iter()
			.filter(|(key, _)| key == DEFAULT_ROUTE)
			.count();
		if defaults > 1 {
			return Err(ConfigurationError::DuplicateDefault);
		}
		Ok(())
	}
}

impl std::fmt::Debug for RouteTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteTable")
			.field(
				"patterns",
				&self.entries.iter().map(|(key, _)| key).collect::<Vec<_>>(),
			)
			.finish()
	}
}

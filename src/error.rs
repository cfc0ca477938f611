//! Error types for the navigation engine.

use std::time::Duration;
use thiserror::Error;

/// Application error raised inside a route handler.
///
/// Handlers carry their own error types; the engine only needs to move them
/// up the stack, so they travel boxed.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Construction-time validation failure for a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
	/// The route table declares more than one `__default` entry.
	#[error("route table declares more than one __default entry")]
	DuplicateDefault,
}

/// Error type for navigation cycles.
#[derive(Debug, Error)]
pub enum RouterError {
	/// The router configuration failed validation.
	#[error("invalid router configuration: {0}")]
	Configuration(#[from] ConfigurationError),

	/// A handler returned an error, aborting the rest of its chain.
	#[error("handler aborted navigation to {path}")]
	Handler {
		/// The path being navigated to when the handler failed.
		path: String,
		/// The application error the handler raised.
		#[source]
		source: HandlerError,
	},

	/// A handler did not call `proceed` within the configured timeout.
	///
	/// Only produced when [`RouterConfig::with_handler_timeout`] is set;
	/// without it a stalled handler stalls its chain indefinitely.
	///
	/// [`RouterConfig::with_handler_timeout`]: crate::RouterConfig::with_handler_timeout
	#[error("handler did not proceed within {limit:?} while navigating to {path}")]
	HandlerTimeout {
		/// The path being navigated to when the handler stalled.
		path: String,
		/// The configured per-handler limit that elapsed.
		limit: Duration,
	},
}

impl RouterError {
	/// Wraps an application error raised while navigating to `path`.
	pub fn handler(path: impl Into<String>, source: impl Into<HandlerError>) -> Self {
		Self::Handler {
			path: path.into(),
			source: source.into(),
		}
	}
}

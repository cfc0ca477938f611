//! Router configuration.

use crate::handler::RouteHandler;
use crate::table::RouteTable;
use std::sync::Arc;
use std::time::Duration;

/// Declarative configuration for one [`Router`] instance.
///
/// [`Router`]: crate::Router
#[derive(Clone)]
pub struct RouterConfig {
	pub(crate) routes: RouteTable,
	pub(crate) base: String,
	pub(crate) global_pre: Vec<Arc<dyn RouteHandler>>,
	pub(crate) global_post: Vec<Arc<dyn RouteHandler>>,
	pub(crate) is_sub_router: bool,
	pub(crate) handler_timeout: Option<Duration>,
}

impl RouterConfig {
	/// Creates a configuration over `routes` with no base prefix.
	pub fn new(routes: RouteTable) -> Self {
		Self {
			routes,
			base: String::new(),
			global_pre: Vec::new(),
			global_post: Vec::new(),
			is_sub_router: false,
			handler_timeout: None,
		}
	}

	/// Prefixes every route pattern with `base`.
	pub fn with_base(mut self, base: impl Into<String>) -> Self {
		self.base = base.into();
		self
	}

	/// Handlers run before the matched entry's own, on every
	/// non-suppressed cycle.
	pub fn with_global_pre(mut self, handlers: Vec<Arc<dyn RouteHandler>>) -> Self {
		self.global_pre = handlers;
		self
	}

	/// Handlers run after the matched entry's own, on every
	/// non-suppressed cycle.
	pub fn with_global_post(mut self, handlers: Vec<Arc<dyn RouteHandler>>) -> Self {
		self.global_post = handlers;
		self
	}

	/// Marks this router as nested under a parent region.
	///
	/// A sub-router's fallback only fires when the current path contains
	/// its base prefix.
	pub fn sub_router(mut self) -> Self {
		self.is_sub_router = true;
		self
	}

	/// Bounds how long each handler may hold the chain before its cycle
	/// fails with a timeout error.
	///
	/// Unset by default: a handler that never proceeds stalls its chain.
	pub fn with_handler_timeout(mut self, limit: Duration) -> Self {
		self.handler_timeout = Some(limit);
		self
	}
}

impl std::fmt::Debug for RouterConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouterConfig")
			.field("routes", &self.routes)
			.field("base", &self.base)
			.field("global_pre", &self.global_pre.len())
			.field("global_post", &self.global_post.len())
			.field("is_sub_router", &self.is_sub_router)
			.field("handler_timeout", &self.handler_timeout)
			.finish()
	}
}

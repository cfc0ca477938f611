//! Router instance orchestration.
//!
//! One [`Router`] owns a route table, a history log and the active route
//! context, and runs the full navigation cycle on every adapter signal:
//! match, decide suppression, rebuild the context, drive the handler
//! chain.

use crate::adapter::{NavigationAdapter, SubscriptionId};
use crate::config::RouterConfig;
use crate::context::{RouteContext, extract_params, extract_query, split_path};
use crate::error::RouterError;
use crate::handler::{RouteHandler, await_proceed};
use crate::history::{HistoryLog, should_suppress};
use crate::pattern::match_path;
use crate::table::RouteTable;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::debug;

/// Where the router currently is in its navigation cycle.
///
/// `Idle → Matching → {Suppressed, Executing} → Idle`. Outside a cycle the
/// observable state is always `Idle`; `Executing` is observable for as
/// long as a handler holds the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
	Idle,
	Matching,
	Executing,
	Suppressed,
}

struct RouterInner {
	table: RouteTable,
	base: String,
	is_sub_router: bool,
	global_pre: Vec<Arc<dyn RouteHandler>>,
	global_post: Vec<Arc<dyn RouteHandler>>,
	handler_timeout: Option<Duration>,
	adapter: Arc<dyn NavigationAdapter>,
	history: Mutex<HistoryLog>,
	active: Mutex<Option<Arc<RouteContext>>>,
	state: Mutex<RouterState>,
	epoch: AtomicU64,
}

impl RouterInner {
	/// Runs one full navigation cycle against the adapter's current
	/// location.
	async fn dispatch(&self) -> Result<(), RouterError> {
		let path = self.adapter.current_path();
		let location = self.adapter.current_location();
		let generation = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
		*self.state.lock() = RouterState::Matching;
		debug!(path, generation, "navigation cycle started");

		let Some(matched) = match_path(&self.table, &path, &self.base, self.is_sub_router)
		else {
			// The log still records the cycle: its length counts cycles,
			// not matches.
			self.history.lock().append(&path);
			self.settle(generation);
			debug!(path, "no matching route");
			return Ok(());
		};

		let has_children = matched.has_children();
		let (suppressed, previous_path) = {
			let mut history = self.history.lock();
			// Suppression compares against the previous cycle, so it is
			// decided before this cycle's append.
			let suppressed = should_suppress(has_children, &history, &path);
			let previous_path = history.last().map(str::to_string);
			history.append(&path);
			(suppressed, previous_path)
		};

		let params = if matched.is_default {
			HashMap::new()
		} else {
			extract_params(&format!("{}{}", self.base, matched.key), &path)
		};
		let ctx = Arc::new(RouteContext {
			path: path.clone(),
			path_parts: split_path(&path),
			params,
			query: extract_query(&location),
			previous_path,
			generation,
		});
		*self.active.lock() = Some(Arc::clone(&ctx));

		if suppressed {
			debug!(path, route = matched.key, "handler chain suppressed");
			*self.state.lock() = RouterState::Suppressed;
			self.settle(generation);
			return Ok(());
		}

		let chain: Vec<Arc<dyn RouteHandler>> = self
			.global_pre
			.iter()
			.chain(matched.entry.handlers())
			.chain(self.global_post.iter())
			.cloned()
			.collect();

		debug!(path, route = matched.key, handlers = chain.len(), "running handler chain");
		*self.state.lock() = RouterState::Executing;
		for handler in chain {
			if self.epoch.load(Ordering::SeqCst) != generation {
				// A newer cycle owns the router state now; this chain just
				// stops without touching it.
				debug!(path, generation, "abandoning superseded handler chain");
				return Ok(());
			}
			let result =
				await_proceed(handler.as_ref(), Arc::clone(&ctx), &path, self.handler_timeout)
					.await;
			if let Err(error) = result {
				self.settle(generation);
				return Err(error);
			}
		}
		self.settle(generation);
		Ok(())
	}

	/// Returns to `Idle` unless a newer cycle has taken over.
	fn settle(&self, generation: u64) {
		if self.epoch.load(Ordering::SeqCst) == generation {
			*self.state.lock() = RouterState::Idle;
		}
	}
}

/// A live router bound to a navigation adapter.
///
/// Created with [`Router::start`], which runs an initial cycle against
/// the adapter's current location. The router observes every later
/// location change until it is detached or dropped.
pub struct Router {
	inner: Arc<RouterInner>,
	subscription: Mutex<Option<SubscriptionId>>,
}

impl Router {
	/// Validates `config`, subscribes to `adapter` and runs the initial
	/// navigation cycle.
	///
	/// # Errors
	///
	/// Fails on an invalid route table, or if the initial cycle's handler
	/// chain fails.
	pub async fn start(
		config: RouterConfig,
		adapter: Arc<dyn NavigationAdapter>,
	) -> Result<Self, RouterError> {
		config.routes.validate()?;

		let inner = Arc::new(RouterInner {
			table: config.routes,
			base: config.base,
			is_sub_router: config.is_sub_router,
			global_pre: config.global_pre,
			global_post: config.global_post,
			handler_timeout: config.handler_timeout,
			adapter: Arc::clone(&adapter),
			history: Mutex::new(HistoryLog::new()),
			active: Mutex::new(None),
			state: Mutex::new(RouterState::Idle),
			epoch: AtomicU64::new(0),
		});

		let weak = Arc::downgrade(&inner);
		let subscription = adapter.subscribe(Arc::new(move |_signal| {
			let weak = Weak::clone(&weak);
			Box::pin(async move {
				match weak.upgrade() {
					Some(inner) => inner.dispatch().await,
					// Detached between signal emission and delivery.
					None => Ok(()),
				}
			})
		}));

		let router = Self {
			inner,
			subscription: Mutex::new(Some(subscription)),
		};
		router.inner.dispatch().await?;
		Ok(router)
	}

	/// Pushes `path` through the adapter, driving a cycle on every router
	/// subscribed to it.
	///
	/// # Errors
	///
	/// Propagates the first error raised by any driven cycle.
	pub async fn navigate(&self, path: &str) -> Result<(), RouterError> {
		self.inner.adapter.push(path).await
	}

	/// Like [`navigate`](Self::navigate), but replaces the current history
	/// entry instead of pushing a new one.
	pub async fn replace_with(&self, path: &str) -> Result<(), RouterError> {
		self.inner.adapter.replace(path).await
	}

	/// Creates a [`Link`] targeting `href` through this router's adapter.
	pub fn link(&self, href: impl Into<String>) -> Link {
		Link {
			adapter: Arc::downgrade(&self.inner.adapter),
			href: href.into(),
		}
	}

	/// The context of the most recent matched cycle, if any.
	pub fn active_route(&self) -> Option<Arc<RouteContext>> {
		self.inner.active.lock().clone()
	}

	/// The router's current position in its navigation cycle.
	pub fn state(&self) -> RouterState {
		*self.inner.state.lock()
	}

	/// Snapshot of the history log.
	pub fn history(&self) -> HistoryLog {
		self.inner.history.lock().clone()
	}

	/// Number of navigation cycles this router has begun.
	pub fn generation(&self) -> u64 {
		self.inner.epoch.load(Ordering::SeqCst)
	}

	/// Stops observing the adapter. Idempotent; also runs on drop.
	pub fn detach(&self) {
		if let Some(subscription) = self.subscription.lock().take() {
			self.inner.adapter.unsubscribe(subscription);
		}
	}
}

impl Drop for Router {
	fn drop(&mut self) {
		self.detach();
	}
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field("base", &self.inner.base)
			.field("is_sub_router", &self.inner.is_sub_router)
			.field("state", &*self.inner.state.lock())
			.field("generation", &self.inner.epoch.load(Ordering::SeqCst))
			.finish()
	}
}

/// Bound navigation target.
///
/// Wraps a path so application code can hand out something followable
/// without holding the router itself. Following a link after its adapter
/// is gone is a no-op.
#[derive(Clone)]
pub struct Link {
	adapter: Weak<dyn NavigationAdapter>,
	href: String,
}

impl Link {
	/// The target path.
	pub fn href(&self) -> &str {
		&self.href
	}

	/// Navigates to the target, suppressing any host-default follow
	/// behavior by going through the adapter instead.
	pub async fn follow(&self) -> Result<(), RouterError> {
		match self.adapter.upgrade() {
			Some(adapter) => adapter.push(&self.href).await,
			None => {
				debug!(href = self.href, "link followed after adapter teardown");
				Ok(())
			}
		}
	}
}

impl std::fmt::Debug for Link {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Link").field("href", &self.href).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::handler::immediate;
	use crate::memory::MemoryAdapter;
	use crate::table::RouteTable;

	fn noop() -> Arc<dyn RouteHandler> {
		immediate(|_| {})
	}

	#[tokio::test]
	async fn start_runs_initial_cycle() {
		let adapter = Arc::new(MemoryAdapter::new("/home"));
		let table = RouteTable::new().route("/home", vec![noop()]);
		let router = Router::start(RouterConfig::new(table), adapter).await.unwrap();

		assert_eq!(router.state(), RouterState::Idle);
		assert_eq!(router.generation(), 1);
		assert_eq!(router.history().entries(), ["/home"]);
		assert_eq!(router.active_route().unwrap().path, "/home");
	}

	#[tokio::test]
	async fn start_rejects_duplicate_default() {
		let adapter = Arc::new(MemoryAdapter::new("/"));
		let table = RouteTable::new()
			.fallback(vec![noop()])
			.fallback(vec![noop()]);
		let err = Router::start(RouterConfig::new(table), adapter).await.unwrap_err();
		assert!(matches!(err, RouterError::Configuration(_)));
	}

	#[tokio::test]
	async fn unmatched_cycle_leaves_context_unset_but_counts() {
		let adapter = Arc::new(MemoryAdapter::new("/nowhere"));
		let table = RouteTable::new().route("/home", vec![noop()]);
		let router = Router::start(RouterConfig::new(table), adapter).await.unwrap();

		assert!(router.active_route().is_none());
		assert_eq!(router.history().entries(), ["/nowhere"]);
		assert_eq!(router.state(), RouterState::Idle);
	}

	#[tokio::test]
	async fn detach_unsubscribes_once() {
		let adapter = Arc::new(MemoryAdapter::new("/"));
		let table = RouteTable::new().fallback(vec![noop()]);
		let router = Router::start(
			RouterConfig::new(table),
			Arc::clone(&adapter) as Arc<dyn NavigationAdapter>,
		)
		.await
		.unwrap();
		assert_eq!(adapter.subscriber_count(), 1);

		router.detach();
		router.detach();
		assert_eq!(adapter.subscriber_count(), 0);
	}

	#[tokio::test]
	async fn drop_detaches() {
		let adapter = Arc::new(MemoryAdapter::new("/"));
		let table = RouteTable::new().fallback(vec![noop()]);
		let router = Router::start(
			RouterConfig::new(table),
			Arc::clone(&adapter) as Arc<dyn NavigationAdapter>,
		)
		.await
		.unwrap();
		drop(router);
		assert_eq!(adapter.subscriber_count(), 0);
	}

	#[tokio::test]
	async fn link_reports_href_and_follows() {
		let adapter = Arc::new(MemoryAdapter::new("/"));
		let table = RouteTable::new()
			.route("/about", vec![noop()])
			.fallback(vec![noop()]);
		let router = Router::start(RouterConfig::new(table), adapter).await.unwrap();

		let link = router.link("/about");
		assert_eq!(link.href(), "/about");
		link.follow().await.unwrap();
		assert_eq!(router.active_route().unwrap().path, "/about");
	}
}

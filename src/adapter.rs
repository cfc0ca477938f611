//! Abstract navigation source.
//!
//! The router never talks to a host environment directly. It observes an
//! adapter that owns the current location and emits a signal whenever the
//! location changes, wherever the change came from. Programmatic pushes
//! and replaces go back through the same adapter so that every mutation
//! path produces exactly one signal.

use crate::error::RouterError;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Why the location changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationSignal {
	/// The host moved backward or forward through its own history.
	Pop,
	/// Only the fragment portion of the location changed.
	Fragment,
	/// A new location was pushed programmatically.
	Push,
	/// The current location was replaced programmatically.
	Replace,
}

/// Handle identifying one subscriber on an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
	pub fn new(id: u64) -> Self {
		Self(id)
	}
}

/// Callback invoked by an adapter for every location change.
///
/// Subscribers are awaited sequentially in subscription order; an error
/// from one aborts notification and surfaces to whoever mutated the
/// location.
pub type Subscriber =
	Arc<dyn Fn(NavigationSignal) -> BoxFuture<'static, Result<(), RouterError>> + Send + Sync>;

/// Source of location state and change signals.
///
/// An adapter implementation wraps one host environment. It must emit a
/// signal to every live subscriber for each location mutation, including
/// its own `push` and `replace`, and must not drop mutations silently.
#[async_trait]
pub trait NavigationAdapter: Send + Sync {
	/// The current path with query and fragment stripped.
	fn current_path(&self) -> String;

	/// The current raw location, query and fragment included.
	fn current_location(&self) -> String;

	/// Records `location` as a new history entry and signals subscribers.
	async fn push(&self, location: &str) -> Result<(), RouterError>;

	/// Replaces the current history entry with `location` and signals
	/// subscribers.
	async fn replace(&self, location: &str) -> Result<(), RouterError>;

	/// Registers a subscriber and returns its handle.
	fn subscribe(&self, subscriber: Subscriber) -> SubscriptionId;

	/// Removes a subscriber. Unknown handles are ignored.
	fn unsubscribe(&self, id: SubscriptionId);
}

//! In-memory navigation adapter.
//!
//! Backs tests and headless use: holds the location in process memory and
//! exposes drivers that simulate host-initiated changes (history pops,
//! fragment edits) alongside the programmatic `push`/`replace` surface.

use crate::adapter::{NavigationAdapter, NavigationSignal, Subscriber, SubscriptionId};
use crate::error::RouterError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Adapter holding location state in memory.
#[derive(Default)]
pub struct MemoryAdapter {
	location: Mutex<String>,
	subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
	next_id: AtomicU64,
}

impl MemoryAdapter {
	/// Creates an adapter positioned at `location`.
	pub fn new(location: impl Into<String>) -> Self {
		Self {
			location: Mutex::new(location.into()),
			subscribers: Mutex::new(Vec::new()),
			next_id: AtomicU64::new(0),
		}
	}

	/// Simulates the host moving through its own history to `location`.
	pub async fn pop_to(&self, location: impl Into<String>) -> Result<(), RouterError> {
		*self.location.lock() = location.into();
		self.notify(NavigationSignal::Pop).await
	}

	/// Simulates a fragment-only location change.
	pub async fn change_fragment(&self, fragment: &str) -> Result<(), RouterError> {
		{
			let mut location = self.location.lock();
			let base = match location.find('#') {
				Some(i) => &location[..i],
				None => location.as_str(),
			};
			*location = format!("{base}#{fragment}");
		}
		self.notify(NavigationSignal::Fragment).await
	}

	/// Number of live subscriptions.
	pub fn subscriber_count(&self) -> usize {
		self.subscribers.lock().len()
	}

	async fn notify(&self, signal: NavigationSignal) -> Result<(), RouterError> {
		// Snapshot under the lock, await outside it. A subscriber may
		// mutate the registry (or the location) while being notified.
		let snapshot: Vec<Subscriber> = self
			.subscribers
			.lock()
			.iter()
			.map(|(_, subscriber)| Subscriber::clone(subscriber))
			.collect();

		debug!(?signal, subscribers = snapshot.len(), "notifying location change");
		for subscriber in snapshot {
			subscriber(signal).await?;
		}
		Ok(())
	}
}

#[async_trait]
impl NavigationAdapter for MemoryAdapter {
	fn current_path(&self) -> String {
		let location = self.location.lock();
		match location.find(['?', '#']) {
			Some(i) => location[..i].to_string(),
			None => location.clone(),
		}
	}

	fn current_location(&self) -> String {
		self.location.lock().clone()
	}

	async fn push(&self, location: &str) -> Result<(), RouterError> {
		*self.location.lock() = location.to_string();
		self.notify(NavigationSignal::Push).await
	}

	async fn replace(&self, location: &str) -> Result<(), RouterError> {
		*self.location.lock() = location.to_string();
		self.notify(NavigationSignal::Replace).await
	}

	fn subscribe(&self, subscriber: Subscriber) -> SubscriptionId {
		let id = SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.subscribers.lock().push((id, subscriber));
		id
	}

	fn unsubscribe(&self, id: SubscriptionId) {
		self.subscribers.lock().retain(|(sid, _)| *sid != id);
	}
}

impl std::fmt::Debug for MemoryAdapter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryAdapter")
			.field("location", &*self.location.lock())
			.field("subscribers", &self.subscribers.lock().len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use std::sync::atomic::AtomicUsize;

	fn recording(
		log: Arc<Mutex<Vec<NavigationSignal>>>,
	) -> Subscriber {
		Arc::new(move |signal| {
			let log = Arc::clone(&log);
			Box::pin(async move {
				log.lock().push(signal);
				Ok(())
			})
		})
	}

	#[test]
	fn current_path_strips_query_and_fragment() {
		let adapter = MemoryAdapter::new("/a/b?k=v#frag");
		assert_eq!(adapter.current_path(), "/a/b");
		assert_eq!(adapter.current_location(), "/a/b?k=v#frag");
	}

	#[tokio::test]
	async fn push_updates_location_and_signals() {
		let adapter = MemoryAdapter::new("/");
		let log = Arc::new(Mutex::new(Vec::new()));
		adapter.subscribe(recording(Arc::clone(&log)));

		adapter.push("/next").await.unwrap();
		assert_eq!(adapter.current_path(), "/next");
		assert_eq!(*log.lock(), vec![NavigationSignal::Push]);
	}

	#[tokio::test]
	async fn pop_and_fragment_emit_their_signals() {
		let adapter = MemoryAdapter::new("/a");
		let log = Arc::new(Mutex::new(Vec::new()));
		adapter.subscribe(recording(Arc::clone(&log)));

		adapter.pop_to("/b").await.unwrap();
		adapter.change_fragment("section").await.unwrap();
		assert_eq!(adapter.current_location(), "/b#section");
		assert_eq!(
			*log.lock(),
			vec![NavigationSignal::Pop, NavigationSignal::Fragment]
		);
	}

	#[tokio::test]
	async fn change_fragment_replaces_existing_fragment() {
		let adapter = MemoryAdapter::new("/a#old");
		adapter.change_fragment("new").await.unwrap();
		assert_eq!(adapter.current_location(), "/a#new");
	}

	#[tokio::test]
	async fn unsubscribe_stops_delivery() {
		let adapter = MemoryAdapter::new("/");
		let log = Arc::new(Mutex::new(Vec::new()));
		let id = adapter.subscribe(recording(Arc::clone(&log)));
		assert_eq!(adapter.subscriber_count(), 1);

		adapter.unsubscribe(id);
		assert_eq!(adapter.subscriber_count(), 0);

		adapter.push("/next").await.unwrap();
		assert!(log.lock().is_empty());
	}

	#[tokio::test]
	async fn subscriber_error_aborts_notification() {
		let adapter = MemoryAdapter::new("/");
		let calls = Arc::new(AtomicUsize::new(0));

		adapter.subscribe(Arc::new(|_| {
			Box::pin(async { Err(RouterError::handler("/next", "refused")) })
		}));
		let calls_clone = Arc::clone(&calls);
		adapter.subscribe(Arc::new(move |_| {
			let calls = Arc::clone(&calls_clone);
			Box::pin(async move {
				calls.fetch_add(1, Ordering::SeqCst);
				Ok(())
			})
		}));

		assert!(adapter.push("/next").await.is_err());
		assert_eq!(calls.load(Ordering::SeqCst), 0);
	}
}

//! Route handler abstractions and the continuation-gated chain step.
//!
//! Handlers follow a continuation style: each is invoked with the active
//! route context and a one-shot [`Proceed`] token, and the chain advances
//! only once the token fires. A handler is free to hand the token to a
//! spawned task and fire it later; until then the chain is suspended.

use crate::context::RouteContext;
use crate::error::{HandlerError, RouterError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// Trait for functions run when a route matches.
///
/// The chain runner awaits `proceed` after each call before invoking the
/// next handler. A handler that never fires its token stalls the chain
/// indefinitely; this is accepted behavior unless a per-handler timeout is
/// configured on the router.
pub trait RouteHandler: Send + Sync {
	/// Invokes the handler with the active route context.
	///
	/// # Errors
	///
	/// Returning an error aborts the remaining handlers in the chain and
	/// surfaces to whoever triggered the navigation cycle.
	fn call(&self, ctx: Arc<RouteContext>, proceed: Proceed) -> Result<(), HandlerError>;
}

/// One-shot continuation token advancing the handler chain.
///
/// Consumed by value: it can be fired exactly once. Dropping it without
/// firing leaves the chain suspended, exactly like a handler that never
/// calls proceed.
#[derive(Debug)]
pub struct Proceed {
	tx: Option<oneshot::Sender<()>>,
}

impl Proceed {
	pub(crate) fn new(tx: oneshot::Sender<()>) -> Self {
		Self { tx: Some(tx) }
	}

	/// Fires the continuation, letting the chain advance to the next handler.
	pub fn proceed(mut self) {
		if let Some(tx) = self.tx.take() {
			// The runner may already be gone (superseded cycle); ignore.
			let _ = tx.send(());
		}
	}
}

struct FnHandler<F> {
	handler: F,
}

impl<F> RouteHandler for FnHandler<F>
where
	F: Fn(Arc<RouteContext>, Proceed) -> Result<(), HandlerError> + Send + Sync,
{
	fn call(&self, ctx: Arc<RouteContext>, proceed: Proceed) -> Result<(), HandlerError> {
		(self.handler)(ctx, proceed)
	}
}

struct ImmediateHandler<F> {
	handler: F,
}

impl<F> RouteHandler for ImmediateHandler<F>
where
	F: Fn(&RouteContext) + Send + Sync,
{
	fn call(&self, ctx: Arc<RouteContext>, proceed: Proceed) -> Result<(), HandlerError> {
		(self.handler)(&ctx);
		proceed.proceed();
		Ok(())
	}
}

/// Creates a handler from a full continuation-style closure.
pub fn handler_fn<F>(handler: F) -> Arc<dyn RouteHandler>
where
	F: Fn(Arc<RouteContext>, Proceed) -> Result<(), HandlerError> + Send + Sync + 'static,
{
	Arc::new(FnHandler { handler })
}

/// Creates a handler that runs a closure and proceeds immediately.
///
/// Covers the common case of a handler with no asynchronous work.
pub fn immediate<F>(handler: F) -> Arc<dyn RouteHandler>
where
	F: Fn(&RouteContext) + Send + Sync + 'static,
{
	Arc::new(ImmediateHandler { handler })
}

/// Runs one handler and suspends until its continuation fires.
///
/// With `limit` set, a chain that fails to proceed in time fails with
/// [`RouterError::HandlerTimeout`] instead of stalling forever.
pub(crate) async fn await_proceed(
	handler: &dyn RouteHandler,
	ctx: Arc<RouteContext>,
	path: &str,
	limit: Option<Duration>,
) -> Result<(), RouterError> {
	let (tx, rx) = oneshot::channel();
	handler
		.call(ctx, Proceed::new(tx))
		.map_err(|source| RouterError::Handler {
			path: path.to_string(),
			source,
		})?;

	let wait = async move {
		if rx.await.is_err() {
			// Token dropped without firing: treat it the same as a handler
			// that never calls proceed and park the chain.
			futures::future::pending::<()>().await;
		}
	};

	match limit {
		Some(limit) => tokio::time::timeout(limit, wait)
			.await
			.map_err(|_| RouterError::HandlerTimeout {
				path: path.to_string(),
				limit,
			}),
		None => {
			wait.await;
			Ok(())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use std::sync::atomic::{AtomicBool, Ordering};

	fn test_ctx() -> Arc<RouteContext> {
		Arc::new(RouteContext {
			path: "/t".to_string(),
			path_parts: vec!["t".to_string()],
			params: HashMap::new(),
			query: HashMap::new(),
			previous_path: None,
			generation: 1,
		})
	}

	#[tokio::test]
	async fn immediate_handler_proceeds() {
		let seen = Arc::new(AtomicBool::new(false));
		let seen_clone = Arc::clone(&seen);
		let handler = immediate(move |ctx| {
			assert_eq!(ctx.path, "/t");
			seen_clone.store(true, Ordering::SeqCst);
		});

		await_proceed(handler.as_ref(), test_ctx(), "/t", None)
			.await
			.unwrap();
		assert!(seen.load(Ordering::SeqCst));
	}

	#[tokio::test]
	async fn handler_error_aborts() {
		let handler = handler_fn(|_ctx, _proceed| Err("nope".into()));

		let err = await_proceed(handler.as_ref(), test_ctx(), "/t", None)
			.await
			.unwrap_err();
		assert!(matches!(err, RouterError::Handler { .. }));
	}

	#[tokio::test(start_paused = true)]
	async fn dropped_token_times_out_when_configured() {
		let handler = handler_fn(|_ctx, _proceed| Ok(()));

		let err = await_proceed(
			handler.as_ref(),
			test_ctx(),
			"/t",
			Some(Duration::from_millis(10)),
		)
		.await
		.unwrap_err();
		assert!(matches!(err, RouterError::HandlerTimeout { .. }));
	}

	#[tokio::test(start_paused = true)]
	async fn unfired_token_stalls_without_timeout() {
		let handler = handler_fn(|_ctx, _proceed| Ok(()));

		let stalled = tokio::time::timeout(
			Duration::from_secs(5),
			await_proceed(handler.as_ref(), test_ctx(), "/t", None),
		)
		.await;
		assert!(stalled.is_err());
	}

	#[tokio::test]
	async fn deferred_proceed_resumes_chain() {
		let handler = handler_fn(|_ctx, proceed| {
			tokio::spawn(async move {
				tokio::task::yield_now().await;
				proceed.proceed();
			});
			Ok(())
		});

		await_proceed(handler.as_ref(), test_ctx(), "/t", None)
			.await
			.unwrap();
	}
}

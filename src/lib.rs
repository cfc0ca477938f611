//! # Veer
//!
//! Declarative client-side navigation engine with nested router
//! coordination.
//!
//! ## Overview
//!
//! Veer matches a location path against an ordered table of patterns,
//! runs the matched entry's handler chain under continuation control, and
//! coordinates nested routers so a parent's handlers are not re-run while
//! only a nested segment of the path changes.
//!
//! The engine never touches a host environment directly. It observes a
//! [`NavigationAdapter`], which owns the current location and signals
//! every change; the crate ships [`MemoryAdapter`] for tests and headless
//! use, and a browser binding is the embedding application's job.
//!
//! ## Architecture
//!
//! ```text
//! Signal → Router → Pattern Matcher → History (suppression) → Context
//!                                                                ↓
//!                         global pre → route handlers → global post
//! ```
//!
//! ## Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use veer::{MemoryAdapter, Router, RouterConfig, RouteTable, immediate};
//!
//! # tokio_test::block_on(async {
//! let table = RouteTable::new()
//!     .route("/users/:id", vec![immediate(|ctx| {
//!         println!("user {:?}", ctx.params["id"]);
//!     })])
//!     .fallback(vec![immediate(|ctx| {
//!         println!("no such page: {}", ctx.path);
//!     })]);
//!
//! let adapter = Arc::new(MemoryAdapter::new("/users/42"));
//! let router = Router::start(RouterConfig::new(table), adapter).await.unwrap();
//!
//! let ctx = router.active_route().unwrap();
//! assert_eq!(ctx.params["id"], Some("42".to_string()));
//!
//! router.navigate("/users/7?tab=posts").await.unwrap();
//! let ctx = router.active_route().unwrap();
//! assert_eq!(ctx.params["id"], Some("7".to_string()));
//! assert_eq!(ctx.query["tab"], "posts");
//! assert_eq!(ctx.previous_path.as_deref(), Some("/users/42"));
//! # });
//! ```
//!
//! Handlers that need to defer the rest of the chain take the
//! continuation token explicitly:
//!
//! ```rust
//! use veer::handler_fn;
//!
//! let guard = handler_fn(|ctx, proceed| {
//!     if ctx.query.contains_key("preview") {
//!         // Hold the chain; fire `proceed` later from a spawned task.
//!         tokio::spawn(async move { proceed.proceed() });
//!     } else {
//!         proceed.proceed();
//!     }
//!     Ok(())
//! });
//! # let _ = guard;
//! ```

mod adapter;
mod config;
mod context;
mod error;
mod handler;
mod history;
mod memory;
mod pattern;
mod router;
mod table;

pub use adapter::{NavigationAdapter, NavigationSignal, Subscriber, SubscriptionId};
pub use config::RouterConfig;
pub use context::RouteContext;
pub use error::{ConfigurationError, HandlerError, RouterError};
pub use handler::{Proceed, RouteHandler, handler_fn, immediate};
pub use history::HistoryLog;
pub use memory::MemoryAdapter;
pub use router::{Link, Router, RouterState};
pub use table::{DEFAULT_ROUTE, RouteEntry, RouteTable};

//! # eventry
//!
//! **Eventry** is a lightweight, in-process, type-routed event dispatch
//! library for Rust.
//!
//! It provides a registry that maps event categories to subscriber chains
//! and a small set of composable delivery strategies: sequential,
//! concurrent fan-out, concurrency-limited, and deferred/buffered. The
//! crate is designed as a building block: concrete event catalogs and
//! payloads belong to the consuming application.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!      caller ── publish(ctx, event) ──► Registry
//!                                           │ lookup by EventType
//!                          ┌────────────────┼─────────────────┐
//!                          ▼                ▼                 ▼
//!                     Subscriber        Ordered            Fanout
//!                     (single)       [s1, s2, s3]      ┌─ task s1
//!                                     run in order     ├─ task s2
//!                                     last error wins  └─ task s3
//!                                                      join, first
//!                                                      error wins
//!                          ▼
//!                      Limited(inner, n)
//!                      permit pool, ≤ n in flight,
//!                      cancellable acquire
//!
//!      caller ── publish ──► Buffer (FIFO queue) ── dispatch ──► Registry
//!                            queue now, deliver later, re-entrant safe
//! ```
//!
//! ### Delivery semantics
//! | Strategy    | Ordering             | Failure policy                        |
//! |-------------|----------------------|---------------------------------------|
//! | [`Ordered`] | registration order   | never stops early; last failure wins  |
//! | [`Fanout`]  | none (fork-join)     | first observed failure wins (racy)    |
//! | [`Limited`] | caller's             | delegate's error, or `Canceled`       |
//! | [`Registry`]| per-type chain order | whatever the routed subscriber returns|
//! | [`Buffer`]  | strict FIFO drain    | never stops early; last failure wins  |
//!
//! Unregistered event types are never an error: publishing one is a
//! silent, successful no-op.
//!
//! ## Cancellation
//! Every call threads the caller's [`CancellationToken`] through
//! unchanged. The engine never creates tokens, deadlines, or timers of its
//! own; only [`Limited`] inspects the token (a saturated permit pool is a
//! cancellable wait), everything else propagates it to whatever it calls.
//!
//! ## Concurrency model
//! The caller's task runs synchronously through [`Registry`], [`Ordered`]
//! and [`Buffer`]. [`Fanout`] is the sole source of internal parallelism:
//! one task per member, joined before returning. [`Limited`]'s permit pool
//! is the only concurrently-shared mutable state. Build a [`Registry`]
//! fully before publishing (the consuming builder makes this a
//! compile-time property) and keep one [`Buffer`] per unit of work.
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a simple console subscriber
//!   _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use eventry::{DispatchError, Event, EventRef, EventType, Func, Publisher, Registry};
//!
//! const ORDER_PLACED: EventType = EventType::new(0);
//! const ORDER_SHIPPED: EventType = EventType::new(1);
//!
//! struct OrderPlaced {
//!     order_id: u64,
//! }
//!
//! impl Event for OrderPlaced {
//!     fn event_type(&self) -> EventType {
//!         ORDER_PLACED
//!     }
//!
//!     fn as_any(&self) -> &dyn std::any::Any {
//!         self
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), DispatchError> {
//!     let registry = Registry::new()
//!         .on(ORDER_PLACED, Func::new(|_ctx, ev: EventRef| async move {
//!             let order = ev.downcast_ref::<OrderPlaced>().ok_or_else(|| {
//!                 DispatchError::failed("unexpected payload under ORDER_PLACED")
//!             })?;
//!             println!("placing order {}", order.order_id);
//!             Ok::<_, DispatchError>(())
//!         }));
//!
//!     let ctx = CancellationToken::new();
//!     registry
//!         .publish(ctx.clone(), Arc::new(OrderPlaced { order_id: 7 }))
//!         .await?;
//!
//!     // ORDER_SHIPPED has no registration: publishing it is a no-op.
//!     # let _ = ORDER_SHIPPED;
//!     Ok(())
//! }
//! ```
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

mod dispatch;
mod error;
mod events;
mod publishers;
mod subscribers;

// ---- Public re-exports ----

pub use dispatch::{Fanout, Limited, Ordered};
pub use error::DispatchError;
pub use events::{Event, EventRef, EventType};
pub use publishers::{Buffer, Registry};
pub use subscribers::{Discard, Func, Publisher, PublisherRef, Subscriber, SubscriberRef};

// Optional: expose a simple built-in logging subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

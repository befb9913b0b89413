//! # Subscriber capability and adapters.
//!
//! The [`Subscriber`] trait is the behavioral contract every delivery
//! target implements: "can handle one event, may fail". [`Publisher`]
//! extends it with an explicit `publish` operation for origination points.
//!
//! ## Contents
//! - [`Subscriber`], [`Publisher`] — the capability traits, plus the shared
//!   handles [`SubscriberRef`] and [`PublisherRef`]
//! - [`Func`] — adapts a plain async closure into a subscriber
//! - [`Discard`] — the designated no-op subscriber
//! - [`LogWriter`] — console subscriber for demos (feature `logging`)
//!
//! ## Implementing custom subscribers
//! ```rust
//! use async_trait::async_trait;
//! use tokio_util::sync::CancellationToken;
//! use eventry::{DispatchError, EventRef, Subscriber};
//!
//! struct Metrics;
//!
//! #[async_trait]
//! impl Subscriber for Metrics {
//!     async fn handle(
//!         &self,
//!         _ctx: CancellationToken,
//!         event: EventRef,
//!     ) -> Result<(), DispatchError> {
//!         // increment a counter keyed by event.event_type(), etc.
//!         let _ = event;
//!         Ok(())
//!     }
//! }
//! ```

mod func;
#[cfg(feature = "logging")]
mod log;
mod subscriber;

pub use func::{Discard, Func};
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::{Publisher, PublisherRef, Subscriber, SubscriberRef};

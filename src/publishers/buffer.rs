//! # Deferred publisher with an explicit drain.
//!
//! [`Buffer`] decouples *recording* an event from *delivering* it:
//! [`Buffer::publish`] only appends to an internal FIFO queue and cannot
//! fail; [`Buffer::dispatch`] drains the queue through the downstream
//! publisher, head first, until it is empty.
//!
//! Draining is re-entrancy aware: a downstream handler may publish derived
//! events back into the same buffer, and those land at the tail and are
//! delivered within the *same* `dispatch` call. `dispatch` returns only
//! once the queue is empty.
//!
//! ## State machine
//! ```text
//! {empty} ──publish──► {buffering} ──dispatch (queue empties)──► {empty}
//! {buffering} ──dispatch with re-entrant publish──► stays draining
//!                                                   until empty
//! ```
//! A drained buffer is fully reusable; `empty` is the only resting state.
//!
//! ## Ownership
//! Create one buffer per logical unit of work (one request, one
//! transaction) and keep it on that one flow of control. The queue is not
//! meant for concurrent producers; the downstream publisher is shared and
//! is *not* owned by the buffer.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::error::DispatchError;
use crate::events::EventRef;
use crate::subscribers::{Publisher, PublisherRef, Subscriber};

/// Deferred publisher: queue now, deliver on [`Buffer::dispatch`].
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
/// use eventry::{Buffer, Discard, EventType, Publisher, Registry};
/// # use eventry::Event;
///
/// const SAVED: EventType = EventType::new(0);
/// # struct Saved;
/// # impl Event for Saved {
/// #     fn event_type(&self) -> EventType { SAVED }
/// #     fn as_any(&self) -> &dyn std::any::Any { self }
/// # }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), eventry::DispatchError> {
/// let buffer = Buffer::new(Registry::new().on(SAVED, Discard));
/// let ctx = CancellationToken::new();
///
/// buffer.publish(ctx.clone(), Arc::new(Saved)).await?; // queued, not delivered
/// assert_eq!(buffer.pending().await, 1);
///
/// buffer.dispatch(ctx).await?; // delivered
/// assert_eq!(buffer.pending().await, 0);
/// # Ok(())
/// # }
/// ```
pub struct Buffer {
    downstream: PublisherRef,
    queue: Mutex<VecDeque<EventRef>>,
}

impl Buffer {
    /// Creates a buffer in front of `downstream`.
    #[must_use]
    pub fn new(downstream: impl Publisher) -> Self {
        Self {
            downstream: Arc::new(downstream),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Drains the queue through the downstream publisher.
    ///
    /// Events are forwarded strictly in insertion order. Events published
    /// into this buffer *while* draining join the tail and are delivered
    /// before this call returns. Forwarding failures never stop the drain;
    /// the failure recorded last is returned once the queue is empty.
    pub async fn dispatch(&self, ctx: CancellationToken) -> Result<(), DispatchError> {
        let mut last: Option<DispatchError> = None;
        loop {
            // The lock is scoped to the pop so re-entrant publishes from
            // the downstream handler can enqueue while we forward.
            let next = self.queue.lock().await.pop_front();
            let Some(event) = next else { break };
            if let Err(err) = self.downstream.publish(ctx.clone(), event).await {
                last = Some(err);
            }
        }
        match last {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Number of events currently queued.
    pub async fn pending(&self) -> usize {
        self.queue.lock().await.len()
    }
}

#[async_trait]
impl Subscriber for Buffer {
    /// Appends the event to the queue; buffering cannot fail.
    async fn handle(&self, _ctx: CancellationToken, event: EventRef) -> Result<(), DispatchError> {
        self.queue.lock().await.push_back(event);
        Ok(())
    }
}

impl Publisher for Buffer {}

//! # Concurrent fan-out with a join barrier.
//!
//! [`Fanout`] starts one task per member, then waits for all of them to
//! finish before returning: a fork-join barrier, synchronous from the
//! caller's point of view. Members run with no ordering among themselves
//! and no ordering relative to the caller beyond the barrier.
//!
//! ## Error policy
//! When one or more members fail, exactly one error is returned: the one
//! whose completion is observed first by the joining loop. With several
//! failing members this choice is a race and **nondeterministic**; callers
//! must not depend on which error surfaces, only that it is one of the
//! members' own errors and never `Ok`.
//!
//! ## Panic isolation
//! A panicking member is contained on its own task and reported as
//! [`DispatchError::Panicked`]; siblings and the caller keep running.
//!
//! ```text
//!    handle(ev)
//!        │              (Arc-clone per member)
//!        ├────────────► task S1 ─► s1.handle()
//!        ├────────────► task S2 ─► s2.handle()
//!        └────────────► task SN ─► sN.handle()
//!                           │
//!                join_next() until drained
//! ```

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::DispatchError;
use crate::events::EventRef;
use crate::subscribers::{Subscriber, SubscriberRef};

/// Concurrent fan-out combinator over a set of subscribers.
///
/// Requires a Tokio runtime: each member is spawned as its own task. An
/// empty set is valid and handles every event as a successful no-op.
///
/// # Example
/// ```rust
/// use eventry::{Discard, Fanout};
///
/// let fanout = Fanout::new().with(Discard).with(Discard);
/// assert_eq!(fanout.len(), 2);
/// ```
#[derive(Default)]
pub struct Fanout {
    members: Vec<SubscriberRef>,
}

impl Fanout {
    /// Creates an empty fan-out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member, returning the fan-out for further building.
    #[must_use]
    pub fn with(mut self, subscriber: impl Subscriber) -> Self {
        self.members.push(Arc::new(subscriber));
        self
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if the fan-out has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

#[async_trait]
impl Subscriber for Fanout {
    /// Spawns one task per member and joins all of them.
    ///
    /// Returns the first failure observed while joining, or `Ok(())` when
    /// every member succeeded.
    async fn handle(&self, ctx: CancellationToken, event: EventRef) -> Result<(), DispatchError> {
        let mut pending = JoinSet::new();
        for member in &self.members {
            let member = Arc::clone(member);
            let ctx = ctx.clone();
            let event = Arc::clone(&event);
            pending.spawn(async move {
                match std::panic::AssertUnwindSafe(member.handle(ctx, event))
                    .catch_unwind()
                    .await
                {
                    Ok(result) => result,
                    Err(payload) => Err(DispatchError::panicked(panic_reason(payload))),
                }
            });
        }

        let mut first: Option<DispatchError> = None;
        while let Some(joined) = pending.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    if first.is_none() {
                        first = Some(err);
                    }
                }
                // catch_unwind already contains member panics; a join error
                // here means the task itself was torn down.
                Err(err) => {
                    if first.is_none() {
                        first = Some(DispatchError::panicked(err.to_string()));
                    }
                }
            }
        }

        match first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, EventType};
    use crate::subscribers::Func;
    use std::sync::atomic::{AtomicU32, Ordering};

    const BLAST: EventType = EventType::new(0);

    struct Blast;

    impl Event for Blast {
        fn event_type(&self) -> EventType {
            BLAST
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn counting_member(hits: &Arc<AtomicU32>) -> impl Subscriber {
        let hits = Arc::clone(hits);
        Func::new(move |_ctx, _ev| {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok::<_, DispatchError>(())
            }
        })
    }

    #[tokio::test]
    async fn test_every_member_sees_the_event() {
        let hits = Arc::new(AtomicU32::new(0));
        let fanout = Fanout::new()
            .with(counting_member(&hits))
            .with(counting_member(&hits))
            .with(counting_member(&hits));

        fanout
            .handle(CancellationToken::new(), Arc::new(Blast))
            .await
            .unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_fanout_is_noop() {
        let fanout = Fanout::new();
        assert!(fanout.is_empty());
        let res = fanout
            .handle(CancellationToken::new(), Arc::new(Blast))
            .await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn test_single_failure_surfaces() {
        let hits = Arc::new(AtomicU32::new(0));
        let fanout = Fanout::new()
            .with(counting_member(&hits))
            .with(Func::new(|_ctx, _ev| async {
                Err::<(), _>(DispatchError::failed("handle error"))
            }))
            .with(counting_member(&hits));

        let err = fanout
            .handle(CancellationToken::new(), Arc::new(Blast))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Failed { error } if error == "handle error"));
        // The failure did not keep siblings from running.
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_multiple_failures_return_one_of_them() {
        let fanout = Fanout::new()
            .with(Func::new(|_ctx, _ev| async {
                Err::<(), _>(DispatchError::failed("alpha"))
            }))
            .with(Func::new(|_ctx, _ev| async {
                Err::<(), _>(DispatchError::failed("beta"))
            }));

        let err = fanout
            .handle(CancellationToken::new(), Arc::new(Blast))
            .await
            .unwrap_err();
        assert!(
            matches!(err, DispatchError::Failed { ref error } if error == "alpha" || error == "beta"),
            "unexpected error: {err:?}"
        );
    }

    #[tokio::test]
    async fn test_nested_chain_inside_fanout() {
        use crate::dispatch::Ordered;

        let outer_hits = Arc::new(AtomicU32::new(0));
        let chain_hits = Arc::new(AtomicU32::new(0));
        let shared = Arc::new(counting_member(&chain_hits));
        let fanout = Fanout::new()
            .with(counting_member(&outer_hits))
            .with(
                Ordered::new()
                    .with(Arc::clone(&shared))
                    .with(Func::new(|_ctx, _ev| async {
                        Err::<(), _>(DispatchError::failed("handle error"))
                    }))
                    .with(shared),
            );

        let err = fanout
            .handle(CancellationToken::new(), Arc::new(Blast))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Failed { ref error } if error == "handle error"));
        assert_eq!(outer_hits.load(Ordering::SeqCst), 1);
        // The shared member sits at both ends of the chain and ran twice;
        // the failure in the middle did not cut the chain short.
        assert_eq!(chain_hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_member_panic_is_contained() {
        let hits = Arc::new(AtomicU32::new(0));
        let fanout = Fanout::new()
            .with(counting_member(&hits))
            .with(Func::new(|_ctx, _ev| async {
                panic!("member blew up");
                #[allow(unreachable_code)]
                Ok::<_, DispatchError>(())
            }));

        let err = fanout
            .handle(CancellationToken::new(), Arc::new(Blast))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Panicked { ref reason } if reason.contains("blew up")));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}

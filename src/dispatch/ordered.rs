//! # Sequential delivery chain.
//!
//! [`Ordered`] invokes its members strictly in construction order, one at a
//! time, and does **not** stop on failure: every member runs, every side
//! effect is observed. When several members fail, the error of the member
//! that failed *last* is returned.
//!
//! An empty chain is valid and handles every event as a successful no-op.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::DispatchError;
use crate::events::EventRef;
use crate::subscribers::{Subscriber, SubscriberRef};

/// Sequential combinator over a list of subscribers.
///
/// Members run in the order they were added. Treat the chain as immutable
/// once it is handed to a registry or another combinator; appending happens
/// only through [`Registry::on`](crate::Registry::on) folding, never by
/// mutating a chain that is already registered.
///
/// # Example
/// ```rust
/// use eventry::{Discard, Ordered};
///
/// let chain = Ordered::new().with(Discard).with(Discard);
/// assert_eq!(chain.len(), 2);
/// ```
#[derive(Default)]
pub struct Ordered {
    members: Vec<SubscriberRef>,
}

impl Ordered {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a member, returning the chain for further building.
    #[must_use]
    pub fn with(mut self, subscriber: impl Subscriber) -> Self {
        self.members.push(Arc::new(subscriber));
        self
    }

    /// Appends an already-shared member.
    pub(crate) fn push_ref(&mut self, subscriber: SubscriberRef) {
        self.members.push(subscriber);
    }

    /// Number of members in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if the chain has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[async_trait]
impl Subscriber for Ordered {
    /// Invokes every member in order; a failure never skips later members.
    ///
    /// Returns the error of the member that failed last, or `Ok(())` if
    /// none failed.
    async fn handle(&self, ctx: CancellationToken, event: EventRef) -> Result<(), DispatchError> {
        let mut last: Option<DispatchError> = None;
        for member in &self.members {
            if let Err(err) = member.handle(ctx.clone(), Arc::clone(&event)).await {
                last = Some(err);
            }
        }
        match last {
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
    use std::sync::Mutex;

    const STEP: EventType = EventType::new(0);

    struct Step;

    impl Event for Step {
        fn event_type(&self) -> EventType {
            STEP
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn tracing_member(
        label: &'static str,
        trace: &Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    ) -> impl Subscriber {
        let trace = Arc::clone(trace);
        Func::new(move |_ctx, _ev| {
            let trace = Arc::clone(&trace);
            async move {
                trace.lock().unwrap().push(label);
                if fail {
                    Err(DispatchError::failed(label))
                } else {
                    Ok(())
                }
            }
        })
    }

    #[tokio::test]
    async fn test_members_run_in_order() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let chain = Ordered::new()
            .with(tracing_member("first", &trace, false))
            .with(tracing_member("second", &trace, false))
            .with(tracing_member("third", &trace, false));

        chain
            .handle(CancellationToken::new(), Arc::new(Step))
            .await
            .unwrap();
        assert_eq!(*trace.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_failure_does_not_short_circuit() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let chain = Ordered::new()
            .with(tracing_member("first", &trace, true))
            .with(tracing_member("second", &trace, false));

        let err = chain
            .handle(CancellationToken::new(), Arc::new(Step))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Failed { error } if error == "first"));
        assert_eq!(*trace.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_last_failure_wins() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let chain = Ordered::new()
            .with(tracing_member("first", &trace, true))
            .with(tracing_member("second", &trace, false))
            .with(tracing_member("third", &trace, true));

        let err = chain
            .handle(CancellationToken::new(), Arc::new(Step))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Failed { error } if error == "third"));
        assert_eq!(*trace.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_empty_chain_is_noop() {
        let chain = Ordered::new();
        assert!(chain.is_empty());
        let res = chain.handle(CancellationToken::new(), Arc::new(Step)).await;
        assert!(res.is_ok());
    }
}

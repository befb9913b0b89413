//! # Type-keyed subscriber registry.
//!
//! [`Registry`] maps each [`EventType`] to the subscriber responsible for
//! it. Registration is a consuming builder: [`Registry::on`] takes and
//! returns the registry, so the whole table is built before anything can
//! publish through it; the registration-then-publish discipline is
//! enforced by ownership rather than by locking.
//!
//! ## Folding rule
//! The first registration for a type is stored verbatim. Every later
//! registration for the same type extends an [`Ordered`] chain, in
//! registration order:
//!
//! ```text
//! on(T, a)            T ─► a
//! on(T, a).on(T, b)   T ─► Ordered[a, b]
//! on(T, a)..on(T, c)  T ─► Ordered[a, b, c]
//! ```
//!
//! ## Unregistered types
//! Publishing an event whose type has no registration is a successful
//! no-op, never an error.
//!
//! ## Nesting
//! A registry is itself a subscriber, so an outer type can dispatch into
//! an inner registry keyed by a finer-grained type.
//!
//! ## Example
//! ```rust
//! use eventry::{Discard, EventType, Registry};
//!
//! const CREATED: EventType = EventType::new(0);
//! const UPDATED: EventType = EventType::new(1);
//!
//! let registry = Registry::new()
//!     .on(CREATED, Discard)
//!     .on(CREATED, Discard) // folded into an ordered chain
//!     .on(UPDATED, Discard);
//! assert_eq!(registry.len(), 2);
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::dispatch::Ordered;
use crate::error::DispatchError;
use crate::events::{EventRef, EventType};
use crate::subscribers::{Publisher, Subscriber, SubscriberRef};

/// How a type's subscribers are stored: a single registration verbatim, or
/// the ordered chain later registrations fold into.
enum Route {
    Single(SubscriberRef),
    Chain(Ordered),
}

impl Route {
    fn extend(&mut self, subscriber: SubscriberRef) {
        match self {
            Route::Single(first) => {
                let mut chain = Ordered::new();
                chain.push_ref(Arc::clone(first));
                chain.push_ref(subscriber);
                *self = Route::Chain(chain);
            }
            Route::Chain(chain) => chain.push_ref(subscriber),
        }
    }

    async fn deliver(
        &self,
        ctx: CancellationToken,
        event: EventRef,
    ) -> Result<(), DispatchError> {
        match self {
            Route::Single(subscriber) => subscriber.handle(ctx, event).await,
            Route::Chain(chain) => chain.handle(ctx, event).await,
        }
    }
}

/// Type-keyed registry of subscribers; the engine's central publisher.
///
/// Build it once, then publish through it from as many tasks as needed:
/// lookups are read-only after construction.
#[derive(Default)]
pub struct Registry {
    routes: HashMap<EventType, Route>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber for an event type.
    ///
    /// Returns the registry to allow chained registration. Repeated
    /// registrations for one type run in registration order, with
    /// last-failure-wins error aggregation (see [`Ordered`]).
    #[must_use]
    pub fn on(mut self, event_type: EventType, subscriber: impl Subscriber) -> Self {
        let subscriber: SubscriberRef = Arc::new(subscriber);
        match self.routes.entry(event_type) {
            Entry::Vacant(slot) => {
                slot.insert(Route::Single(subscriber));
            }
            Entry::Occupied(mut slot) => slot.get_mut().extend(subscriber),
        }
        self
    }

    /// Number of event types with at least one registration.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[async_trait]
impl Subscriber for Registry {
    /// Routes the event to the subscriber registered for its exact type.
    ///
    /// An unregistered type is ignored and returns `Ok(())`.
    async fn handle(&self, ctx: CancellationToken, event: EventRef) -> Result<(), DispatchError> {
        match self.routes.get(&event.event_type()) {
            Some(route) => route.deliver(ctx, event).await,
            None => Ok(()),
        }
    }
}

impl Publisher for Registry {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use crate::subscribers::{Discard, Func};
    use std::sync::Mutex;

    const CREATED: EventType = EventType::new(0);
    const UPDATED: EventType = EventType::new(1);
    const DELETED: EventType = EventType::new(2);
    const OTHER: EventType = EventType::new(3);

    struct Probe {
        ty: EventType,
        id: u32,
    }

    impl Event for Probe {
        fn event_type(&self) -> EventType {
            self.ty
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn probe(ty: EventType, id: u32) -> EventRef {
        Arc::new(Probe { ty, id })
    }

    /// Records every event it observes, in arrival order.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(EventType, u32)>>,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn seen(&self) -> Vec<(EventType, u32)> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Subscriber for Recorder {
        async fn handle(
            &self,
            _ctx: CancellationToken,
            event: EventRef,
        ) -> Result<(), DispatchError> {
            let p = event.downcast_ref::<Probe>().expect("probe event");
            self.seen.lock().unwrap().push((p.ty, p.id));
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl Subscriber for Failing {
        async fn handle(
            &self,
            _ctx: CancellationToken,
            _event: EventRef,
        ) -> Result<(), DispatchError> {
            Err(DispatchError::failed("handle error"))
        }
    }

    #[tokio::test]
    async fn test_routes_by_exact_type_only() {
        let ctx = CancellationToken::new();
        let (sub1, sub2, sub3) = (Recorder::new(), Recorder::new(), Recorder::new());
        let registry = Registry::new()
            .on(CREATED, Arc::clone(&sub1))
            .on(CREATED, Arc::clone(&sub2))
            .on(UPDATED, Arc::clone(&sub2))
            .on(DELETED, Arc::clone(&sub2))
            .on(CREATED, Arc::clone(&sub3))
            .on(UPDATED, Arc::clone(&sub3));

        for ev in [
            probe(CREATED, 1),
            probe(UPDATED, 2),
            probe(DELETED, 3),
            probe(OTHER, 4),
        ] {
            registry.publish(ctx.clone(), ev).await.unwrap();
        }

        assert_eq!(sub1.seen(), vec![(CREATED, 1)]);
        assert_eq!(sub2.seen(), vec![(CREATED, 1), (UPDATED, 2), (DELETED, 3)]);
        assert_eq!(sub3.seen(), vec![(CREATED, 1), (UPDATED, 2)]);
    }

    #[tokio::test]
    async fn test_unregistered_type_is_ignored() {
        let registry = Registry::new();
        assert!(registry.is_empty());

        let res = registry
            .publish(CancellationToken::new(), probe(OTHER, 0))
            .await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn test_nested_registries_route_hierarchically() {
        let ctx = CancellationToken::new();
        let (sub1, sub2, sub3) = (Recorder::new(), Recorder::new(), Recorder::new());
        let registry = Registry::new()
            .on(
                CREATED,
                Registry::new()
                    .on(CREATED, Arc::clone(&sub1))
                    .on(CREATED, Arc::clone(&sub2))
                    .on(UPDATED, Arc::clone(&sub2))
                    .on(DELETED, Arc::clone(&sub3)),
            )
            .on(DELETED, Arc::clone(&sub3));

        for ev in [
            probe(CREATED, 1),
            probe(UPDATED, 2),
            probe(DELETED, 3),
            probe(OTHER, 4),
        ] {
            registry.publish(ctx.clone(), ev).await.unwrap();
        }

        // The inner registry only ever receives CREATED events, so its
        // UPDATED and DELETED routes never fire.
        assert_eq!(sub1.seen(), vec![(CREATED, 1)]);
        assert_eq!(sub2.seen(), vec![(CREATED, 1)]);
        assert_eq!(sub3.seen(), vec![(DELETED, 3)]);
    }

    #[tokio::test]
    async fn test_failing_member_does_not_stop_chain() {
        let ctx = CancellationToken::new();
        let (sub1, sub2) = (Recorder::new(), Recorder::new());
        let registry = Registry::new()
            .on(CREATED, Arc::clone(&sub1))
            .on(CREATED, Failing)
            .on(UPDATED, Arc::clone(&sub2))
            .on(DELETED, Arc::clone(&sub2))
            .on(CREATED, Arc::clone(&sub2))
            .on(UPDATED, Failing);

        for ev in [
            probe(CREATED, 1),
            probe(UPDATED, 2),
            probe(DELETED, 3),
            probe(OTHER, 4),
        ] {
            let res = registry.publish(ctx.clone(), ev.clone()).await;
            match ev.event_type() {
                t if t == CREATED || t == UPDATED => {
                    let err = res.unwrap_err();
                    assert!(
                        matches!(err, DispatchError::Failed { ref error } if error == "handle error")
                    );
                }
                _ => assert!(res.is_ok()),
            }
        }

        assert_eq!(sub1.seen(), vec![(CREATED, 1)]);
        assert_eq!(sub2.seen(), vec![(CREATED, 1), (UPDATED, 2), (DELETED, 3)]);
    }

    #[tokio::test]
    async fn test_discard_registration() {
        let registry = Registry::new().on(CREATED, Discard);
        let res = registry
            .publish(CancellationToken::new(), probe(CREATED, 1))
            .await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn test_absent_func_is_noop() {
        let registry = Registry::new().on(CREATED, None::<Discard>);
        let res = registry
            .publish(CancellationToken::new(), probe(CREATED, 1))
            .await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn test_func_registration_routes_and_fails() {
        let ctx = CancellationToken::new();
        let handled: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));
        let registry = Registry::new()
            .on(CREATED, {
                let handled = Arc::clone(&handled);
                Func::new(move |_ctx, ev: EventRef| {
                    let handled = Arc::clone(&handled);
                    async move {
                        let p = ev.downcast_ref::<Probe>().expect("probe event");
                        handled.lock().unwrap().push(p.id);
                        Ok::<_, DispatchError>(())
                    }
                })
            })
            .on(UPDATED, Func::new(|_ctx, _ev| async {
                Err::<(), DispatchError>(DispatchError::failed("handle error"))
            }));

        registry.publish(ctx.clone(), probe(CREATED, 1)).await.unwrap();
        let err = registry
            .publish(ctx.clone(), probe(UPDATED, 2))
            .await
            .unwrap_err();
        assert_eq!(err.as_label(), "dispatch_failed");
        assert_eq!(*handled.lock().unwrap(), vec![1]);
    }
}

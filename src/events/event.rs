//! # Event category key and event trait.
//!
//! [`EventType`] is an opaque comparable key. It has equality and hashing
//! only (no ordering semantics) and exists purely so a registry can
//! select subscribers quickly. Consumers define their categories as
//! constants:
//!
//! ```rust
//! use eventry::EventType;
//!
//! const CREATED: EventType = EventType::new(0);
//! const UPDATED: EventType = EventType::new(1);
//!
//! assert_ne!(CREATED, UPDATED);
//! ```
//!
//! [`Event`] is the payload contract: any `Send + Sync` value that reports
//! its [`EventType`]. The engine routes by type and never inspects the
//! payload; [`Event::as_any`] exists so *subscribers* can downcast to the
//! concrete type they expect.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque, comparable identifier for an event category.
///
/// Used purely as a lookup key; two types are either equal or unrelated.
/// `const`-constructible so applications can define their catalog of
/// categories as constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventType(u32);

impl EventType {
    /// Creates an event type from a numeric identifier.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        EventType(id)
    }

    /// Returns the underlying numeric identifier.
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A value tagged with an [`EventType`].
///
/// The engine routes events by their type and treats the payload as
/// opaque. Implementations are shared across subscribers as [`EventRef`],
/// so they must be immutable once published.
///
/// # Example
/// ```rust
/// use std::any::Any;
/// use eventry::{Event, EventType};
///
/// const ORDER_PLACED: EventType = EventType::new(7);
///
/// struct OrderPlaced {
///     order_id: u64,
/// }
///
/// impl Event for OrderPlaced {
///     fn event_type(&self) -> EventType {
///         ORDER_PLACED
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let ev = OrderPlaced { order_id: 42 };
/// assert_eq!(ev.event_type(), ORDER_PLACED);
/// ```
pub trait Event: Send + Sync + 'static {
    /// Returns the category this event belongs to.
    fn event_type(&self) -> EventType;

    /// Returns the event as [`Any`] for consumer-side downcasting.
    ///
    /// Implementations return `self`.
    fn as_any(&self) -> &dyn Any;
}

impl dyn Event {
    /// Attempts to view the payload as a concrete event type.
    ///
    /// Routing never uses this; it is a convenience for subscribers that
    /// know which concrete events arrive under a given [`EventType`].
    #[must_use]
    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        self.as_any().downcast_ref()
    }
}

/// Shared handle to an event.
///
/// Events are published once and may be observed by many subscribers,
/// possibly concurrently; `Arc` makes the sharing explicit and cheap.
pub type EventRef = Arc<dyn Event>;

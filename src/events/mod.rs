//! Event contracts: categories and payloads.
//!
//! An [`EventType`] identifies a category of events and is the only thing
//! the engine ever looks at when routing. An [`Event`] is any value that
//! reports its type; payloads are opaque to the engine and flow through to
//! subscribers untouched. [`EventRef`] is the shared handle events travel
//! as.

mod event;

pub use event::{Event, EventRef, EventType};

//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints each handled event to stdout in a human-readable
//! format. This is primarily useful for development, debugging, and the
//! bundled demos.
//!
//! ## Output format
//! ```text
//! [event] type=0
//! [event] type=1
//! ```

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::DispatchError;
use crate::events::EventRef;
use crate::subscribers::Subscriber;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints the type of every event it
/// observes and always succeeds.
///
/// Not intended for production use - implement a custom [`Subscriber`] for
/// structured logging or metrics collection.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    /// Constructs a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscriber for LogWriter {
    async fn handle(&self, _ctx: CancellationToken, event: EventRef) -> Result<(), DispatchError> {
        println!("[event] type={}", event.event_type());
        Ok(())
    }
}

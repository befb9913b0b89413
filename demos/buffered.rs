//! # Demo: buffered
//!
//! Demonstrates deferred delivery with [`Buffer`]: events recorded during
//! a unit of work are delivered in one batch, in order, including events
//! republished by downstream handlers mid-drain.
//!
//! ## Flow
//! ```text
//! publish(UserSaved)   ──► Buffer queue [UserSaved]
//! publish(UserRenamed) ──► Buffer queue [UserSaved, UserRenamed]
//! dispatch()
//!   ├─► UserSaved   ──► Registry ──► LogWriter
//!   ├─► UserRenamed ──► Registry ──► hook republishes CacheStale
//!   └─► CacheStale  ──► Registry ──► LogWriter   (same dispatch call)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example buffered --features logging
//! ```

use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

use eventry::{Buffer, Event, EventType, Func, LogWriter, Publisher, Registry};

const USER_SAVED: EventType = EventType::new(0);
const USER_RENAMED: EventType = EventType::new(1);
const CACHE_STALE: EventType = EventType::new(2);

macro_rules! unit_event {
    ($name:ident, $ty:expr) => {
        struct $name;

        impl Event for $name {
            fn event_type(&self) -> EventType {
                $ty
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
    };
}

unit_event!(UserSaved, USER_SAVED);
unit_event!(UserRenamed, USER_RENAMED);
unit_event!(CacheStale, CACHE_STALE);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), eventry::DispatchError> {
    let slot: Arc<OnceLock<Arc<Buffer>>> = Arc::new(OnceLock::new());

    // Renaming a user invalidates a cache: the handler records a derived
    // event through the same buffer it is being drained from.
    let invalidate = {
        let slot = Arc::clone(&slot);
        Func::new(move |ctx, _ev| {
            let slot = Arc::clone(&slot);
            async move {
                let buffer = slot.get().cloned().expect("buffer wired before dispatch");
                buffer.publish(ctx, Arc::new(CacheStale)).await
            }
        })
    };

    let buffer = Arc::new(Buffer::new(
        Registry::new()
            .on(USER_SAVED, LogWriter::new())
            .on(USER_RENAMED, LogWriter::new())
            .on(USER_RENAMED, invalidate)
            .on(CACHE_STALE, LogWriter::new()),
    ));
    slot.set(Arc::clone(&buffer)).ok();

    let ctx = CancellationToken::new();
    buffer.publish(ctx.clone(), Arc::new(UserSaved)).await?;
    buffer.publish(ctx.clone(), Arc::new(UserRenamed)).await?;
    println!("queued: {}", buffer.pending().await);

    buffer.dispatch(ctx).await?;
    println!("queued after dispatch: {}", buffer.pending().await);
    Ok(())
}

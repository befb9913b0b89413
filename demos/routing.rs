//! # Demo: routing
//!
//! Demonstrates the core dispatch shapes on a small order-processing
//! catalog.
//!
//! Shows how to:
//! - Define an event catalog ([`EventType`] constants + [`Event`] impls).
//! - Register subscribers with [`Registry::on`], including repeated
//!   registrations that fold into an ordered chain.
//! - Fan out to independent subscribers with [`Fanout`].
//! - Bound a slow subscriber with [`Limited`].
//!
//! ## Run
//! ```bash
//! cargo run --example routing
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

use eventry::{Event, EventRef, EventType, Fanout, Func, Limited, Publisher, Registry};

const ORDER_PLACED: EventType = EventType::new(0);
const ORDER_SHIPPED: EventType = EventType::new(1);
const ORDER_VOIDED: EventType = EventType::new(2);

struct OrderPlaced {
    order_id: u64,
}

impl Event for OrderPlaced {
    fn event_type(&self) -> EventType {
        ORDER_PLACED
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

struct OrderShipped;

impl Event for OrderShipped {
    fn event_type(&self) -> EventType {
        ORDER_SHIPPED
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

fn announce(label: &'static str) -> impl eventry::Subscriber {
    Func::new(move |_ctx, ev: EventRef| async move {
        println!("[{label}] type={}", ev.event_type());
        Ok::<_, eventry::DispatchError>(())
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), eventry::DispatchError> {
    // A slow audit sink, bounded to two concurrent writes no matter how
    // many events fan out into it.
    let audit = Arc::new(Limited::new(
        Func::new(|_ctx, ev: EventRef| async move {
            time::sleep(Duration::from_millis(25)).await;
            println!("[audit] recorded type={}", ev.event_type());
            Ok::<_, eventry::DispatchError>(())
        }),
        2,
    ));

    let registry = Registry::new()
        // Two registrations for the same type fold into an ordered chain.
        .on(
            ORDER_PLACED,
            Func::new(|_ctx, ev: EventRef| async move {
                let placed = ev
                    .downcast_ref::<OrderPlaced>()
                    .ok_or_else(|| eventry::DispatchError::failed("unexpected payload"))?;
                println!("[billing] invoicing order {}", placed.order_id);
                Ok(())
            }),
        )
        .on(ORDER_PLACED, announce("inventory"))
        // Shipping fans out: notifications run concurrently, audit is
        // shared and bounded.
        .on(
            ORDER_SHIPPED,
            Fanout::new()
                .with(announce("email"))
                .with(announce("sms"))
                .with(Arc::clone(&audit)),
        );

    let ctx = CancellationToken::new();
    registry
        .publish(ctx.clone(), Arc::new(OrderPlaced { order_id: 1 }))
        .await?;
    registry.publish(ctx.clone(), Arc::new(OrderShipped)).await?;

    // Nothing is registered for ORDER_VOIDED; this is a silent no-op.
    struct OrderVoided;
    impl Event for OrderVoided {
        fn event_type(&self) -> EventType {
            ORDER_VOIDED
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }
    registry.publish(ctx, Arc::new(OrderVoided)).await?;

    println!("done");
    Ok(())
}

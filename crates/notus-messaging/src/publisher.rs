//! Publisher/subscriber contracts (C8), kept minimal so any bus transport
//! can implement them. Mirrors `messaging/publisher.py`'s abstract base
//! class -- a single `publish` method taking any outbound message.

use crate::messages::{OutboundMessage, ScanStartMessage};

/// Publishes outbound scan-status and result messages to the bus.
///
/// Implementations should be cheap to call repeatedly: the scan driver
/// calls this once per status/result message and never batches (spec §5).
pub trait Publisher: Send + Sync {
    fn publish(&self, message: &OutboundMessage) -> anyhow::Result<()>;
}

/// Delivers inbound `scan.start` messages to a handler.
///
/// Only `ScanStartMessage` is ever subscribed to in this system (spec §6);
/// a generic subscription mechanism is not needed.
pub trait Subscriber {
    fn subscribe_scan_start(
        &mut self,
        handler: Box<dyn FnMut(ScanStartMessage) + Send>,
    ) -> anyhow::Result<()>;
}

//! Bus message envelope, the three concrete message classes, and the
//! publisher/subscriber contracts (C8) consumed by the scan driver.

mod envelope;
mod error;
mod messages;
mod publisher;

pub use envelope::{parse_checked, EnvelopeMeta, MessageType};
pub use error::Error;
pub use messages::{
    OutboundMessage, ResultMessage, ResultType, ScanStartMessage, ScanStatus, ScanStatusMessage,
};
pub use publisher::{Publisher, Subscriber};

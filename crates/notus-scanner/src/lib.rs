//! Scan driver (C6) and host-name de-duplicator (C7) for the Notus
//! advisory matching engine.

mod driver;
mod hostname;

pub use driver::ScanDriver;
pub use hostname::{HostNameCache, HostNameDecision};

//! Package-ecosystem variants for the Notus advisory matching engine (C2).
//!
//! Each variant (`RpmPackage`, `DebPackage`, `SlackPackage`,
//! `EbuildPackage`, `WindowsPackage`) is a standalone parser/comparator;
//! [`Package`] is the tagged-sum wrapper dispatched on by the advisory
//! loader and scan driver.

mod deb;
mod ebuild;
mod package;
mod rpm;
mod slack;
mod windows;

pub use deb::DebPackage;
pub use ebuild::EbuildPackage;
pub use package::Package;
pub use rpm::RpmPackage;
pub use slack::SlackPackage;
pub use windows::WindowsPackage;

//! Interrupt-safe sharing of the driver.
//!
//! - [`CriticalSectionCell`] - ISR-safe interior mutability
//! - [`SharedEthernet`] - an [`Ethernet`](crate::Ethernet) behind a
//!   critical section, usable from a `static`
//!
//! Requires the `critical-section` feature and a critical-section
//! implementation for the target (for Cortex-M, `cortex-m` with its
//! `critical-section-single-core` feature).

mod primitives;
mod shared;

pub use primitives::CriticalSectionCell;
pub use shared::SharedEthernet;

//! Hardware Abstraction Layer
//!
//! Ports the driver needs from its surroundings, expressed as traits with
//! ready-made implementations.
//!
//! # Modules
//!
//! - [`mdio`]: MII management bus for PHY communication
//! - [`timer`]: Tick source, deadlines and the cooperative yield port
//!
//! # Delay Integration
//!
//! Blocking delays use `embedded_hal::delay::DelayNs` directly. Pass any
//! delay implementation from your HAL.

pub mod mdio;
pub mod timer;

pub use mdio::{MdcClockDivider, MdioBus, MiiManagement};
pub use timer::{Deadline, FnYield, SpinYield, TickCounter, TickSource, Yield};

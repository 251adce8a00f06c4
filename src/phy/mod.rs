//! Ethernet PHY support
//!
//! The PHY is reached only through the [`MdioBus`](crate::hal::mdio::MdioBus)
//! trait, so everything here runs against the MII management controller on
//! hardware and against the simulated PHY in tests.
//!
//! - [`Lan8720`]: register-level operations on the SMSC/Microchip LAN8720
//! - [`LinkManager`]: the reset / autonegotiate / wait-for-link state machine
//!   run during bring-up

pub mod lan8720;
pub mod link;

pub use lan8720::{Lan8720, decode_speed_indication};
pub use link::{LinkManager, LinkState};

use crate::driver::config::{Duplex, Speed};

/// Ethernet link status information
///
/// Contains the negotiated link parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStatus {
    /// Link speed
    pub speed: Speed,
    /// Duplex mode
    pub duplex: Duplex,
}

impl LinkStatus {
    /// Create a new link status
    pub const fn new(speed: Speed, duplex: Duplex) -> Self {
        Self { speed, duplex }
    }

    /// 100 Mbps Full Duplex
    pub const fn fast_full() -> Self {
        Self::new(Speed::Mbps100, Duplex::Full)
    }

    /// 100 Mbps Half Duplex
    pub const fn fast_half() -> Self {
        Self::new(Speed::Mbps100, Duplex::Half)
    }

    /// 10 Mbps Full Duplex
    pub const fn slow_full() -> Self {
        Self::new(Speed::Mbps10, Duplex::Full)
    }

    /// 10 Mbps Half Duplex
    pub const fn slow_half() -> Self {
        Self::new(Speed::Mbps10, Duplex::Half)
    }

    /// True for full duplex
    pub const fn is_full_duplex(&self) -> bool {
        matches!(self.duplex, Duplex::Full)
    }
}

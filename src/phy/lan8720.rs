//! LAN8720 PHY operations
//!
//! The SMSC/Microchip LAN8720 is a 10/100 RMII transceiver. Besides the
//! Clause 22 registers, bring-up uses the Special Modes Register (18) to
//! advertise every mode and the PHY Special Control/Status Register (31) to
//! read back the negotiated speed and duplex.

use super::LinkStatus;
use crate::driver::config::{Duplex, Speed};
use crate::hal::mdio::MdioBus;
use crate::internal::phy_regs::lan8720::{phy_id, pscsr, reg, smr};
use crate::internal::phy_regs::standard::{bmcr, bmsr, phy_reg};

/// Decode PSCSR into speed and duplex
///
/// The duplex/speed field (bits 4:3) carries the duplex in its upper bit:
/// 0 = 10 half, 1 = 100 half, 2 = 10 full, 3 = 100 full. Speed is taken from
/// bit 2 alone, set for 10 Mbps.
pub const fn decode_speed_indication(value: u16) -> LinkStatus {
    let field = (value & pscsr::DUPLEX_MASK) >> pscsr::DUPLEX_SHIFT;
    let duplex = if field & 0b10 != 0 {
        Duplex::Full
    } else {
        Duplex::Half
    };
    let speed = if value & pscsr::SPEED_10 != 0 {
        Speed::Mbps10
    } else {
        Speed::Mbps100
    };
    LinkStatus::new(speed, duplex)
}

/// LAN8720 at a fixed MII address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lan8720 {
    addr: u8,
}

impl Lan8720 {
    /// Create a driver for the PHY at `addr`
    pub const fn new(addr: u8) -> Self {
        Self { addr }
    }

    /// MII address of the PHY
    pub const fn address(&self) -> u8 {
        self.addr
    }

    /// Issue a soft reset (BMCR.RESET)
    ///
    /// The PHY needs its settle time before it answers reliably again.
    pub fn soft_reset<M: MdioBus>(&self, mdio: &mut M) {
        mdio.write(self.addr, phy_reg::BMCR, bmcr::RESET);
    }

    /// Enable autonegotiation and advertise all four speed/duplex modes
    pub fn enable_auto_negotiation<M: MdioBus>(&self, mdio: &mut M) {
        let control = mdio.read(self.addr, phy_reg::BMCR);
        mdio.write(self.addr, phy_reg::BMCR, control | bmcr::AN_ENABLE);

        let modes = mdio.read(self.addr, reg::SMR);
        mdio.write(self.addr, reg::SMR, (modes & !smr::MODE_MASK) | smr::MODE_ALL_AN);
    }

    /// Read the Basic Mode Status Register
    pub fn status<M: MdioBus>(&self, mdio: &mut M) -> u16 {
        mdio.read(self.addr, phy_reg::BMSR)
    }

    /// True when autonegotiation has completed
    pub fn is_auto_negotiation_complete<M: MdioBus>(&self, mdio: &mut M) -> bool {
        self.status(mdio) & bmsr::AN_COMPLETE != 0
    }

    /// True when the link bit is set
    pub fn has_link<M: MdioBus>(&self, mdio: &mut M) -> bool {
        self.status(mdio) & bmsr::LINK_STATUS != 0
    }

    /// True when a single BMSR read shows both link and autonegotiation done
    pub fn is_link_up<M: MdioBus>(&self, mdio: &mut M) -> bool {
        let status = self.status(mdio);
        status & bmsr::LINK_STATUS != 0 && status & bmsr::AN_COMPLETE != 0
    }

    /// Read the negotiated speed and duplex from PSCSR
    pub fn read_speed_indication<M: MdioBus>(&self, mdio: &mut M) -> LinkStatus {
        decode_speed_indication(mdio.read(self.addr, reg::PSCSR))
    }

    /// Read the 32-bit PHY identifier
    pub fn phy_id<M: MdioBus>(&self, mdio: &mut M) -> u32 {
        let high = mdio.read(self.addr, phy_reg::PHYIDR1) as u32;
        let low = mdio.read(self.addr, phy_reg::PHYIDR2) as u32;
        (high << 16) | low
    }

    /// True when the identifier matches a LAN8720 of any revision
    pub fn verify_id<M: MdioBus>(&self, mdio: &mut M) -> bool {
        self.phy_id(mdio) & phy_id::MASK == phy_id::ID
    }
}

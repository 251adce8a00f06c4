//! LAN8720 Vendor-Specific Register Definitions
//!
//! # Module Organization
//!
//! - `phy_id`: PHY identifier constants
//! - `reg`: Register addresses
//! - `smr`: Special Modes Register bits
//! - `pscsr`: PHY Special Control/Status Register bits
//!
//! # References
//!
//! - LAN8720A/LAN8720Ai Datasheet (DS00002165)

#![allow(dead_code)]

/// PHY identifier constants
pub mod phy_id {
    /// PHYIDR1:PHYIDR2 with the revision nibble cleared
    pub const ID: u32 = 0x0007_C0F0;
    /// PHY ID mask (ignores revision bits)
    pub const MASK: u32 = 0xFFFF_FFF0;
}

/// LAN8720 vendor-specific register addresses
pub mod reg {
    /// Mode Control/Status Register
    pub const MCSR: u8 = 17;
    /// Special Modes Register
    pub const SMR: u8 = 18;
    /// PHY Special Control/Status Register
    pub const PSCSR: u8 = 31;
}

/// Special Modes Register (18) bits
pub mod smr {
    /// MODE mask (bits 7:5) - PHY mode selection
    pub const MODE_MASK: u16 = 0x7 << 5;
    /// Mode: 10BASE-T Half Duplex, auto-neg disabled
    pub const MODE_10HD: u16 = 0x0 << 5;
    /// Mode: 100BASE-TX Full Duplex, auto-neg disabled
    pub const MODE_100FD: u16 = 0x3 << 5;
    /// Mode: All capable, auto-neg enabled
    pub const MODE_ALL_AN: u16 = 0x7 << 5;
    /// PHYAD mask (bits 4:0) - strapped PHY address
    pub const PHYAD_MASK: u16 = 0x1F;
}

/// PHY Special Control/Status Register (31) bits
pub mod pscsr {
    /// Autodone - auto-negotiation done
    pub const AUTODONE: u16 = 1 << 12;
    /// Duplex/speed indication field shift (bits 4:3)
    pub const DUPLEX_SHIFT: u16 = 3;
    /// Duplex/speed indication field (0 = 10HD, 1 = 100HD, 2 = 10FD, 3 = 100FD)
    pub const DUPLEX_MASK: u16 = 0x3 << DUPLEX_SHIFT;
    /// Speed indication (bit 2): set for 10 Mbps, clear for 100 Mbps
    pub const SPEED_10: u16 = 1 << 2;
}

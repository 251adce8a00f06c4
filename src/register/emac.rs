//! EMAC Register Bit Definitions
//!
//! Bit layouts of the LPC17xx Ethernet block: MAC configuration, MII
//! management, the DMA control block, the receive filter and the interrupt
//! block. Names follow the LPC17xx user manual (UM10360, chapter 10).

/// EMAC register block base address
pub const EMAC_BASE: usize = 0x5000_0000;

/// MAC Configuration Register 1 (MAC1)
pub mod mac1 {
    /// Enable frame reception
    pub const RECEIVE_ENABLE: u32 = 1 << 0;
    /// Pass all frames, including control frames
    pub const PASS_ALL_FRAMES: u32 = 1 << 1;
    /// Act on received PAUSE frames
    pub const RX_FLOW_CONTROL: u32 = 1 << 2;
    /// Allow PAUSE frame transmission
    pub const TX_FLOW_CONTROL: u32 = 1 << 3;
    /// Loop transmit data back to receive
    pub const LOOPBACK: u32 = 1 << 4;
    /// Reset the transmit function logic
    pub const RESET_TX: u32 = 1 << 8;
    /// Reset the MAC control sublayer transmit logic
    pub const RESET_MCS_TX: u32 = 1 << 9;
    /// Reset the receive logic
    pub const RESET_RX: u32 = 1 << 10;
    /// Reset the MAC control sublayer receive logic
    pub const RESET_MCS_RX: u32 = 1 << 11;
    /// Reset the random number generator in the transmit function
    pub const SIMULATION_RESET: u32 = 1 << 14;
    /// Put every MAC module except the host interface in reset
    pub const SOFT_RESET: u32 = 1 << 15;
    /// All MAC1 reset bits asserted together
    pub const RESET_ALL: u32 = RESET_TX
        | RESET_MCS_TX
        | RESET_RX
        | RESET_MCS_RX
        | SIMULATION_RESET
        | SOFT_RESET;
}

/// MAC Configuration Register 2 (MAC2)
pub mod mac2 {
    /// Full-duplex operation
    pub const FULL_DUPLEX: u32 = 1 << 0;
    /// Check type/length field of transmitted and received frames
    pub const FRAME_LENGTH_CHECKING: u32 = 1 << 1;
    /// Allow frames of any length
    pub const HUGE_FRAME_ENABLE: u32 = 1 << 2;
    /// Prepend a 4-byte proprietary header before the CRC check
    pub const DELAYED_CRC: u32 = 1 << 3;
    /// Append a CRC to every frame
    pub const CRC_ENABLE: u32 = 1 << 4;
    /// Pad short frames and append a CRC
    pub const PAD_CRC_ENABLE: u32 = 1 << 5;
    /// Pad short VLAN frames to 64 bytes
    pub const VLAN_PAD_ENABLE: u32 = 1 << 6;
    /// Detect VLAN frames for automatic padding
    pub const AUTO_DETECT_PAD_ENABLE: u32 = 1 << 7;
    /// Bring-up value: CRC generation plus short-frame padding
    pub const DEFAULT: u32 = CRC_ENABLE | PAD_CRC_ENABLE;
}

/// Back-to-Back Inter-Packet-Gap Register (IPGT)
pub mod ipgt {
    /// Gap field (bits 6:0)
    pub const MASK: u32 = 0x7F;
    /// Recommended full-duplex gap (9.6 us / 0.96 us)
    pub const FULL_DUPLEX: u32 = 0x15;
    /// Recommended half-duplex gap
    pub const HALF_DUPLEX: u32 = 0x12;
}

/// Non Back-to-Back Inter-Packet-Gap Register (IPGR)
pub mod ipgr {
    /// Part 2 gap (bits 6:0)
    pub const PART2: u32 = 0x12;
    /// Part 1 gap (bits 14:8)
    pub const PART1: u32 = 0x08 << 8;
    /// Recommended value
    pub const DEFAULT: u32 = PART1 | PART2;
}

/// Collision Window / Retry Register (CLRT)
pub mod clrt {
    /// Maximum retransmission attempts (bits 3:0)
    pub const RETRANSMISSION_MAX: u32 = 0xF;
    /// Collision window in slot times (bits 13:8)
    pub const COLLISION_WINDOW: u32 = 0x37 << 8;
    /// Recommended value
    pub const DEFAULT: u32 = COLLISION_WINDOW | RETRANSMISSION_MAX;
}

/// PHY Support Register (SUPP)
pub mod supp {
    /// RMII logic runs at 100 Mbps when set, 10 Mbps when clear
    pub const SPEED_100: u32 = 1 << 8;
}

/// MII Management Configuration Register (MCFG)
pub mod mcfg {
    /// Scan increment
    pub const SCAN_INCREMENT: u32 = 1 << 0;
    /// Suppress the MII preamble
    pub const SUPPRESS_PREAMBLE: u32 = 1 << 1;
    /// Clock select field shift
    pub const CLOCK_SELECT_SHIFT: u32 = 2;
    /// Clock select field (bits 5:2)
    pub const CLOCK_SELECT_MASK: u32 = 0xF << CLOCK_SELECT_SHIFT;
    /// Reset the MII management hardware
    pub const RESET_MII_MGMT: u32 = 1 << 15;
    /// All bits the driver owns in this register
    pub const FIELD_MASK: u32 =
        RESET_MII_MGMT | CLOCK_SELECT_MASK | SUPPRESS_PREAMBLE | SCAN_INCREMENT;
}

/// MII Management Command Register (MCMD)
pub mod mcmd {
    /// Perform a single read cycle
    pub const READ: u32 = 1 << 0;
    /// Perform read cycles continuously
    pub const SCAN: u32 = 1 << 1;
}

/// MII Management Address Register (MADR)
pub mod madr {
    /// Register address field (bits 4:0)
    pub const REGISTER_MASK: u32 = 0x1F;
    /// PHY address field shift
    pub const PHY_ADDRESS_SHIFT: u32 = 8;
    /// PHY address field (bits 12:8)
    pub const PHY_ADDRESS_MASK: u32 = 0x1F << PHY_ADDRESS_SHIFT;
}

/// MII Management Indicators Register (MIND)
pub mod mind {
    /// A management read or write cycle is in progress
    pub const BUSY: u32 = 1 << 0;
    /// A scan operation is in progress
    pub const SCANNING: u32 = 1 << 1;
    /// MRDD does not yet hold valid data
    pub const NOT_VALID: u32 = 1 << 2;
    /// MII link fail indication
    pub const MII_LINK_FAIL: u32 = 1 << 3;
}

/// Command Register
pub mod command {
    /// Enable the receive path
    pub const RX_ENABLE: u32 = 1 << 0;
    /// Enable the transmit path
    pub const TX_ENABLE: u32 = 1 << 1;
    /// Reset all datapaths and the host registers
    pub const REG_RESET: u32 = 1 << 3;
    /// Reset the transmit datapath
    pub const TX_RESET: u32 = 1 << 4;
    /// Reset the receive datapath
    pub const RX_RESET: u32 = 1 << 5;
    /// Pass runt frames smaller than 64 bytes
    pub const PASS_RUNT_FRAME: u32 = 1 << 6;
    /// Bypass the receive filter
    pub const PASS_RX_FILTER: u32 = 1 << 7;
    /// Enable IEEE 802.3 flow control in full duplex
    pub const TX_FLOW_CONTROL: u32 = 1 << 8;
    /// Select the RMII interface
    pub const RMII: u32 = 1 << 9;
    /// Full-duplex operation of the datapaths
    pub const FULL_DUPLEX: u32 = 1 << 10;
    /// Datapath enables
    pub const DATAPATHS: u32 = RX_ENABLE | TX_ENABLE;
    /// Datapath reset bits
    pub const RESET_ALL: u32 = REG_RESET | TX_RESET | RX_RESET;
    /// All writable bits (bits 10:0, bit 2 reserved)
    pub const FIELD_MASK: u32 = 0x7FB;
}

/// Receive Filter Control Register (RxFilterCtrl)
pub mod rx_filter {
    /// Accept all unicast frames
    pub const ACCEPT_UNICAST: u32 = 1 << 0;
    /// Accept all broadcast frames
    pub const ACCEPT_BROADCAST: u32 = 1 << 1;
    /// Accept all multicast frames
    pub const ACCEPT_MULTICAST: u32 = 1 << 2;
    /// Accept unicast frames that pass the hash filter
    pub const ACCEPT_UNICAST_HASH: u32 = 1 << 3;
    /// Accept multicast frames that pass the hash filter
    pub const ACCEPT_MULTICAST_HASH: u32 = 1 << 4;
    /// Accept frames whose destination matches the station address
    pub const ACCEPT_PERFECT: u32 = 1 << 5;
    /// Bring-up value: every accept class enabled
    pub const DEFAULT: u32 = ACCEPT_UNICAST
        | ACCEPT_BROADCAST
        | ACCEPT_MULTICAST
        | ACCEPT_UNICAST_HASH
        | ACCEPT_MULTICAST_HASH
        | ACCEPT_PERFECT;
}

/// Interrupt Status/Enable/Clear/Set bits
pub mod int {
    /// Fatal receive overrun
    pub const RX_OVERRUN: u32 = 1 << 0;
    /// Receive error
    pub const RX_ERROR: u32 = 1 << 1;
    /// All RX descriptors processed
    pub const RX_FINISHED: u32 = 1 << 2;
    /// RX descriptor with the interrupt flag completed
    pub const RX_DONE: u32 = 1 << 3;
    /// Fatal transmit underrun
    pub const TX_UNDERRUN: u32 = 1 << 4;
    /// Transmit error
    pub const TX_ERROR: u32 = 1 << 5;
    /// All TX descriptors processed
    pub const TX_FINISHED: u32 = 1 << 6;
    /// TX descriptor with the interrupt flag completed
    pub const TX_DONE: u32 = 1 << 7;
    /// Software-triggered interrupt
    pub const SOFT: u32 = 1 << 12;
    /// Wake-up event
    pub const WAKEUP: u32 = 1 << 13;
    /// Every interrupt source
    pub const ALL: u32 = RX_OVERRUN
        | RX_ERROR
        | RX_FINISHED
        | RX_DONE
        | TX_UNDERRUN
        | TX_ERROR
        | TX_FINISHED
        | TX_DONE
        | SOFT
        | WAKEUP;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_masks_have_documented_values() {
        assert_eq!(mac1::RESET_ALL, 0xCF00);
        assert_eq!(mac2::DEFAULT, 0x30);
        assert_eq!(ipgr::DEFAULT, 0x0812);
        assert_eq!(clrt::DEFAULT, 0x370F);
        assert_eq!(mcfg::FIELD_MASK, 0x803F);
        assert_eq!(command::RESET_ALL, 0x38);
        assert_eq!(rx_filter::DEFAULT, 0x3F);
        assert_eq!(int::ALL, 0x30FF);
    }

    #[test]
    fn command_field_excludes_reserved_bit() {
        assert_eq!(command::FIELD_MASK & (1 << 2), 0);
        assert_eq!(command::FIELD_MASK & command::FULL_DUPLEX, command::FULL_DUPLEX);
    }
}

//! Centralized Constants
//!
//! This module provides a single source of truth for the magic numbers and
//! configuration defaults used throughout the LPC17xx Ethernet driver.
//!
//! # Organization
//!
//! Constants are grouped by category:
//! - **Frame/Buffer sizes**: Ethernet frame and fragment dimensions
//! - **Ring geometry**: default descriptor counts and entry sizes
//! - **Timing**: bring-up delays, negotiation deadlines, MII busy budget
//! - **Addresses**: default PHY address and DMA placement
//!
//! # Note
//!
//! Hardware register bit definitions remain in [`crate::register`] and the
//! PHY register modules, as they are specific to those hardware blocks.

// =============================================================================
// Frame and Buffer Sizes
// =============================================================================

/// Size of one DMA buffer slot (fragment) in bytes
pub const FRAGMENT_SIZE: usize = 1536;

/// Maximum frame length programmed into MAXF
pub const MAX_FRAME_LEN: u16 = 1536;

/// CRC/FCS size at the end of every received frame
pub const CRC_SIZE: usize = 4;

/// Ethernet header size (dst MAC + src MAC + EtherType)
pub const ETH_HEADER_SIZE: usize = 14;

/// MAC address length
pub const MAC_ADDR_LEN: usize = 6;

/// Largest value the 11-bit descriptor size field can describe
pub const MAX_FRAGMENT_SIZE: usize = 2048;

// =============================================================================
// Ring Geometry
// =============================================================================

/// Default number of receive descriptors/buffers
pub const DEFAULT_RX_FRAGMENTS: usize = 4;

/// Default number of transmit descriptors/buffers
pub const DEFAULT_TX_FRAGMENTS: usize = 2;

/// Size of one descriptor entry (packet address + control)
pub const DESCRIPTOR_SIZE: usize = 8;

/// Size of one RX status entry (StatusInfo + StatusHashCRC)
pub const RX_STATUS_SIZE: usize = 8;

/// Size of one TX status entry (StatusInfo)
pub const TX_STATUS_SIZE: usize = 4;

// =============================================================================
// Timing Constants
// =============================================================================

/// Settle time after asserting the MAC/DMA resets, in milliseconds
pub const MAC_RESET_DELAY_MS: u32 = 100;

/// Settle time after a PHY soft reset, in milliseconds
pub const PHY_RESET_SETTLE_MS: u32 = 600;

/// Autonegotiation-complete deadline, in milliseconds
pub const AUTONEG_TIMEOUT_MS: u32 = 5000;

/// Link-up deadline after autonegotiation, in milliseconds
pub const LINK_TIMEOUT_MS: u32 = 5000;

/// Number of MIND polls before a management transaction is abandoned
pub const MII_BUSY_POLLS: u32 = 100_000;

// =============================================================================
// Clock Frequencies
// =============================================================================

/// Maximum MDC clock frequency (IEEE 802.3 limit)
pub const MDC_MAX_FREQ_HZ: u32 = 2_500_000;

/// Core clock of a stock LPC1768 PLL configuration
pub const DEFAULT_CORE_CLOCK_HZ: u32 = 100_000_000;

// =============================================================================
// Addresses
// =============================================================================

/// MII address of the LAN8720 on common breakout boards
pub const DEFAULT_PHY_ADDR: u8 = 1;

/// Maximum valid PHY address (5-bit field)
pub const MAX_PHY_ADDR: u8 = 31;

/// Start of AHB SRAM bank 1, the usual home of the DMA area
pub const DEFAULT_DMA_BASE: usize = 0x2007_C000;

/// Default MAC address (locally administered)
pub const DEFAULT_MAC_ADDR: [u8; MAC_ADDR_LEN] = [0x02, 0x00, 0x00, 0x12, 0x34, 0x56];

//! Configuration types for the LPC17xx Ethernet driver.

use super::error::{ConfigError, ConfigResult};
use crate::hal::mdio::MdcClockDivider;
use crate::internal::constants::{
    AUTONEG_TIMEOUT_MS, DEFAULT_PHY_ADDR, LINK_TIMEOUT_MS, MAC_ADDR_LEN, MAC_RESET_DELAY_MS,
    MAX_FRAME_LEN, MAX_PHY_ADDR, MII_BUSY_POLLS, PHY_RESET_SETTLE_MS,
};
use crate::register::emac::{int, rx_filter};

/// Ethernet link speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    /// 10 Mbps
    Mbps10,
    /// 100 Mbps
    #[default]
    Mbps100,
}

impl Speed {
    /// Link speed in megabits per second
    pub const fn mbps(self) -> u32 {
        match self {
            Speed::Mbps10 => 10,
            Speed::Mbps100 => 100,
        }
    }
}

/// Ethernet duplex mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Duplex {
    /// Half duplex
    Half,
    /// Full duplex
    #[default]
    Full,
}

/// Driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Bring-up has not completed
    #[default]
    Uninitialized,
    /// Bring-up completed; datapaths enabled
    Up,
}

// =============================================================================
// Station Address
// =============================================================================

/// Station (MAC) address held as three 16-bit halves.
///
/// `halves()[i]` is `mac[2i] << 8 | mac[2i + 1]`. The SA0..SA2 registers take
/// the halves in reverse order: SA0 holds the last two bytes of the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StationAddress {
    halves: [u16; 3],
}

impl StationAddress {
    /// Build from the on-wire byte order
    pub const fn from_bytes(mac: [u8; MAC_ADDR_LEN]) -> Self {
        Self {
            halves: [
                (mac[0] as u16) << 8 | mac[1] as u16,
                (mac[2] as u16) << 8 | mac[3] as u16,
                (mac[4] as u16) << 8 | mac[5] as u16,
            ],
        }
    }

    /// The three halves in on-wire order
    pub const fn halves(&self) -> [u16; 3] {
        self.halves
    }

    /// Address bytes in on-wire order
    pub const fn to_bytes(&self) -> [u8; MAC_ADDR_LEN] {
        let [a, b, c] = self.halves;
        [
            (a >> 8) as u8,
            a as u8,
            (b >> 8) as u8,
            b as u8,
            (c >> 8) as u8,
            c as u8,
        ]
    }

    /// Values for SA0, SA1 and SA2
    pub const fn register_values(&self) -> [u32; 3] {
        [
            self.halves[2] as u32,
            self.halves[1] as u32,
            self.halves[0] as u32,
        ]
    }
}

impl From<[u8; MAC_ADDR_LEN]> for StationAddress {
    fn from(mac: [u8; MAC_ADDR_LEN]) -> Self {
        Self::from_bytes(mac)
    }
}

// =============================================================================
// Driver Configuration
// =============================================================================

/// Complete driver configuration
///
/// The defaults suit an LPC1768 at 100 MHz with a LAN8720 at MII address 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EthConfig {
    /// MII address of the PHY
    pub phy_address: u8,
    /// MDC clock divider
    pub mdc_divider: MdcClockDivider,
    /// MIND polls before a management transaction is abandoned
    pub mii_busy_polls: u32,
    /// Delay after asserting the MAC resets, in milliseconds
    pub mac_reset_delay_ms: u32,
    /// Delay after the PHY soft reset, in milliseconds
    pub phy_reset_settle_ms: u32,
    /// Autonegotiation deadline, in milliseconds
    pub autoneg_timeout_ms: u32,
    /// Link-up deadline, in milliseconds
    pub link_timeout_ms: u32,
    /// Value programmed into MAXF
    pub max_frame_len: u16,
    /// Value programmed into RxFilterCtrl
    pub rx_filter: u32,
    /// Value programmed into IntEnable
    pub interrupt_enable: u32,
    /// Request an interrupt when each RX descriptor completes
    pub rx_descriptor_interrupt: bool,
    /// Pass all frames, control frames included (MAC1 PASS_ALL_FRAMES)
    pub pass_all_frames: bool,
    /// Bypass the receive filter (Command PASS_RX_FILTER)
    pub pass_rx_filter: bool,
    /// Consume frames with the RX error flag without delivering them
    pub drop_errored_frames: bool,
}

impl Default for EthConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EthConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phy_address: DEFAULT_PHY_ADDR,
            mdc_divider: MdcClockDivider::Div44,
            mii_busy_polls: MII_BUSY_POLLS,
            mac_reset_delay_ms: MAC_RESET_DELAY_MS,
            phy_reset_settle_ms: PHY_RESET_SETTLE_MS,
            autoneg_timeout_ms: AUTONEG_TIMEOUT_MS,
            link_timeout_ms: LINK_TIMEOUT_MS,
            max_frame_len: MAX_FRAME_LEN,
            rx_filter: rx_filter::DEFAULT,
            interrupt_enable: int::RX_DONE,
            rx_descriptor_interrupt: true,
            pass_all_frames: false,
            pass_rx_filter: false,
            drop_errored_frames: false,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the PHY address
    #[must_use]
    pub const fn with_phy_address(mut self, address: u8) -> Self {
        self.phy_address = address;
        self
    }

    /// Set the MDC clock divider
    #[must_use]
    pub const fn with_mdc_divider(mut self, divider: MdcClockDivider) -> Self {
        self.mdc_divider = divider;
        self
    }

    /// Pick the MDC divider for a host clock frequency
    #[must_use]
    pub const fn with_sys_clock_hz(mut self, sys_clk_hz: u32) -> Self {
        self.mdc_divider = MdcClockDivider::from_sys_clock_hz(sys_clk_hz);
        self
    }

    /// Set the MII busy-poll budget
    #[must_use]
    pub const fn with_mii_busy_polls(mut self, polls: u32) -> Self {
        self.mii_busy_polls = polls;
        self
    }

    /// Set the MAC reset and PHY reset settle delays
    #[must_use]
    pub const fn with_reset_delays(mut self, mac_reset_ms: u32, phy_settle_ms: u32) -> Self {
        self.mac_reset_delay_ms = mac_reset_ms;
        self.phy_reset_settle_ms = phy_settle_ms;
        self
    }

    /// Set the autonegotiation and link-up deadlines
    #[must_use]
    pub const fn with_timeouts(mut self, autoneg_ms: u32, link_ms: u32) -> Self {
        self.autoneg_timeout_ms = autoneg_ms;
        self.link_timeout_ms = link_ms;
        self
    }

    /// Set the maximum frame length
    #[must_use]
    pub const fn with_max_frame_len(mut self, len: u16) -> Self {
        self.max_frame_len = len;
        self
    }

    /// Set the receive filter
    #[must_use]
    pub const fn with_rx_filter(mut self, filter: u32) -> Self {
        self.rx_filter = filter;
        self
    }

    /// Set the interrupt-enable mask
    #[must_use]
    pub const fn with_interrupt_enable(mut self, mask: u32) -> Self {
        self.interrupt_enable = mask;
        self
    }

    /// Enable or disable per-descriptor RX interrupts
    #[must_use]
    pub const fn with_rx_descriptor_interrupt(mut self, enabled: bool) -> Self {
        self.rx_descriptor_interrupt = enabled;
        self
    }

    /// Enable or disable pass-all-frames mode
    #[must_use]
    pub const fn with_pass_all_frames(mut self, enabled: bool) -> Self {
        self.pass_all_frames = enabled;
        self
    }

    /// Enable or disable receive filter bypass
    #[must_use]
    pub const fn with_pass_rx_filter(mut self, enabled: bool) -> Self {
        self.pass_rx_filter = enabled;
        self
    }

    /// Enable or disable dropping of errored frames
    #[must_use]
    pub const fn with_drop_errored_frames(mut self, enabled: bool) -> Self {
        self.drop_errored_frames = enabled;
        self
    }

    /// Check the configuration for values the hardware cannot represent
    pub const fn validate(&self) -> ConfigResult<()> {
        if self.phy_address > MAX_PHY_ADDR {
            return Err(ConfigError::InvalidPhyAddress);
        }
        if self.max_frame_len == 0 || self.mii_busy_polls == 0 {
            return Err(ConfigError::InvalidConfig);
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

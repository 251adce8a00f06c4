//! MDIO (Management Data Input/Output) HAL
//!
//! This module drives the LPC17xx MII management interface (MCFG, MCMD, MADR,
//! MWTD, MRDD, MIND) used to talk to the Ethernet PHY.
//!
//! Transactions busy-wait on `MIND.BUSY` for a fixed number of polls. When
//! the budget runs out the transaction is abandoned without an error: a read
//! returns whatever MRDD holds, and a write may not have reached the PHY.
//! Exhausted budgets are counted so callers can surface them.

use crate::internal::constants::{MDC_MAX_FREQ_HZ, MII_BUSY_POLLS};
use crate::register::emac::{madr, mcfg, mcmd, mind};
use crate::register::{Reg, RegisterAccess};

// =============================================================================
// MDC Clock Divider
// =============================================================================

/// MDC clock divider values (MCFG CLK_SEL field)
///
/// MDC is the host clock divided by the selected value and must not exceed
/// 2.5 MHz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MdcClockDivider {
    /// Host clock / 4
    Div4 = 0,
    /// Host clock / 6
    Div6 = 2,
    /// Host clock / 8
    Div8 = 3,
    /// Host clock / 10
    Div10 = 4,
    /// Host clock / 14
    Div14 = 5,
    /// Host clock / 20
    Div20 = 6,
    /// Host clock / 28
    Div28 = 7,
    /// Host clock / 36
    Div36 = 8,
    /// Host clock / 40
    Div40 = 9,
    /// Host clock / 44 (2.27 MHz MDC at 100 MHz)
    #[default]
    Div44 = 10,
    /// Host clock / 48
    Div48 = 11,
    /// Host clock / 52
    Div52 = 12,
    /// Host clock / 56
    Div56 = 13,
    /// Host clock / 60
    Div60 = 14,
    /// Host clock / 64
    Div64 = 15,
}

impl MdcClockDivider {
    /// Every divider, smallest first
    pub const ALL: [MdcClockDivider; 15] = [
        Self::Div4,
        Self::Div6,
        Self::Div8,
        Self::Div10,
        Self::Div14,
        Self::Div20,
        Self::Div28,
        Self::Div36,
        Self::Div40,
        Self::Div44,
        Self::Div48,
        Self::Div52,
        Self::Div56,
        Self::Div60,
        Self::Div64,
    ];

    /// Host clock divisor selected by this setting
    pub const fn divisor(self) -> u32 {
        match self {
            Self::Div4 => 4,
            Self::Div6 => 6,
            Self::Div8 => 8,
            Self::Div10 => 10,
            Self::Div14 => 14,
            Self::Div20 => 20,
            Self::Div28 => 28,
            Self::Div36 => 36,
            Self::Div40 => 40,
            Self::Div44 => 44,
            Self::Div48 => 48,
            Self::Div52 => 52,
            Self::Div56 => 56,
            Self::Div60 => 60,
            Self::Div64 => 64,
        }
    }

    /// Get the smallest divider that keeps MDC at or below 2.5 MHz
    ///
    /// Clocks too fast for /64 get /64.
    pub const fn from_sys_clock_hz(sys_clk_hz: u32) -> Self {
        let mut i = 0;
        while i < Self::ALL.len() {
            let div = Self::ALL[i];
            if sys_clk_hz as u64 <= MDC_MAX_FREQ_HZ as u64 * div.divisor() as u64 {
                return div;
            }
            i += 1;
        }
        Self::Div64
    }

    /// Get the CLK_SEL value for register programming
    pub const fn to_reg_value(self) -> u32 {
        self as u32
    }

    /// Resulting MDC frequency for a given host clock
    pub const fn mdc_hz(self, sys_clk_hz: u32) -> u32 {
        sys_clk_hz / self.divisor()
    }
}

// =============================================================================
// MDIO Bus Trait
// =============================================================================

/// Trait for MDIO bus operations
///
/// PHY and register addresses are 5-bit fields; higher bits are ignored.
/// Transactions never fail from the caller's point of view.
pub trait MdioBus {
    /// Read a PHY register
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> u16;

    /// Write a PHY register
    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16);

    /// Check if the MDIO bus is busy
    fn is_busy(&self) -> bool;
}

// =============================================================================
// MII Management Controller
// =============================================================================

/// MII management controller for PHY register access
///
/// Borrows the register interface for the duration of a PHY conversation.
#[derive(Debug)]
pub struct MiiManagement<'r, R: RegisterAccess> {
    regs: &'r mut R,
    busy_polls: u32,
    busy_timeouts: u32,
}

impl<'r, R: RegisterAccess> MiiManagement<'r, R> {
    /// Create a controller with the default busy-poll budget
    pub fn new(regs: &'r mut R) -> Self {
        Self::with_busy_polls(regs, MII_BUSY_POLLS)
    }

    /// Create a controller with a custom busy-poll budget
    pub fn with_busy_polls(regs: &'r mut R, busy_polls: u32) -> Self {
        Self {
            regs,
            busy_polls,
            busy_timeouts: 0,
        }
    }

    /// Reset the management hardware and select the MDC divider
    ///
    /// Scan increment and preamble suppression are left disabled.
    pub fn configure(&mut self, divider: MdcClockDivider) {
        let clock_select = divider.to_reg_value() << mcfg::CLOCK_SELECT_SHIFT;
        self.regs.write_field(
            Reg::Mcfg,
            mcfg::FIELD_MASK,
            clock_select | mcfg::RESET_MII_MGMT,
        );
        self.regs.clear_bits(Reg::Mcfg, mcfg::RESET_MII_MGMT);
    }

    /// Number of transactions abandoned because MIND stayed busy
    pub fn busy_timeouts(&self) -> u32 {
        self.busy_timeouts
    }

    /// Build the MADR register value
    fn address(phy_addr: u8, reg_addr: u8) -> u32 {
        (((phy_addr as u32) << madr::PHY_ADDRESS_SHIFT) & madr::PHY_ADDRESS_MASK)
            | (reg_addr as u32 & madr::REGISTER_MASK)
    }

    /// Wait for the current management cycle to complete
    ///
    /// Returns false when the poll budget ran out first.
    fn wait_not_busy(&mut self) -> bool {
        for _ in 0..self.busy_polls {
            if !self.is_busy() {
                return true;
            }
            core::hint::spin_loop();
        }
        if !self.is_busy() {
            return true;
        }

        self.busy_timeouts = self.busy_timeouts.saturating_add(1);
        #[cfg(feature = "defmt")]
        defmt::warn!("MII management busy after {} polls", self.busy_polls);
        false
    }
}

impl<R: RegisterAccess> MdioBus for MiiManagement<'_, R> {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> u16 {
        self.regs.write(Reg::Madr, Self::address(phy_addr, reg_addr));
        self.regs.write(Reg::Mcmd, mcmd::READ);
        self.wait_not_busy();
        self.regs.write(Reg::Mcmd, 0);
        (self.regs.read(Reg::Mrdd) & 0xFFFF) as u16
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) {
        self.regs.write(Reg::Madr, Self::address(phy_addr, reg_addr));
        self.regs.write(Reg::Mwtd, value as u32);
        self.wait_not_busy();
    }

    fn is_busy(&self) -> bool {
        self.regs.read(Reg::Mind) & mind::BUSY != 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRegisters;

    #[test]
    fn divider_reg_values_follow_clk_sel_table() {
        assert_eq!(MdcClockDivider::Div4.to_reg_value(), 0);
        assert_eq!(MdcClockDivider::Div6.to_reg_value(), 2);
        assert_eq!(MdcClockDivider::Div44.to_reg_value(), 0xA);
        assert_eq!(MdcClockDivider::Div64.to_reg_value(), 0xF);
        assert_eq!(MdcClockDivider::default(), MdcClockDivider::Div44);
    }

    #[test]
    fn divider_table_is_ascending() {
        for pair in MdcClockDivider::ALL.windows(2) {
            assert!(pair[0].divisor() < pair[1].divisor());
            assert!(pair[0].to_reg_value() < pair[1].to_reg_value());
        }
    }

    #[test]
    fn divider_from_sys_clock_keeps_mdc_in_range() {
        assert_eq!(
            MdcClockDivider::from_sys_clock_hz(100_000_000),
            MdcClockDivider::Div40
        );
        assert_eq!(
            MdcClockDivider::from_sys_clock_hz(120_000_000),
            MdcClockDivider::Div48
        );
        assert_eq!(
            MdcClockDivider::from_sys_clock_hz(10_000_000),
            MdcClockDivider::Div4
        );
        assert_eq!(
            MdcClockDivider::from_sys_clock_hz(400_000_000),
            MdcClockDivider::Div64
        );

        for hz in [12_000_000, 48_000_000, 72_000_000, 96_000_000, 100_000_000] {
            let div = MdcClockDivider::from_sys_clock_hz(hz);
            assert!(div.mdc_hz(hz) <= MDC_MAX_FREQ_HZ, "{hz} Hz -> {div:?}");
        }
    }

    #[test]
    fn configure_pulses_management_reset() {
        let mut regs = MockRegisters::new();
        regs.poke(Reg::Mcfg, 0xFFFF_0000);
        MiiManagement::new(&mut regs).configure(MdcClockDivider::Div44);

        let writes = regs.writes_to(Reg::Mcfg);
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0] & mcfg::FIELD_MASK, (0xA << 2) | mcfg::RESET_MII_MGMT);
        assert_eq!(writes[1] & mcfg::FIELD_MASK, 0xA << 2);
        // bits outside the field are preserved
        assert_eq!(writes[1] & !mcfg::FIELD_MASK, 0xFFFF_0000 & !mcfg::FIELD_MASK);
    }

    #[test]
    fn write_programs_address_then_data() {
        let mut regs = MockRegisters::new();
        let mut mii = MiiManagement::new(&mut regs);
        mii.write(1, 18, 0x00E0);
        assert_eq!(mii.busy_timeouts(), 0);

        assert_eq!(regs.writes_to(Reg::Madr), [0x0112]);
        assert_eq!(regs.writes_to(Reg::Mwtd), [0x00E0]);
        assert_eq!(regs.phy_register(18), 0x00E0);
    }

    #[test]
    fn read_issues_command_and_clears_it() {
        let mut regs = MockRegisters::new();
        regs.set_phy_register(31, 0x1058);

        let value = MiiManagement::new(&mut regs).read(1, 31);
        assert_eq!(value, 0x1058);
        assert_eq!(regs.writes_to(Reg::Mcmd), [mcmd::READ, 0]);
        assert_eq!(regs.writes_to(Reg::Madr), [0x011F]);
    }

    #[test]
    fn addresses_are_masked_to_five_bits() {
        let mut regs = MockRegisters::new();
        MiiManagement::new(&mut regs).write(0x21, 0x3F, 0);
        assert_eq!(regs.writes_to(Reg::Madr), [0x011F]);
    }

    #[test]
    fn busy_bus_proceeds_silently_after_budget() {
        let mut regs = MockRegisters::new();
        regs.set_phy_register(1, 0x7809);
        regs.set_mii_stuck(true);

        let mut mii = MiiManagement::with_busy_polls(&mut regs, 16);
        assert!(mii.is_busy());
        mii.write(1, 0, 0x1000);
        let _ = mii.read(1, 1);
        assert_eq!(mii.busy_timeouts(), 2);
        assert_eq!(regs.mind_polls(), 2 * 17 + 1);
    }

    #[test]
    fn bounded_busy_wait_completes_when_phy_answers() {
        let mut regs = MockRegisters::new();
        regs.set_mii_latency(5);
        let mut mii = MiiManagement::with_busy_polls(&mut regs, 16);
        mii.write(1, 0, 0x1000);
        assert_eq!(mii.busy_timeouts(), 0);
    }
}

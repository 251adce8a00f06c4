//! Testing utilities and mock implementations
//!
//! Host-side stand-ins for the hardware the driver talks to:
//!
//! - [`MockRegisters`]: the register file, with a LAN8720 attached to the
//!   MII management block and the ring-index side effects of the DMA engine
//! - [`MockMdioBus`]: a bare PHY register map for PHY-level tests
//! - [`SimClock`]: simulated time serving as tick source, delay and yield
//!
//! Only available when running `cargo test`.

#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::dma::DmaArea;
use crate::dma::descriptor::rx_status;
use crate::hal::mdio::MdioBus;
use crate::hal::timer::{TickSource, Yield};
use crate::internal::constants::{CRC_SIZE, DEFAULT_PHY_ADDR};
use crate::internal::phy_regs::lan8720::{pscsr, reg};
use crate::internal::phy_regs::standard::{bmcr, bmsr, phy_reg};
use crate::register::emac::{command, madr, mcmd, mind};
use crate::register::{Reg, RegisterAccess};

// =============================================================================
// Mock Register File
// =============================================================================

/// Register file fake implementing [`RegisterAccess`].
///
/// Plain registers hold whatever was last written. A few registers behave
/// like the hardware:
///
/// - a write to MWTD stores into the PHY register selected by MADR
/// - a write to MCMD with READ latches that PHY register into MRDD
/// - both start a management cycle that keeps MIND busy for
///   [`set_mii_latency`](Self::set_mii_latency) polls
/// - the Command datapath resets zero the matching ring indices and do not
///   stick
#[derive(Debug, Default)]
pub struct MockRegisters {
    values: HashMap<Reg, u32>,
    log: Vec<(Reg, u32)>,
    phy: HashMap<u8, u16>,
    phy_reads: Vec<u8>,
    mii_latency: u32,
    mii_stuck: bool,
    mii_busy_left: Cell<u32>,
    mind_polls: Cell<u32>,
}

impl MockRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a register without logging a write
    pub fn poke(&mut self, reg: Reg, value: u32) {
        self.values.insert(reg, value);
    }

    /// Current value of a register
    pub fn peek(&self, reg: Reg) -> u32 {
        self.values.get(&reg).copied().unwrap_or(0)
    }

    /// Every write in order
    pub fn write_log(&self) -> &[(Reg, u32)] {
        &self.log
    }

    /// Values written to one register, in order
    pub fn writes_to(&self, reg: Reg) -> Vec<u32> {
        self.log
            .iter()
            .filter(|(r, _)| *r == reg)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn phy_register(&self, reg: u8) -> u16 {
        self.phy.get(&reg).copied().unwrap_or(0)
    }

    pub fn set_phy_register(&mut self, reg: u8, value: u16) {
        self.phy.insert(reg, value);
    }

    /// PHY registers read over the management bus, in order
    pub fn phy_reads(&self) -> &[u8] {
        &self.phy_reads
    }

    /// Keep MIND busy forever
    pub fn set_mii_stuck(&mut self, stuck: bool) {
        self.mii_stuck = stuck;
    }

    /// MIND polls that report busy after each management cycle starts
    pub fn set_mii_latency(&mut self, polls: u32) {
        self.mii_latency = polls;
    }

    /// Number of MIND reads so far
    pub fn mind_polls(&self) -> u32 {
        self.mind_polls.get()
    }

    /// Let the DMA engine finish every queued transmit
    pub fn complete_transmit(&mut self) {
        let produce = self.peek(Reg::TxProduceIndex);
        self.poke(Reg::TxConsumeIndex, produce);
    }

    fn selected_phy_register(&self) -> Option<u8> {
        let address = self.peek(Reg::Madr);
        let phy = ((address & madr::PHY_ADDRESS_MASK) >> madr::PHY_ADDRESS_SHIFT) as u8;
        (phy == DEFAULT_PHY_ADDR).then_some((address & madr::REGISTER_MASK) as u8)
    }

    fn start_management_cycle(&self) {
        self.mii_busy_left.set(self.mii_latency);
    }
}

impl RegisterAccess for MockRegisters {
    fn read(&self, reg: Reg) -> u32 {
        if reg == Reg::Mind {
            self.mind_polls.set(self.mind_polls.get() + 1);
            let left = self.mii_busy_left.get();
            if self.mii_stuck {
                return mind::BUSY;
            }
            if left > 0 {
                self.mii_busy_left.set(left - 1);
                return mind::BUSY;
            }
            return 0;
        }
        self.peek(reg)
    }

    fn write(&mut self, reg: Reg, value: u32) {
        self.log.push((reg, value));
        match reg {
            Reg::Command => {
                if value & command::RX_RESET != 0 {
                    self.poke(Reg::RxProduceIndex, 0);
                    self.poke(Reg::RxConsumeIndex, 0);
                }
                if value & command::TX_RESET != 0 {
                    self.poke(Reg::TxProduceIndex, 0);
                    self.poke(Reg::TxConsumeIndex, 0);
                }
                self.poke(reg, value & !command::RESET_ALL);
            }
            Reg::Mwtd => {
                self.poke(reg, value);
                if let Some(phy_reg) = self.selected_phy_register() {
                    let mut data = value as u16;
                    if phy_reg == phy_reg::BMCR {
                        // reset self-clears
                        data &= !bmcr::RESET;
                    }
                    self.phy.insert(phy_reg, data);
                }
                self.start_management_cycle();
            }
            Reg::Mcmd => {
                self.poke(reg, value);
                if value & mcmd::READ != 0 {
                    let data = match self.selected_phy_register() {
                        Some(phy_reg) => {
                            self.phy_reads.push(phy_reg);
                            self.phy_register(phy_reg)
                        }
                        // nobody drives MDIO; the line floats high
                        None => 0xFFFF,
                    };
                    self.poke(Reg::Mrdd, data as u32);
                    self.start_management_cycle();
                }
            }
            _ => self.poke(reg, value),
        }
    }
}

/// Register file with a PHY that reports autonegotiation done, link up and
/// 100 Mbps full duplex on the first poll
pub fn link_ready() -> MockRegisters {
    let mut regs = MockRegisters::new();
    regs.set_phy_register(phy_reg::BMSR, bmsr::AN_COMPLETE | bmsr::LINK_STATUS);
    regs.set_phy_register(reg::PSCSR, pscsr::AUTODONE | (0b110 << 2));
    regs
}

/// Place `payload` in the next receive slot the way the DMA engine does:
/// data plus CRC in the buffer, size and `flags` in the status entry, then
/// advance the produce index.
pub fn deliver_frame<const RX: usize, const TX: usize, const FRAG: usize>(
    regs: &mut MockRegisters,
    area: &mut DmaArea<RX, TX, FRAG>,
    payload: &[u8],
    flags: u32,
) {
    let index = regs.peek(Reg::RxProduceIndex) as usize % RX;
    let received = payload.len() + CRC_SIZE;

    let buffer = area.rx_buffer_mut(index);
    buffer[..payload.len()].copy_from_slice(payload);
    buffer[payload.len()..received].fill(0xCC);

    let info = ((received - 1) as u32 & rx_status::SIZE_MASK) | rx_status::LAST | flags;
    area.rx_status()[index].store(info);
    regs.poke(Reg::RxProduceIndex, ((index + 1) % RX) as u32);
}

// =============================================================================
// Mock MDIO Bus
// =============================================================================

/// PHY register map behind the [`MdioBus`] trait.
///
/// Registers never set read as 0. Writes are stored as written.
#[derive(Debug, Default)]
pub struct MockMdioBus {
    registers: RefCell<HashMap<(u8, u8), u16>>,
    write_log: RefCell<Vec<(u8, u8, u16)>>,
    read_log: RefCell<Vec<(u8, u8)>>,
    busy: Cell<bool>,
}

impl MockMdioBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_register(&self, phy_addr: u8, reg_addr: u8, value: u16) {
        self.registers
            .borrow_mut()
            .insert((phy_addr, reg_addr), value);
    }

    pub fn get_register(&self, phy_addr: u8, reg_addr: u8) -> Option<u16> {
        self.registers.borrow().get(&(phy_addr, reg_addr)).copied()
    }

    pub fn get_writes(&self) -> Vec<(u8, u8, u16)> {
        self.write_log.borrow().clone()
    }

    pub fn get_reads(&self) -> Vec<(u8, u8)> {
        self.read_log.borrow().clone()
    }

    pub fn set_busy(&self, busy: bool) {
        self.busy.set(busy);
    }
}

impl MdioBus for MockMdioBus {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> u16 {
        self.read_log.borrow_mut().push((phy_addr, reg_addr));
        self.get_register(phy_addr, reg_addr).unwrap_or(0)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) {
        self.write_log
            .borrow_mut()
            .push((phy_addr, reg_addr, value));
        self.set_register(phy_addr, reg_addr, value);
    }

    fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

// =============================================================================
// Simulated Clock
// =============================================================================

#[derive(Debug)]
struct ClockState {
    origin: u32,
    ticks: Cell<u32>,
    pending_ns: Cell<u64>,
    yields: Cell<u32>,
    yield_step_ms: u32,
}

/// Simulated millisecond clock.
///
/// One tick is one millisecond. Clones share the same time, so one clock
/// can serve as the tick source, the delay and the yield port of the same
/// call. Delays advance time by their length; every yield advances it by
/// [`yield_step_ms`](Self::yield_step_ms).
#[derive(Debug, Clone)]
pub struct SimClock {
    state: Rc<ClockState>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(ticks: u32) -> Self {
        Self {
            state: Rc::new(ClockState {
                origin: ticks,
                ticks: Cell::new(ticks),
                pending_ns: Cell::new(0),
                yields: Cell::new(0),
                yield_step_ms: 10,
            }),
        }
    }

    pub fn advance_ms(&self, ms: u32) {
        let ticks = &self.state.ticks;
        ticks.set(ticks.get().wrapping_add(ms));
    }

    /// Milliseconds since the clock was created
    pub fn now_ms(&self) -> u32 {
        self.state.ticks.get().wrapping_sub(self.state.origin)
    }

    pub fn yields(&self) -> u32 {
        self.state.yields.get()
    }

    pub fn yield_step_ms(&self) -> u32 {
        self.state.yield_step_ms
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for SimClock {
    fn ticks(&self) -> u32 {
        self.state.ticks.get()
    }

    fn elapsed_ms(&self, start: u32) -> u32 {
        self.ticks().wrapping_sub(start)
    }
}

impl DelayNs for SimClock {
    fn delay_ns(&mut self, ns: u32) {
        let total = self.state.pending_ns.get() + ns as u64;
        self.advance_ms((total / 1_000_000) as u32);
        self.state.pending_ns.set(total % 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance_ms(ms);
    }
}

impl Yield for SimClock {
    fn yield_now(&mut self) {
        self.advance_ms(self.state.yield_step_ms);
        self.state.yields.set(self.state.yields.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_time() {
        let clock = SimClock::new();
        let mut delay = clock.clone();
        let mut yielder = clock.clone();

        delay.delay_ms(600);
        yielder.yield_now();
        delay.delay_us(1500);
        delay.delay_us(500);

        assert_eq!(clock.now_ms(), 612);
        assert_eq!(clock.yields(), 1);
    }

    #[test]
    fn mii_read_latches_selected_phy_register() {
        let mut regs = MockRegisters::new();
        regs.set_phy_register(phy_reg::BMSR, 0x782D);

        regs.write(Reg::Madr, 0x0101);
        regs.write(Reg::Mcmd, mcmd::READ);
        assert_eq!(regs.read(Reg::Mrdd), 0x782D);

        regs.write(Reg::Madr, 0x0201);
        regs.write(Reg::Mcmd, mcmd::READ);
        assert_eq!(regs.read(Reg::Mrdd), 0xFFFF);
        assert_eq!(regs.phy_reads(), [phy_reg::BMSR]);
    }

    #[test]
    fn datapath_resets_zero_indices() {
        let mut regs = MockRegisters::new();
        regs.poke(Reg::RxProduceIndex, 3);
        regs.poke(Reg::TxConsumeIndex, 1);

        regs.write(Reg::Command, command::RESET_ALL);

        assert_eq!(regs.peek(Reg::RxProduceIndex), 0);
        assert_eq!(regs.peek(Reg::TxConsumeIndex), 0);
        assert_eq!(regs.peek(Reg::Command), 0);
        assert_eq!(regs.writes_to(Reg::Command), [command::RESET_ALL]);
    }
}

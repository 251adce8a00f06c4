//! LPC17xx Ethernet device context.
//!
//! [`Ethernet`] owns the register interface and borrows the [`DmaArea`] for
//! its whole lifetime. The station address, ring
//! bookkeeping and link result live here rather than in globals, and every
//! operation takes the context by reference.

use embedded_hal::delay::DelayNs;

use super::bringup;
use super::config::{EthConfig, State, StationAddress};
use super::error::{ConfigError, ConfigResult, LinkResult};
use crate::dma::{DmaArea, MemoryLayout, RxRing, TxRing};
use crate::hal::mdio::MiiManagement;
use crate::hal::timer::{TickSource, Yield};
use crate::internal::constants::{
    DEFAULT_RX_FRAGMENTS, DEFAULT_TX_FRAGMENTS, FRAGMENT_SIZE, MAC_ADDR_LEN, MAX_FRAGMENT_SIZE,
};
use crate::phy::{LinkManager, LinkState, LinkStatus};
use crate::register::RegisterAccess;

/// LPC17xx EMAC driver
///
/// # Type Parameters
///
/// * `R` - Register interface ([`Mmio`](crate::register::Mmio) on hardware)
/// * `RX` - Receive ring capacity (at least 2)
/// * `TX` - Transmit ring capacity (at least 2)
/// * `FRAG` - Bytes per buffer slot (a multiple of 4, at most 2048)
///
/// # Example
///
/// ```ignore
/// use ph_lpc17xx_mac::{DmaAreaDefault, EthConfig, Ethernet, SpinYield};
/// use ph_lpc17xx_mac::register::Mmio;
///
/// let area = unsafe { DmaAreaDefault::at(0x2007_C000) };
/// let regs = unsafe { Mmio::steal() };
/// let mut eth = Ethernet::new(regs, area, EthConfig::default())?;
///
/// eth.init([0x02, 0x00, 0x00, 0x12, 0x34, 0x56], &mut delay, &TICKS, &mut SpinYield)?;
///
/// let mut frame = [0u8; 1536];
/// let len = eth.receive_frame(&mut frame);
/// ```
pub struct Ethernet<
    'a,
    R: RegisterAccess,
    const RX: usize = DEFAULT_RX_FRAGMENTS,
    const TX: usize = DEFAULT_TX_FRAGMENTS,
    const FRAG: usize = FRAGMENT_SIZE,
> {
    pub(super) regs: R,
    pub(super) area: &'a mut DmaArea<RX, TX, FRAG>,
    pub(super) layout: MemoryLayout,
    pub(super) rx_ring: RxRing<RX>,
    pub(super) tx_ring: TxRing<TX>,
    pub(super) config: EthConfig,
    pub(super) link: LinkManager,
    pub(super) station: StationAddress,
    pub(super) state: State,
    pub(super) mii_busy_timeouts: u32,
}

impl<'a, R: RegisterAccess, const RX: usize, const TX: usize, const FRAG: usize>
    Ethernet<'a, R, RX, TX, FRAG>
{
    /// Create a driver over `regs` and `area`.
    ///
    /// Nothing is written to the hardware until [`init`](Self::init).
    ///
    /// # Errors
    ///
    /// - Any error from [`EthConfig::validate`]
    /// - [`ConfigError::InvalidRingCapacity`] if `RX` or `TX` is below 2
    /// - [`ConfigError::InvalidFragmentSize`] if `FRAG` is zero, not a
    ///   multiple of 4, larger than the 11-bit size field allows, or smaller
    ///   than `config.max_frame_len` (every frame must fit one slot)
    pub fn new(
        regs: R,
        area: &'a mut DmaArea<RX, TX, FRAG>,
        config: EthConfig,
    ) -> ConfigResult<Self> {
        config.validate()?;
        if RX < 2 || TX < 2 {
            return Err(ConfigError::InvalidRingCapacity);
        }
        if FRAG == 0 || FRAG % 4 != 0 || FRAG > MAX_FRAGMENT_SIZE {
            return Err(ConfigError::InvalidFragmentSize);
        }
        if config.max_frame_len as usize > FRAG {
            return Err(ConfigError::InvalidFragmentSize);
        }

        let layout = area.layout();
        let link = LinkManager::new(config.phy_address)
            .with_reset_settle_ms(config.phy_reset_settle_ms)
            .with_timeouts(config.autoneg_timeout_ms, config.link_timeout_ms);

        Ok(Self {
            regs,
            area,
            layout,
            rx_ring: RxRing::new(layout.rx_ring()),
            tx_ring: TxRing::new(layout.tx_ring()),
            config,
            link,
            station: StationAddress::from_bytes([0; MAC_ADDR_LEN]),
            state: State::Uninitialized,
            mii_busy_timeouts: 0,
        })
    }

    /// Bring the controller up with station address `mac`.
    ///
    /// Runs the full sequence: power, pins, MAC reset, MAC defaults,
    /// management clock, PHY negotiation, duplex and speed, station address,
    /// both rings, filter and interrupts, and finally the datapaths. May be
    /// called again to retry or to restart a running controller.
    ///
    /// # Errors
    ///
    /// The [`LinkError`](super::error::LinkError) from negotiation, unchanged.
    /// The controller is then left partially configured and the driver in
    /// [`State::Uninitialized`]; only a new `init` recovers it.
    pub fn init<D, T, Y>(
        &mut self,
        mac: [u8; MAC_ADDR_LEN],
        delay: &mut D,
        timer: &T,
        yielder: &mut Y,
    ) -> LinkResult<()>
    where
        D: DelayNs,
        T: TickSource + ?Sized,
        Y: Yield,
    {
        self.state = State::Uninitialized;
        self.station = StationAddress::from_bytes(mac);

        #[cfg(feature = "defmt")]
        defmt::info!("EMAC bring-up, PHY at {}", self.config.phy_address);

        bringup::power_on(&mut self.regs);
        bringup::route_pins(&mut self.regs);
        bringup::reset(&mut self.regs, delay, &self.config);
        bringup::configure_mac(&mut self.regs, &self.config);
        MiiManagement::with_busy_polls(&mut self.regs, self.config.mii_busy_polls)
            .configure(self.config.mdc_divider);
        bringup::disable_datapaths(&mut self.regs, &self.config);

        let status = self.negotiate(delay, timer, yielder)?;
        bringup::apply_link(&mut self.regs, status);
        bringup::program_station_address(&mut self.regs, &self.station);

        self.rx_ring.init(
            &mut self.regs,
            self.area.rx_descriptors(),
            self.area.rx_status(),
            self.config.rx_descriptor_interrupt,
        );
        self.tx_ring.init(
            &mut self.regs,
            self.area.tx_descriptors(),
            self.area.tx_status(),
            false,
        );

        bringup::arm_filter_and_interrupts(&mut self.regs, &self.config);
        bringup::enable_datapaths(&mut self.regs);
        self.state = State::Up;

        #[cfg(feature = "defmt")]
        defmt::info!("EMAC up: {}", status);
        Ok(())
    }

    fn negotiate<D, T, Y>(
        &mut self,
        delay: &mut D,
        timer: &T,
        yielder: &mut Y,
    ) -> LinkResult<LinkStatus>
    where
        D: DelayNs,
        T: TickSource + ?Sized,
        Y: Yield,
    {
        let mut mii = MiiManagement::with_busy_polls(&mut self.regs, self.config.mii_busy_polls);
        let result = self.link.negotiate(&mut mii, delay, timer, yielder);
        self.mii_busy_timeouts = self.mii_busy_timeouts.saturating_add(mii.busy_timeouts());
        result
    }

    /// Re-read the PHY status and report whether link and autonegotiation
    /// are both up
    pub fn is_link_up(&mut self) -> bool {
        let mut mii = MiiManagement::with_busy_polls(&mut self.regs, self.config.mii_busy_polls);
        let up = self.link.is_link_up(&mut mii);
        self.mii_busy_timeouts = self.mii_busy_timeouts.saturating_add(mii.busy_timeouts());
        up
    }

    /// True when the receive ring holds at least one frame.
    ///
    /// Always false before a successful [`init`](Self::init).
    pub fn has_pending_frame(&self) -> bool {
        self.state == State::Up && self.rx_ring.is_data_available(&self.regs)
    }

    /// True when the transmit ring has a free slot
    pub fn can_send(&self) -> bool {
        self.state == State::Up && !self.tx_ring.is_full(&self.regs)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Driver state
    pub fn state(&self) -> State {
        self.state
    }

    /// How far the last negotiation got
    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    /// Speed and duplex from the last successful negotiation
    pub fn link_status(&self) -> Option<LinkStatus> {
        self.link.state().status()
    }

    /// Station address programmed by the last [`init`](Self::init)
    pub fn station_address(&self) -> StationAddress {
        self.station
    }

    /// Active configuration
    pub fn config(&self) -> &EthConfig {
        &self.config
    }

    /// Layout of the borrowed DMA area
    pub fn layout(&self) -> &MemoryLayout {
        &self.layout
    }

    /// MII transactions abandoned because the busy flag never cleared
    pub fn mii_busy_timeouts(&self) -> u32 {
        self.mii_busy_timeouts
    }

    /// Total memory used by the DMA area
    pub const fn memory_usage() -> usize {
        DmaArea::<RX, TX, FRAG>::SIZE
    }

    /// Register interface and DMA area, for simulating hardware in tests
    #[cfg(test)]
    pub(crate) fn parts_mut(&mut self) -> (&mut R, &mut DmaArea<RX, TX, FRAG>) {
        (&mut self.regs, &mut *self.area)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;

    use std::boxed::Box;
    use std::vec::Vec;

    use super::*;
    use crate::driver::error::LinkError;
    use crate::internal::phy_regs::lan8720::reg;
    use crate::internal::phy_regs::standard::{bmsr, phy_reg};
    use crate::register::Reg;
    use crate::register::emac::{command, mac1};
    use crate::testing::{MockRegisters, SimClock, link_ready};

    const MAC: [u8; 6] = [0x02, 0x00, 0x00, 0x12, 0x34, 0x56];

    type Area = DmaArea<4, 2, 1536>;

    #[test]
    fn new_validates_geometry() {
        let mut small: Box<DmaArea<1, 2, 64>> = Box::new(DmaArea::new());
        assert_eq!(
            Ethernet::new(MockRegisters::new(), &mut *small, EthConfig::new()).err(),
            Some(ConfigError::InvalidRingCapacity)
        );

        let mut odd: Box<DmaArea<2, 2, 62>> = Box::new(DmaArea::new());
        assert_eq!(
            Ethernet::new(MockRegisters::new(), &mut *odd, EthConfig::new()).err(),
            Some(ConfigError::InvalidFragmentSize)
        );

        let mut area: Box<Area> = Box::new(DmaArea::new());
        let config = EthConfig::new().with_phy_address(40);
        assert_eq!(
            Ethernet::new(MockRegisters::new(), &mut *area, config).err(),
            Some(ConfigError::InvalidPhyAddress)
        );
    }

    #[test]
    fn new_rejects_slots_smaller_than_max_frame() {
        let mut area: Box<DmaArea<4, 2, 64>> = Box::new(DmaArea::new());
        assert_eq!(
            Ethernet::new(link_ready(), &mut *area, EthConfig::new()).err(),
            Some(ConfigError::InvalidFragmentSize)
        );

        let config = EthConfig::new().with_max_frame_len(64);
        assert!(Ethernet::new(link_ready(), &mut *area, config).is_ok());
    }

    #[test]
    fn new_touches_no_registers() {
        let mut area: Box<Area> = Box::new(DmaArea::new());
        let eth = Ethernet::new(MockRegisters::new(), &mut *area, EthConfig::new()).unwrap();
        assert_eq!(eth.state(), State::Uninitialized);
        assert_eq!(eth.link_state(), LinkState::Down);
        assert!(!eth.has_pending_frame());
        assert!(!eth.can_send());
        assert_eq!(<Ethernet<'static, MockRegisters>>::memory_usage(), 9304);
    }

    #[test]
    fn init_succeeds_on_first_poll() {
        let mut area: Box<Area> = Box::new(DmaArea::new());
        let mut eth = Ethernet::new(link_ready(), &mut *area, EthConfig::new()).unwrap();
        let clock = SimClock::new();

        let result = eth.init(MAC, &mut clock.clone(), &clock, &mut clock.clone());

        assert_eq!(result, Ok(()));
        assert_eq!(eth.state(), State::Up);
        assert_eq!(eth.link_status(), Some(LinkStatus::fast_full()));
        assert_eq!(eth.station_address().to_bytes(), MAC);
        assert_eq!(clock.yields(), 0);

        let (regs, _) = eth.parts_mut();
        assert_eq!(regs.peek(Reg::Sa0), 0x3456);
        assert_eq!(regs.peek(Reg::Sa1), 0x0012);
        assert_eq!(regs.peek(Reg::Sa2), 0x0200);
        assert_eq!(regs.peek(Reg::Command) & command::DATAPATHS, command::DATAPATHS);
        assert_ne!(regs.peek(Reg::Command) & command::FULL_DUPLEX, 0);
        assert_eq!(regs.peek(Reg::Mac1) & mac1::RECEIVE_ENABLE, mac1::RECEIVE_ENABLE);
        assert_eq!(regs.peek(Reg::RxDescriptorNumber), 3);
        assert_eq!(regs.peek(Reg::TxDescriptorNumber), 1);
    }

    #[test]
    fn bring_up_writes_follow_hardware_order() {
        let mut area: Box<Area> = Box::new(DmaArea::new());
        let mut eth = Ethernet::new(link_ready(), &mut *area, EthConfig::new()).unwrap();
        let clock = SimClock::new();
        eth.init(MAC, &mut clock.clone(), &clock, &mut clock.clone())
            .unwrap();

        let (regs, _) = eth.parts_mut();
        let log = regs.write_log();
        let first = |reg: Reg| log.iter().position(|(r, _)| *r == reg).unwrap();
        let last = |reg: Reg| log.iter().rposition(|(r, _)| *r == reg).unwrap();
        let first_value = |reg: Reg, value: u32| {
            log.iter().position(|entry| *entry == (reg, value)).unwrap()
        };

        let order: Vec<usize> = std::vec![
            first(Reg::Pconp),
            first(Reg::Pinsel2),
            first(Reg::Pinsel3),
            first_value(Reg::Mac1, mac1::RESET_ALL),
            first_value(Reg::Command, command::RESET_ALL),
            first(Reg::Mac2),
            first(Reg::Ipgr),
            first(Reg::Clrt),
            first(Reg::Maxf),
            first(Reg::Mcfg),
            first(Reg::Mwtd),
            first(Reg::Ipgt),
            first(Reg::Supp),
            first(Reg::Sa0),
            first(Reg::RxDescriptor),
            first(Reg::TxDescriptor),
            first(Reg::RxFilterCtrl),
            first(Reg::IntEnable),
            first(Reg::IntClear),
            last(Reg::Command),
            last(Reg::Mac1),
        ];
        assert!(order.windows(2).all(|w| w[0] < w[1]), "{order:?}");

        // paths are disabled before the PHY is touched and enabled last
        let (_, before_phy) = log[..first(Reg::Mwtd)]
            .iter()
            .rev()
            .find(|(r, _)| *r == Reg::Command)
            .unwrap();
        assert_eq!(before_phy & command::DATAPATHS, 0);
        assert_eq!(log[last(Reg::Command)].1 & command::DATAPATHS, command::DATAPATHS);
    }

    #[test]
    fn autonegotiation_timeout_leaves_uninitialized() {
        let mut regs = MockRegisters::new();
        regs.set_phy_register(phy_reg::BMSR, bmsr::LINK_STATUS);
        let mut area: Box<Area> = Box::new(DmaArea::new());
        let mut eth = Ethernet::new(regs, &mut *area, EthConfig::new()).unwrap();
        let clock = SimClock::new();

        let result = eth.init(MAC, &mut clock.clone(), &clock, &mut clock.clone());

        assert_eq!(result, Err(LinkError::AutonegotiationTimeout));
        assert_eq!(eth.state(), State::Uninitialized);
        assert_eq!(eth.link_state(), LinkState::Negotiating);
        assert!(clock.now_ms() - 700 > 5000);

        // one BMSR poll per yield plus the poll that saw the deadline pass
        let yields = clock.yields();
        assert_eq!(yields, 501);
        let (regs, _) = eth.parts_mut();
        let bmsr_reads = regs.phy_reads().iter().filter(|r| **r == phy_reg::BMSR).count();
        assert_eq!(bmsr_reads, yields as usize + 1);
        assert_eq!(regs.phy_reads().last(), Some(&phy_reg::BMSR));
        assert!(!regs.phy_reads().contains(&reg::PSCSR));
        assert!(regs.writes_to(Reg::RxDescriptor).is_empty());
        assert_eq!(regs.peek(Reg::Command) & command::DATAPATHS, 0);
    }

    #[test]
    fn link_timeout_is_propagated() {
        let mut regs = MockRegisters::new();
        regs.set_phy_register(phy_reg::BMSR, bmsr::AN_COMPLETE);
        let mut area: Box<Area> = Box::new(DmaArea::new());
        let config = EthConfig::new().with_timeouts(100, 300);
        let mut eth = Ethernet::new(regs, &mut *area, config).unwrap();
        let clock = SimClock::new();

        let result = eth.init(MAC, &mut clock.clone(), &clock, &mut clock.clone());
        assert_eq!(result, Err(LinkError::LinkTimeout));
        assert_eq!(eth.link_state(), LinkState::LinkWaiting);
        assert_eq!(eth.state(), State::Uninitialized);
    }

    #[test]
    fn failed_reinit_from_up_returns_to_uninitialized() {
        let mut area: Box<Area> = Box::new(DmaArea::new());
        let config = EthConfig::new().with_timeouts(50, 50);
        let mut eth = Ethernet::new(link_ready(), &mut *area, config).unwrap();
        let clock = SimClock::new();
        eth.init(MAC, &mut clock.clone(), &clock, &mut clock.clone())
            .unwrap();
        assert_eq!(eth.state(), State::Up);

        eth.parts_mut().0.set_phy_register(phy_reg::BMSR, 0);
        let result = eth.init(MAC, &mut clock.clone(), &clock, &mut clock.clone());
        assert_eq!(result, Err(LinkError::AutonegotiationTimeout));
        assert_eq!(eth.state(), State::Uninitialized);
        assert!(!eth.has_pending_frame());
    }

    #[test]
    fn half_duplex_10_programs_half_duplex_mac() {
        let mut regs = link_ready();
        regs.set_phy_register(reg::PSCSR, 0b001 << 2);
        let mut area: Box<Area> = Box::new(DmaArea::new());
        let mut eth = Ethernet::new(regs, &mut *area, EthConfig::new()).unwrap();
        let clock = SimClock::new();
        eth.init(MAC, &mut clock.clone(), &clock, &mut clock.clone())
            .unwrap();

        assert_eq!(eth.link_status(), Some(LinkStatus::slow_half()));
        let (regs, _) = eth.parts_mut();
        assert_eq!(regs.peek(Reg::Ipgt), 0x12);
        assert_eq!(regs.peek(Reg::Supp), 0);
        assert_eq!(regs.peek(Reg::Command) & command::FULL_DUPLEX, 0);
    }

    #[test]
    fn is_link_up_rereads_phy() {
        let mut area: Box<Area> = Box::new(DmaArea::new());
        let mut eth = Ethernet::new(link_ready(), &mut *area, EthConfig::new()).unwrap();
        assert!(eth.is_link_up());

        eth.parts_mut().0.set_phy_register(phy_reg::BMSR, bmsr::AN_COMPLETE);
        assert!(!eth.is_link_up());
    }

    #[test]
    fn stuck_management_bus_is_counted_not_fatal() {
        let mut regs = link_ready();
        regs.set_mii_stuck(true);
        let mut area: Box<Area> = Box::new(DmaArea::new());
        let config = EthConfig::new().with_mii_busy_polls(4);
        let mut eth = Ethernet::new(regs, &mut *area, config).unwrap();

        assert!(eth.is_link_up());
        assert_eq!(eth.mii_busy_timeouts(), 1);
    }
}

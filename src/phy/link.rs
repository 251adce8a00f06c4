//! Link establishment state machine.
//!
//! Negotiation is a strictly sequential two-phase bounded wait:
//!
//! ```text
//! Down --reset, enable AN--> Negotiating --AN complete--> LinkWaiting --link--> Up
//!                                 |                            |
//!                          AutonegotiationTimeout          LinkTimeout
//! ```
//!
//! There are no internal retries. A failed phase leaves the state where it
//! stopped; only a new [`LinkManager::negotiate`] starts over from `Down`.

use embedded_hal::delay::DelayNs;

use super::{Lan8720, LinkStatus};
use crate::driver::error::{LinkError, LinkResult};
use crate::hal::mdio::MdioBus;
use crate::hal::timer::{Deadline, TickSource, Yield};
use crate::internal::constants::{AUTONEG_TIMEOUT_MS, LINK_TIMEOUT_MS, PHY_RESET_SETTLE_MS};

/// Progress of link establishment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Nothing attempted yet, or a new attempt is starting
    #[default]
    Down,
    /// Waiting for autonegotiation to complete
    Negotiating,
    /// Autonegotiation done, waiting for the link bit
    LinkWaiting,
    /// Link established with the negotiated parameters
    Up(LinkStatus),
}

impl LinkState {
    /// Negotiated parameters once the link is up
    pub const fn status(&self) -> Option<LinkStatus> {
        match self {
            LinkState::Up(status) => Some(*status),
            _ => None,
        }
    }
}

/// Runs PHY negotiation and remembers how far it got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkManager {
    phy: Lan8720,
    state: LinkState,
    reset_settle_ms: u32,
    autoneg_timeout_ms: u32,
    link_timeout_ms: u32,
}

impl LinkManager {
    /// Create a manager for the PHY at `phy_addr` with the default timings
    pub const fn new(phy_addr: u8) -> Self {
        Self {
            phy: Lan8720::new(phy_addr),
            state: LinkState::Down,
            reset_settle_ms: PHY_RESET_SETTLE_MS,
            autoneg_timeout_ms: AUTONEG_TIMEOUT_MS,
            link_timeout_ms: LINK_TIMEOUT_MS,
        }
    }

    /// Override the negotiation deadlines
    #[must_use]
    pub const fn with_timeouts(mut self, autoneg_ms: u32, link_ms: u32) -> Self {
        self.autoneg_timeout_ms = autoneg_ms;
        self.link_timeout_ms = link_ms;
        self
    }

    /// Override the settle time after the PHY soft reset
    #[must_use]
    pub const fn with_reset_settle_ms(mut self, settle_ms: u32) -> Self {
        self.reset_settle_ms = settle_ms;
        self
    }

    /// The PHY being managed
    pub const fn phy(&self) -> &Lan8720 {
        &self.phy
    }

    /// Current link state
    pub const fn state(&self) -> LinkState {
        self.state
    }

    /// Reset the PHY, enable autonegotiation and wait for the link.
    ///
    /// Each phase polls BMSR, yielding between polls. A phase that sees its
    /// bit set on a poll succeeds even if its deadline has passed by then.
    ///
    /// # Errors
    ///
    /// - [`LinkError::AutonegotiationTimeout`] if autonegotiation does not
    ///   complete within the first deadline. The link bit is never polled.
    /// - [`LinkError::LinkTimeout`] if the link does not come up within the
    ///   second deadline.
    pub fn negotiate<M, D, T, Y>(
        &mut self,
        mdio: &mut M,
        delay: &mut D,
        timer: &T,
        yielder: &mut Y,
    ) -> LinkResult<LinkStatus>
    where
        M: MdioBus,
        D: DelayNs,
        T: TickSource + ?Sized,
        Y: Yield,
    {
        self.state = LinkState::Down;

        self.phy.soft_reset(mdio);
        delay.delay_ms(self.reset_settle_ms);
        self.phy.enable_auto_negotiation(mdio);

        self.state = LinkState::Negotiating;
        #[cfg(feature = "defmt")]
        defmt::debug!("PHY {}: autonegotiating", self.phy.address());

        let deadline = Deadline::start(timer, self.autoneg_timeout_ms);
        while !self.phy.is_auto_negotiation_complete(mdio) {
            if deadline.has_expired(timer) {
                #[cfg(feature = "defmt")]
                defmt::warn!("PHY {}: autonegotiation timed out", self.phy.address());
                return Err(LinkError::AutonegotiationTimeout);
            }
            yielder.yield_now();
        }

        self.state = LinkState::LinkWaiting;
        #[cfg(feature = "defmt")]
        defmt::debug!("PHY {}: waiting for link", self.phy.address());

        let deadline = Deadline::start(timer, self.link_timeout_ms);
        while !self.phy.has_link(mdio) {
            if deadline.has_expired(timer) {
                #[cfg(feature = "defmt")]
                defmt::warn!("PHY {}: link timed out", self.phy.address());
                return Err(LinkError::LinkTimeout);
            }
            yielder.yield_now();
        }

        let status = self.phy.read_speed_indication(mdio);
        self.state = LinkState::Up(status);
        #[cfg(feature = "defmt")]
        defmt::info!("PHY {}: link up {}", self.phy.address(), status);
        Ok(status)
    }

    /// Re-read BMSR and report whether link and autonegotiation are both up
    pub fn is_link_up<M: MdioBus>(&self, mdio: &mut M) -> bool {
        self.phy.is_link_up(mdio)
    }
}

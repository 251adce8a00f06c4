//! Critical-section wrapper for sharing the driver with interrupt handlers.

use super::primitives::CriticalSectionCell;
use crate::driver::ethernet::Ethernet;
use crate::internal::constants::{DEFAULT_RX_FRAGMENTS, DEFAULT_TX_FRAGMENTS, FRAGMENT_SIZE};
use crate::register::RegisterAccess;

/// ISR-safe home for an [`Ethernet`] driver.
///
/// Starts empty so it can live in a `static`; install the driver once it has
/// been created. Every access runs inside `critical_section::with()`, so an
/// interrupt cannot observe a ring index between its read and the buffer copy
/// it guards.
///
/// # Example
///
/// ```ignore
/// static ETH: SharedEthernet<'static, Mmio> = SharedEthernet::new();
///
/// let mut eth = Ethernet::new(unsafe { Mmio::steal() }, area, EthConfig::default())?;
/// eth.init(mac, &mut delay, &TICKS, &mut SpinYield)?;
/// ETH.install(eth);
///
/// #[interrupt]
/// fn ENET() {
///     let mut frame = [0u8; 1536];
///     let len = ETH.receive_frame(&mut frame);
/// }
/// ```
pub struct SharedEthernet<
    'a,
    R: RegisterAccess,
    const RX: usize = DEFAULT_RX_FRAGMENTS,
    const TX: usize = DEFAULT_TX_FRAGMENTS,
    const FRAG: usize = FRAGMENT_SIZE,
> {
    inner: CriticalSectionCell<Option<Ethernet<'a, R, RX, TX, FRAG>>>,
}

impl<'a, R: RegisterAccess, const RX: usize, const TX: usize, const FRAG: usize>
    SharedEthernet<'a, R, RX, TX, FRAG>
{
    /// Create an empty wrapper (const, suitable for static initialization)
    pub const fn new() -> Self {
        Self {
            inner: CriticalSectionCell::new(None),
        }
    }

    /// Store `eth`, returning the driver previously installed
    pub fn install(
        &self,
        eth: Ethernet<'a, R, RX, TX, FRAG>,
    ) -> Option<Ethernet<'a, R, RX, TX, FRAG>> {
        self.inner.replace(Some(eth))
    }

    /// Remove and return the installed driver
    pub fn take(&self) -> Option<Ethernet<'a, R, RX, TX, FRAG>> {
        self.inner.replace(None)
    }

    /// Run `f` on the installed driver.
    ///
    /// Returns `None` when no driver is installed or the wrapper is already
    /// in use further up the stack.
    #[inline]
    pub fn with<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut Ethernet<'a, R, RX, TX, FRAG>) -> T,
    {
        self.inner.try_with(|slot| slot.as_mut().map(f)).flatten()
    }

    /// [`Ethernet::receive_frame`] inside a critical section; 0 when no
    /// driver is installed
    pub fn receive_frame(&self, dst: &mut [u8]) -> usize {
        self.with(|eth| eth.receive_frame(dst)).unwrap_or(0)
    }

    /// [`Ethernet::send_frame`] inside a critical section; 0 when no driver
    /// is installed
    pub fn send_frame(&self, src: &[u8]) -> usize {
        self.with(|eth| eth.send_frame(src)).unwrap_or(0)
    }

    /// [`Ethernet::has_pending_frame`] inside a critical section
    pub fn has_pending_frame(&self) -> bool {
        self.with(|eth| eth.has_pending_frame()).unwrap_or(false)
    }
}

impl<R: RegisterAccess, const RX: usize, const TX: usize, const FRAG: usize> Default
    for SharedEthernet<'_, R, RX, TX, FRAG>
{
    fn default() -> Self {
        Self::new()
    }
}

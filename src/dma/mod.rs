//! DMA region, descriptor rings and buffer pools.
//!
//! All memory the EMAC DMA engine touches lives in one [`DmaArea`], a
//! `#[repr(C)]` struct whose field order is the hardware layout. The area is
//! allocated once, statically, and borrowed by the driver for its lifetime.
//!
//! # Example
//!
//! ```ignore
//! use ph_lpc17xx_mac::dma::DmaAreaDefault;
//!
//! // AHB SRAM bank 1, reserved in the linker script
//! let area = unsafe { DmaAreaDefault::at(0x2007_C000) };
//! ```

pub mod descriptor;
pub mod layout;
pub mod ring;

pub use descriptor::{Descriptor, RxStatus, TxStatus};
pub use layout::{MemoryLayout, RingAddresses};
pub use ring::{DescriptorRing, Direction, Rx, RxRing, Tx, TxRing};

use crate::internal::constants::{DEFAULT_RX_FRAGMENTS, DEFAULT_TX_FRAGMENTS, FRAGMENT_SIZE};

// =============================================================================
// DMA Area
// =============================================================================

/// Descriptor tables, status tables and buffer pools in hardware order.
///
/// `RX` and `TX` are the ring capacities, `FRAG` the size of one buffer slot.
#[repr(C)]
pub struct DmaArea<const RX: usize, const TX: usize, const FRAG: usize> {
    rx_descriptors: [Descriptor; RX],
    rx_status: [RxStatus; RX],
    tx_descriptors: [Descriptor; TX],
    tx_status: [TxStatus; TX],
    rx_buffers: [[u8; FRAG]; RX],
    tx_buffers: [[u8; FRAG]; TX],
}

/// DMA area with the default geometry (4 RX, 2 TX, 1536-byte slots)
pub type DmaAreaDefault = DmaArea<DEFAULT_RX_FRAGMENTS, DEFAULT_TX_FRAGMENTS, FRAGMENT_SIZE>;

impl<const RX: usize, const TX: usize, const FRAG: usize> DmaArea<RX, TX, FRAG> {
    /// Size of the area in bytes
    pub const SIZE: usize = MemoryLayout::required_size(RX, TX, FRAG);

    /// Create a zeroed area (const, suitable for static initialization)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rx_descriptors: [const { Descriptor::new() }; RX],
            rx_status: [const { RxStatus::new() }; RX],
            tx_descriptors: [const { Descriptor::new() }; TX],
            tx_status: [const { TxStatus::new() }; TX],
            rx_buffers: [[0; FRAG]; RX],
            tx_buffers: [[0; FRAG]; TX],
        }
    }

    /// Place the area at a fixed bus address.
    ///
    /// The memory is not initialized; the driver rewrites every descriptor
    /// and status entry during bring-up.
    ///
    /// # Safety
    ///
    /// `address` must be 4-byte aligned, reachable by the EMAC DMA engine,
    /// and the `Self::SIZE` bytes starting there must not be used by
    /// anything else for the rest of the program.
    pub unsafe fn at(address: usize) -> &'static mut Self {
        // SAFETY: guaranteed by the caller
        unsafe { &mut *(address as *mut Self) }
    }

    /// Layout of this area at its current address
    pub fn layout(&self) -> MemoryLayout {
        MemoryLayout::new(core::ptr::from_ref(self) as usize, RX, TX, FRAG)
    }

    pub(crate) fn rx_descriptors(&self) -> &[Descriptor; RX] {
        &self.rx_descriptors
    }

    pub(crate) fn rx_status(&self) -> &[RxStatus; RX] {
        &self.rx_status
    }

    pub(crate) fn tx_descriptors(&self) -> &[Descriptor; TX] {
        &self.tx_descriptors
    }

    pub(crate) fn tx_status(&self) -> &[TxStatus; TX] {
        &self.tx_status
    }

    pub(crate) fn rx_buffer(&self, index: usize) -> &[u8; FRAG] {
        &self.rx_buffers[index]
    }

    #[cfg(test)]
    pub(crate) fn rx_buffer_mut(&mut self, index: usize) -> &mut [u8; FRAG] {
        &mut self.rx_buffers[index]
    }

    #[cfg(test)]
    pub(crate) fn tx_buffer(&self, index: usize) -> &[u8; FRAG] {
        &self.tx_buffers[index]
    }

    pub(crate) fn tx_buffer_mut(&mut self, index: usize) -> &mut [u8; FRAG] {
        &mut self.tx_buffers[index]
    }
}

impl<const RX: usize, const TX: usize, const FRAG: usize> Default for DmaArea<RX, TX, FRAG> {
    fn default() -> Self {
        Self::new()
    }
}

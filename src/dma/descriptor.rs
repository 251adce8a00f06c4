//! Descriptor and status entries shared with the EMAC DMA engine.
//!
//! A descriptor is two words: the fixed buffer address of its slot and a
//! control word rewritten for every transfer. The status tables are written
//! by hardware; RX status entries are two words, TX status entries one.

#![allow(dead_code)]

use crate::internal::constants::{DESCRIPTOR_SIZE, RX_STATUS_SIZE, TX_STATUS_SIZE};

// =============================================================================
// Bit Fields
// =============================================================================

/// Descriptor control word bits
pub mod control {
    /// Buffer size minus one (bits 10:0)
    pub const SIZE_MASK: u32 = 0x7FF;
    /// TX: use the per-frame bits below instead of MAC2 defaults
    pub const OVERRIDE: u32 = 1 << 26;
    /// TX: allow frames larger than MAXF
    pub const HUGE: u32 = 1 << 27;
    /// TX: pad short frames
    pub const PAD: u32 = 1 << 28;
    /// TX: append a hardware CRC
    pub const CRC: u32 = 1 << 29;
    /// TX: last fragment of the frame
    pub const LAST: u32 = 1 << 30;
    /// Raise RxDone/TxDone when this descriptor completes
    pub const INTERRUPT: u32 = 1 << 31;
}

/// RX StatusInfo bits
pub mod rx_status {
    /// Received size minus one, CRC included (bits 10:0)
    pub const SIZE_MASK: u32 = 0x7FF;
    /// Frame is a MAC control frame
    pub const CONTROL_FRAME: u32 = 1 << 18;
    /// Frame is a VLAN frame
    pub const VLAN: u32 = 1 << 19;
    /// Frame failed the receive filter
    pub const FAIL_FILTER: u32 = 1 << 20;
    /// Multicast frame
    pub const MULTICAST: u32 = 1 << 21;
    /// Broadcast frame
    pub const BROADCAST: u32 = 1 << 22;
    /// CRC error
    pub const CRC_ERROR: u32 = 1 << 23;
    /// PHY reported a symbol error
    pub const SYMBOL_ERROR: u32 = 1 << 24;
    /// Length/type field does not match the frame
    pub const LENGTH_ERROR: u32 = 1 << 25;
    /// Length/type field out of range
    pub const RANGE_ERROR: u32 = 1 << 26;
    /// Alignment error
    pub const ALIGNMENT_ERROR: u32 = 1 << 27;
    /// Receive overrun
    pub const OVERRUN: u32 = 1 << 28;
    /// No new descriptor was available for the rest of the frame
    pub const NO_DESCRIPTOR: u32 = 1 << 29;
    /// Last fragment of the frame
    pub const LAST: u32 = 1 << 30;
    /// Frame had errors (OR of the error bits)
    pub const ERROR: u32 = 1 << 31;
}

/// TX StatusInfo bits
pub mod tx_status {
    /// Collision count shift (bits 24:21)
    pub const COLLISION_COUNT_SHIFT: u32 = 21;
    /// Collision count mask
    pub const COLLISION_COUNT_MASK: u32 = 0xF << COLLISION_COUNT_SHIFT;
    /// Transmission was deferred
    pub const DEFER: u32 = 1 << 25;
    /// Deferred beyond the limit and aborted
    pub const EXCESSIVE_DEFER: u32 = 1 << 26;
    /// Too many collisions, aborted
    pub const EXCESSIVE_COLLISION: u32 = 1 << 27;
    /// Collision after the collision window
    pub const LATE_COLLISION: u32 = 1 << 28;
    /// Transmit underrun
    pub const UNDERRUN: u32 = 1 << 29;
    /// No new descriptor was available for the rest of the frame
    pub const NO_DESCRIPTOR: u32 = 1 << 30;
    /// Frame had errors (OR of the error bits)
    pub const ERROR: u32 = 1 << 31;
}

/// Control word that arms an RX slot of `fragment_size` bytes
pub const fn rx_control(fragment_size: usize, interrupt: bool) -> u32 {
    let size = (fragment_size as u32 - 1) & control::SIZE_MASK;
    if interrupt {
        size | control::INTERRUPT
    } else {
        size
    }
}

/// Control word for a single-fragment TX frame of `len` bytes (`len >= 1`)
pub const fn tx_control(len: usize) -> u32 {
    ((len as u32 - 1) & control::SIZE_MASK) | control::LAST | control::INTERRUPT
}

// =============================================================================
// Volatile Cell
// =============================================================================

/// Volatile cell wrapper for fields shared with the DMA engine
///
/// Ensures all accesses are volatile so the compiler cannot cache or elide
/// reads of memory the hardware writes behind its back.
#[repr(transparent)]
pub(crate) struct VolatileCell<T: Copy> {
    value: core::cell::UnsafeCell<T>,
}

// SAFETY: all access is through volatile operations, which are single
// instructions for u32 on Cortex-M3.
unsafe impl<T: Copy> Sync for VolatileCell<T> {}

impl<T: Copy> VolatileCell<T> {
    /// Create a new volatile cell with the given initial value
    #[inline(always)]
    pub const fn new(value: T) -> Self {
        Self {
            value: core::cell::UnsafeCell::new(value),
        }
    }

    /// Read the value (volatile read)
    #[inline(always)]
    pub fn get(&self) -> T {
        // SAFETY: the pointer comes from a live UnsafeCell
        unsafe { core::ptr::read_volatile(self.value.get()) }
    }

    /// Write a value (volatile write)
    #[inline(always)]
    pub fn set(&self, value: T) {
        // SAFETY: the pointer comes from a live UnsafeCell
        unsafe { core::ptr::write_volatile(self.value.get(), value) }
    }
}

// =============================================================================
// Descriptor
// =============================================================================

/// One RX or TX descriptor (packet address + control)
#[repr(C)]
pub struct Descriptor {
    packet: VolatileCell<u32>,
    control: VolatileCell<u32>,
}

impl Descriptor {
    /// Size of the descriptor in bytes
    pub const SIZE: usize = DESCRIPTOR_SIZE;

    /// Create a zeroed descriptor
    #[must_use]
    pub const fn new() -> Self {
        Self {
            packet: VolatileCell::new(0),
            control: VolatileCell::new(0),
        }
    }

    /// Bus address of the slot buffer
    #[inline(always)]
    pub fn buffer_address(&self) -> u32 {
        self.packet.get()
    }

    /// Raw control word
    #[inline(always)]
    pub fn control(&self) -> u32 {
        self.control.get()
    }

    /// Buffer size described by the control word
    #[inline(always)]
    pub fn size(&self) -> usize {
        (self.control.get() & control::SIZE_MASK) as usize + 1
    }

    /// True when the control word requests a completion interrupt
    #[inline(always)]
    pub fn has_interrupt(&self) -> bool {
        self.control.get() & control::INTERRUPT != 0
    }

    /// True when the control word marks the last fragment
    #[inline(always)]
    pub fn is_last(&self) -> bool {
        self.control.get() & control::LAST != 0
    }

    /// Point the descriptor at its slot and set the initial control word
    #[inline(always)]
    pub(crate) fn setup(&self, buffer_address: u32, control: u32) {
        self.packet.set(buffer_address);
        self.control.set(control);
    }

    /// Rewrite the control word
    #[inline(always)]
    pub(crate) fn set_control(&self, control: u32) {
        self.control.set(control);
    }
}

impl Default for Descriptor {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Status Entries
// =============================================================================

/// Per-slot status written by the DMA engine
pub trait StatusEntry: sealed::Sealed {
    /// Size of the entry in bytes
    const SIZE: usize;

    /// Zero the entry
    fn clear(&self);
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::RxStatus {}
    impl Sealed for super::TxStatus {}
}

/// RX status entry (StatusInfo + StatusHashCRC)
#[repr(C)]
pub struct RxStatus {
    info: VolatileCell<u32>,
    hash_crc: VolatileCell<u32>,
}

impl RxStatus {
    /// Create a zeroed entry
    #[must_use]
    pub const fn new() -> Self {
        Self {
            info: VolatileCell::new(0),
            hash_crc: VolatileCell::new(0),
        }
    }

    /// Raw StatusInfo word
    #[inline(always)]
    pub fn info(&self) -> u32 {
        self.info.get()
    }

    /// Raw StatusHashCRC word
    #[inline(always)]
    pub fn hash_crc(&self) -> u32 {
        self.hash_crc.get()
    }

    /// Encoded size field (received bytes minus one, CRC included)
    #[inline(always)]
    pub fn encoded_size(&self) -> usize {
        (self.info.get() & rx_status::SIZE_MASK) as usize
    }

    /// True when the hardware flagged the frame as errored
    #[inline(always)]
    pub fn has_errors(&self) -> bool {
        self.info.get() & rx_status::ERROR != 0
    }

    /// True when this is the last fragment of the frame
    #[inline(always)]
    pub fn is_last(&self) -> bool {
        self.info.get() & rx_status::LAST != 0
    }

    /// True when the CRC check failed
    #[inline(always)]
    pub fn has_crc_error(&self) -> bool {
        self.info.get() & rx_status::CRC_ERROR != 0
    }

    /// Overwrite the entry, as the DMA engine does on completion
    #[cfg(test)]
    pub(crate) fn store(&self, info: u32) {
        self.info.set(info);
    }
}

impl Default for RxStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusEntry for RxStatus {
    const SIZE: usize = RX_STATUS_SIZE;

    fn clear(&self) {
        self.info.set(0);
        self.hash_crc.set(0);
    }
}

/// TX status entry (StatusInfo)
#[repr(C)]
pub struct TxStatus {
    info: VolatileCell<u32>,
}

impl TxStatus {
    /// Create a zeroed entry
    #[must_use]
    pub const fn new() -> Self {
        Self {
            info: VolatileCell::new(0),
        }
    }

    /// Raw StatusInfo word
    #[inline(always)]
    pub fn info(&self) -> u32 {
        self.info.get()
    }

    /// True when the hardware flagged the transmission as errored
    #[inline(always)]
    pub fn has_errors(&self) -> bool {
        self.info.get() & tx_status::ERROR != 0
    }

    /// Number of collisions seen while sending
    #[inline(always)]
    pub fn collision_count(&self) -> u32 {
        (self.info.get() & tx_status::COLLISION_COUNT_MASK) >> tx_status::COLLISION_COUNT_SHIFT
    }

    /// Overwrite the entry, as the DMA engine does on completion
    #[cfg(test)]
    pub(crate) fn store(&self, info: u32) {
        self.info.set(info);
    }
}

impl Default for TxStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusEntry for TxStatus {
    const SIZE: usize = TX_STATUS_SIZE;

    fn clear(&self) {
        self.info.set(0);
    }
}

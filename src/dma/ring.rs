//! Descriptor rings and the produce/consume index handshake.
//!
//! Each ring has two index registers. Hardware owns the RX produce index and
//! the TX consume index; software owns the other two. Neither side ever
//! writes the other's index, so the handshake needs no lock. Buffer contents
//! must be visible before the index that publishes them, which the fences
//! below guarantee.

use core::marker::PhantomData;
use core::sync::atomic::{Ordering, fence};

use super::descriptor::{Descriptor, RxStatus, StatusEntry, TxStatus, rx_control};
use super::layout::RingAddresses;
use crate::register::{Reg, RegisterAccess};

// =============================================================================
// Index Arithmetic
// =============================================================================

/// Index following `index` in a ring of `capacity` slots
#[inline(always)]
pub const fn next_index(index: usize, capacity: usize) -> usize {
    (index + 1) % capacity
}

/// Frames are pending while the indices differ
#[inline(always)]
pub const fn is_data_available(produce: usize, consume: usize) -> bool {
    produce != consume
}

/// The producer may not fill the slot just behind the consumer
#[inline(always)]
pub const fn is_full(produce: usize, consume: usize, capacity: usize) -> bool {
    next_index(produce, capacity) == consume
}

// =============================================================================
// Ring Direction
// =============================================================================

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Rx {}
    impl Sealed for super::Tx {}
}

/// Register set and slot arming for one ring direction
pub trait Direction: sealed::Sealed {
    /// Status entry type for this direction
    type Status: StatusEntry;
    /// Descriptor table base register
    const DESCRIPTOR_BASE: Reg;
    /// Status table base register
    const STATUS_BASE: Reg;
    /// Descriptor count (capacity - 1) register
    const DESCRIPTOR_NUMBER: Reg;
    /// Produce index register
    const PRODUCE_INDEX: Reg;
    /// Consume index register
    const CONSUME_INDEX: Reg;
    /// The index register software writes
    const SOFTWARE_INDEX: Reg;

    /// Control word a slot is armed with at initialization
    fn initial_control(fragment_size: usize, interrupt: bool) -> u32;
}

/// Receive direction: hardware produces, software consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rx {}

/// Transmit direction: software produces, hardware consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tx {}

impl Direction for Rx {
    type Status = RxStatus;
    const DESCRIPTOR_BASE: Reg = Reg::RxDescriptor;
    const STATUS_BASE: Reg = Reg::RxStatus;
    const DESCRIPTOR_NUMBER: Reg = Reg::RxDescriptorNumber;
    const PRODUCE_INDEX: Reg = Reg::RxProduceIndex;
    const CONSUME_INDEX: Reg = Reg::RxConsumeIndex;
    const SOFTWARE_INDEX: Reg = Reg::RxConsumeIndex;

    fn initial_control(fragment_size: usize, interrupt: bool) -> u32 {
        rx_control(fragment_size, interrupt)
    }
}

impl Direction for Tx {
    type Status = TxStatus;
    const DESCRIPTOR_BASE: Reg = Reg::TxDescriptor;
    const STATUS_BASE: Reg = Reg::TxStatus;
    const DESCRIPTOR_NUMBER: Reg = Reg::TxDescriptorNumber;
    const PRODUCE_INDEX: Reg = Reg::TxProduceIndex;
    const CONSUME_INDEX: Reg = Reg::TxConsumeIndex;
    const SOFTWARE_INDEX: Reg = Reg::TxProduceIndex;

    fn initial_control(_fragment_size: usize, _interrupt: bool) -> u32 {
        0
    }
}

// =============================================================================
// Descriptor Ring
// =============================================================================

/// A fixed-capacity ring of `N` slots in direction `D`.
///
/// The ring holds no index state of its own: the indices live in the EMAC
/// registers so both sides see the same values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorRing<D: Direction, const N: usize> {
    addresses: RingAddresses,
    _direction: PhantomData<D>,
}

/// Receive ring
pub type RxRing<const N: usize> = DescriptorRing<Rx, N>;

/// Transmit ring
pub type TxRing<const N: usize> = DescriptorRing<Tx, N>;

impl<D: Direction, const N: usize> DescriptorRing<D, N> {
    /// Create a ring over the given tables and buffer pool
    pub const fn new(addresses: RingAddresses) -> Self {
        Self {
            addresses,
            _direction: PhantomData,
        }
    }

    /// Number of slots
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Tables and buffer pool of this ring
    pub const fn addresses(&self) -> &RingAddresses {
        &self.addresses
    }

    /// Write every slot's fixed fields, clear the status table and hand the
    /// tables to the EMAC with the software index at zero.
    pub fn init<R: RegisterAccess>(
        &self,
        regs: &mut R,
        descriptors: &[Descriptor; N],
        statuses: &[D::Status; N],
        interrupt: bool,
    ) {
        let control = D::initial_control(self.addresses.fragment_size, interrupt);
        for (i, (descriptor, status)) in descriptors.iter().zip(statuses.iter()).enumerate() {
            descriptor.setup(self.addresses.buffer(i) as u32, control);
            status.clear();
        }

        regs.write(D::DESCRIPTOR_BASE, self.addresses.descriptors as u32);
        regs.write(D::STATUS_BASE, self.addresses.statuses as u32);
        regs.write(D::DESCRIPTOR_NUMBER, (N - 1) as u32);
        regs.write(D::SOFTWARE_INDEX, 0);
    }

    /// Current produce index
    #[inline]
    pub fn produce_index<R: RegisterAccess>(&self, regs: &R) -> usize {
        regs.read(D::PRODUCE_INDEX) as usize % N
    }

    /// Current consume index
    #[inline]
    pub fn consume_index<R: RegisterAccess>(&self, regs: &R) -> usize {
        regs.read(D::CONSUME_INDEX) as usize % N
    }
}

impl<const N: usize> DescriptorRing<Rx, N> {
    /// True when the hardware has filled at least one slot not yet consumed
    pub fn is_data_available<R: RegisterAccess>(&self, regs: &R) -> bool {
        let produce = self.produce_index(regs);
        // slot contents must not be read ahead of the index that published them
        fence(Ordering::Acquire);
        is_data_available(produce, self.consume_index(regs))
    }

    /// Return the current slot to the hardware
    pub fn advance_consume<R: RegisterAccess>(&self, regs: &mut R) {
        let next = next_index(self.consume_index(regs), N);
        fence(Ordering::Release);
        regs.write(Reg::RxConsumeIndex, next as u32);
    }
}

impl<const N: usize> DescriptorRing<Tx, N> {
    /// True when producing one more frame would catch up with the hardware
    pub fn is_full<R: RegisterAccess>(&self, regs: &R) -> bool {
        let consume = self.consume_index(regs);
        fence(Ordering::Acquire);
        is_full(self.produce_index(regs), consume, N)
    }

    /// Hand the current slot to the hardware
    pub fn advance_produce<R: RegisterAccess>(&self, regs: &mut R) {
        let next = next_index(self.produce_index(regs), N);
        // descriptor and buffer writes must land before the index does
        fence(Ordering::Release);
        regs.write(Reg::TxProduceIndex, next as u32);
    }
}

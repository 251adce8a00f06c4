//! DMA memory layout.
//!
//! The EMAC is handed absolute addresses for each table, so the region is
//! laid out in a fixed order from one base address:
//!
//! ```text
//! base -> RX descriptors   rx * 8
//!         RX status        rx * 8
//!         TX descriptors   tx * 8
//!         TX status        tx * 4
//!         RX buffers       rx * fragment
//!         TX buffers       tx * fragment
//! ```

use super::descriptor::{Descriptor, RxStatus, StatusEntry, TxStatus};

/// Addresses one ring needs: its tables and its buffer pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RingAddresses {
    /// Descriptor table base
    pub descriptors: usize,
    /// Status table base
    pub statuses: usize,
    /// First buffer slot
    pub buffers: usize,
    /// Slot size in bytes
    pub fragment_size: usize,
}

impl RingAddresses {
    /// Address of buffer slot `index`
    pub const fn buffer(&self, index: usize) -> usize {
        self.buffers + index * self.fragment_size
    }
}

/// Base, offsets and strides of the DMA region, computed once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemoryLayout {
    /// Start of the region (the RX descriptor table)
    pub base: usize,
    /// RX status table
    pub rx_status: usize,
    /// TX descriptor table
    pub tx_descriptors: usize,
    /// TX status table
    pub tx_status: usize,
    /// RX buffer pool
    pub rx_buffers: usize,
    /// TX buffer pool
    pub tx_buffers: usize,
    /// RX ring capacity
    pub rx_count: usize,
    /// TX ring capacity
    pub tx_count: usize,
    /// Bytes per buffer slot
    pub fragment_size: usize,
}

impl MemoryLayout {
    /// Compute the layout for a region starting at `base`
    pub const fn new(base: usize, rx_count: usize, tx_count: usize, fragment_size: usize) -> Self {
        let rx_status = base + rx_count * Descriptor::SIZE;
        let tx_descriptors = rx_status + rx_count * RxStatus::SIZE;
        let tx_status = tx_descriptors + tx_count * Descriptor::SIZE;
        let rx_buffers = tx_status + tx_count * TxStatus::SIZE;
        let tx_buffers = rx_buffers + rx_count * fragment_size;
        Self {
            base,
            rx_status,
            tx_descriptors,
            tx_status,
            rx_buffers,
            tx_buffers,
            rx_count,
            tx_count,
            fragment_size,
        }
    }

    /// Total bytes needed for the given geometry
    pub const fn required_size(rx_count: usize, tx_count: usize, fragment_size: usize) -> usize {
        rx_count * (Descriptor::SIZE + RxStatus::SIZE)
            + tx_count * (Descriptor::SIZE + TxStatus::SIZE)
            + (rx_count + tx_count) * fragment_size
    }

    /// Total bytes covered by this layout
    pub const fn total_size(&self) -> usize {
        Self::required_size(self.rx_count, self.tx_count, self.fragment_size)
    }

    /// One past the last byte of the region
    pub const fn end(&self) -> usize {
        self.base + self.total_size()
    }

    /// Addresses of the receive ring
    pub const fn rx_ring(&self) -> RingAddresses {
        RingAddresses {
            descriptors: self.base,
            statuses: self.rx_status,
            buffers: self.rx_buffers,
            fragment_size: self.fragment_size,
        }
    }

    /// Addresses of the transmit ring
    pub const fn tx_ring(&self) -> RingAddresses {
        RingAddresses {
            descriptors: self.tx_descriptors,
            statuses: self.tx_status,
            buffers: self.tx_buffers,
            fragment_size: self.fragment_size,
        }
    }
}

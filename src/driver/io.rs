//! Frame receive and send.
//!
//! The tagged `try_*` operations report why nothing moved. The `*_frame`
//! forms collapse those reasons to a sentinel: 0 for every non-event,
//! otherwise a byte count.

use super::config::State;
use super::error::{DmaError, IoError, Result};
use super::ethernet::Ethernet;
use crate::dma::descriptor::tx_control;
use crate::internal::constants::CRC_SIZE;
use crate::register::RegisterAccess;

impl<R: RegisterAccess, const RX: usize, const TX: usize, const FRAG: usize>
    Ethernet<'_, R, RX, TX, FRAG>
{
    /// Receive the oldest pending frame into `dst`.
    ///
    /// Copies `min(dst.len(), frame size)` bytes and returns the full frame
    /// size, CRC excluded. A return value larger than `dst.len()` means the
    /// frame was truncated; the rest of it is gone.
    ///
    /// # Errors
    ///
    /// - [`IoError::InvalidState`] before a successful init
    /// - [`IoError::NoFrame`] if the receive ring is empty
    /// - [`IoError::LinkDown`] if the PHY reports no link
    /// - [`IoError::FrameError`] if the frame was flagged as errored and
    ///   errored frames are dropped, or if its status reports more bytes
    ///   than a buffer slot holds; the frame is consumed
    pub fn try_receive(&mut self, dst: &mut [u8]) -> Result<usize> {
        if self.state != State::Up {
            return Err(IoError::InvalidState.into());
        }
        if !self.rx_ring.is_data_available(&self.regs) {
            return Err(IoError::NoFrame.into());
        }
        if !self.is_link_up() {
            return Err(IoError::LinkDown.into());
        }

        let index = self.rx_ring.consume_index(&self.regs);
        let status = &self.area.rx_status()[index];

        if self.config.drop_errored_frames && status.has_errors() {
            #[cfg(feature = "defmt")]
            defmt::warn!("dropping errored frame, status {=u32:#x}", status.info());
            self.rx_ring.advance_consume(&mut self.regs);
            return Err(IoError::FrameError.into());
        }

        if status.encoded_size() >= FRAG {
            #[cfg(feature = "defmt")]
            defmt::warn!("dropping frame, size field {=usize} exceeds slot", status.encoded_size());
            self.rx_ring.advance_consume(&mut self.regs);
            return Err(IoError::FrameError.into());
        }

        let frame_size = (status.encoded_size() + 1).saturating_sub(CRC_SIZE);
        let copied = dst.len().min(frame_size);
        dst[..copied].copy_from_slice(&self.area.rx_buffer(index)[..copied]);
        self.rx_ring.advance_consume(&mut self.regs);

        Ok(frame_size)
    }

    /// Receive a frame, returning 0 when there is nothing to receive.
    ///
    /// See [`try_receive`](Self::try_receive) for the truncation rule.
    pub fn receive_frame(&mut self, dst: &mut [u8]) -> usize {
        self.try_receive(dst).unwrap_or(0)
    }

    /// Queue `src` as one frame.
    ///
    /// The MAC appends the CRC and pads short frames.
    ///
    /// # Errors
    ///
    /// - [`IoError::InvalidState`] before a successful init
    /// - [`DmaError::InvalidLength`] if `src` is empty
    /// - [`DmaError::FrameTooLarge`] if `src` does not fit one buffer slot
    /// - [`DmaError::NoDescriptorsAvailable`] if the transmit ring is full
    /// - [`IoError::LinkDown`] if the PHY reports no link
    pub fn try_send(&mut self, src: &[u8]) -> Result<usize> {
        if self.state != State::Up {
            return Err(IoError::InvalidState.into());
        }
        if src.is_empty() {
            return Err(DmaError::InvalidLength.into());
        }
        if src.len() > FRAG {
            return Err(DmaError::FrameTooLarge.into());
        }
        if self.tx_ring.is_full(&self.regs) {
            return Err(DmaError::NoDescriptorsAvailable.into());
        }
        if !self.is_link_up() {
            return Err(IoError::LinkDown.into());
        }

        let index = self.tx_ring.produce_index(&self.regs);
        self.area.tx_descriptors()[index].set_control(tx_control(src.len()));
        self.area.tx_buffer_mut(index)[..src.len()].copy_from_slice(src);
        self.tx_ring.advance_produce(&mut self.regs);

        Ok(src.len())
    }

    /// Send a frame, returning 0 when it could not be queued
    pub fn send_frame(&mut self, src: &[u8]) -> usize {
        self.try_send(src).unwrap_or(0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! LPC17xx EMAC Driver
//!
//! A `no_std`, `no_alloc` driver for the Ethernet MAC (EMAC) of the NXP
//! LPC175x/6x microcontrollers, paired with an SMSC/Microchip LAN8720 PHY
//! over RMII.
//!
//! The driver owns one contiguous DMA region holding the receive and
//! transmit descriptor rings, their status tables and the frame buffers,
//! brings the controller and the PHY up in a fixed order, and then moves
//! whole frames in and out of the rings by polling. There is no network
//! stack here; the caller hands raw Ethernet frames to
//! [`Ethernet::send_frame`] and gets them back from
//! [`Ethernet::receive_frame`].
//!
//! # Architecture
//!
//! 1. **Driver** ([`driver`]): bring-up sequence, configuration, frame I/O
//! 2. **DMA** ([`dma`]): memory layout, descriptors, ring index arithmetic
//! 3. **PHY** ([`phy`]): LAN8720 register access and the link state machine
//! 4. **HAL** ([`hal`]): MII management, tick source and delays
//! 5. **Registers** ([`register`]): the EMAC and system control register map
//!
//! Hardware is reached only through [`register::RegisterAccess`]; on target
//! that is [`register::Mmio`], in tests a simulated register file.
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting and bring-up logging
//! - `critical-section`: Enable the ISR-safe [`SharedEthernet`] wrapper
//!
//! # Example
//!
//! ```ignore
//! use ph_lpc17xx_mac::{DmaAreaDefault, EthConfig, Ethernet, SpinYield};
//! use ph_lpc17xx_mac::register::Mmio;
//!
//! let area = unsafe { DmaAreaDefault::at(0x2007_C000) };
//! let mut eth = Ethernet::new(unsafe { Mmio::steal() }, area, EthConfig::new())?;
//!
//! // `ticks` counts milliseconds, e.g. from SysTick
//! eth.init([0x02, 0x00, 0x00, 0x12, 0x34, 0x56], &mut delay, &ticks, &mut SpinYield)?;
//!
//! let mut frame = [0u8; 1536];
//! loop {
//!     let len = eth.receive_frame(&mut frame);
//!     if len > 0 {
//!         eth.send_frame(&frame[..len]);
//!     }
//! }
//! ```
//!
//! # Memory Requirements
//!
//! With the default geometry (4 RX slots, 2 TX slots, 1536 bytes each) the
//! DMA region takes 9304 bytes, which fits in the 16 KB AHB SRAM bank at
//! `0x2007_C000`.

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod dma;
pub mod driver;
pub mod hal;
pub mod phy;
pub mod register;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use dma::{DmaArea, DmaAreaDefault, MemoryLayout};
pub use driver::config::{Duplex, EthConfig, Speed, State, StationAddress};
pub use driver::error::{
    ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, LinkError,
    LinkResult, Result, ResultCode,
};
pub use driver::ethernet::Ethernet;
pub use hal::{FnYield, SpinYield, TickCounter, TickSource, Yield};
pub use phy::{Lan8720, LinkManager, LinkState, LinkStatus};

#[cfg(feature = "critical-section")]
pub use sync::SharedEthernet;

/// Shared driver constants.
pub mod constants {
    pub use crate::internal::constants::{
        // Timing
        AUTONEG_TIMEOUT_MS,
        // Frame/buffer sizes
        CRC_SIZE,
        // Clocks
        DEFAULT_CORE_CLOCK_HZ,
        // Memory
        DEFAULT_DMA_BASE,
        // Addresses
        DEFAULT_MAC_ADDR,
        DEFAULT_PHY_ADDR,
        // Ring geometry
        DEFAULT_RX_FRAGMENTS,
        DEFAULT_TX_FRAGMENTS,
        ETH_HEADER_SIZE,
        FRAGMENT_SIZE,
        LINK_TIMEOUT_MS,
        MAC_ADDR_LEN,
        MAC_RESET_DELAY_MS,
        MAX_FRAGMENT_SIZE,
        MAX_FRAME_LEN,
        MDC_MAX_FREQ_HZ,
        MII_BUSY_POLLS,
        PHY_RESET_SETTLE_MS,
    };
}

// =============================================================================
// Macro Helpers
// =============================================================================

/// Declare a static, ISR-safe driver slot on the real registers.
///
/// Expands to a `SharedEthernet<'static, Mmio, ..>` static, empty until a
/// driver is installed.
///
/// # Examples
///
/// ```ignore
/// ph_lpc17xx_mac::ethernet_static!(ETH);
///
/// ETH.install(eth);
/// ETH.with(|eth| eth.can_send());
/// ```
#[cfg(feature = "critical-section")]
#[macro_export]
macro_rules! ethernet_static {
    ($name:ident) => {
        $crate::ethernet_static!($name, 4, 2, 1536);
    };
    ($name:ident, $rx:expr, $tx:expr, $frag:expr) => {
        static $name: $crate::sync::SharedEthernet<
            'static,
            $crate::register::Mmio,
            $rx,
            $tx,
            $frag,
        > = $crate::sync::SharedEthernet::new();
    };
}

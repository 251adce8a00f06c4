//! Core driver components for the LPC17xx EMAC peripheral.
//!
//! - [`config`] - Configuration types and the builder
//! - [`error`] - Error types, result aliases and numeric result codes
//! - [`bringup`] - The ordered controller bring-up steps
//! - [`ethernet`] - The [`Ethernet`] device context and frame I/O
//!
//! # Example
//!
//! ```ignore
//! use ph_lpc17xx_mac::driver::{EthConfig, Ethernet, ResultCode};
//!
//! let config = EthConfig::new()
//!     .with_sys_clock_hz(100_000_000)
//!     .with_timeouts(3000, 3000);
//! let mut eth = Ethernet::new(regs, area, config)?;
//! let code: ResultCode = eth.init(mac, &mut delay, &TICKS, &mut SpinYield).into();
//! ```

pub mod bringup;
pub mod config;
pub mod error;
pub mod ethernet;
mod io;

pub use config::{Duplex, EthConfig, Speed, State, StationAddress};
pub use error::{
    ConfigError, ConfigResult, DmaError, DmaResult, Error, IoError, IoResult, LinkError,
    LinkResult, Result, ResultCode,
};
pub use ethernet::Ethernet;

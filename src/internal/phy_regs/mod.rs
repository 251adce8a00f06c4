//! PHY Register Definitions
//!
//! This module contains register definitions for PHY devices accessed over
//! the MII management bus. These are distinct from the LPC17xx memory-mapped
//! peripheral registers in [`register`](crate::register).
//!
//! # Module Organization
//!
//! - [`standard`] - IEEE 802.3 Clause 22 standard PHY registers (0-15)
//! - [`lan8720`] - LAN8720 vendor-specific registers (16-31)

pub mod lan8720;
pub mod standard;

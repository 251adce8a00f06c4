//! Internal Implementation Details
//!
//! # Contents
//!
//! - [`constants`]: Defaults and hardware limits
//! - [`phy_regs`]: IEEE 802.3 and LAN8720 PHY register definitions
//!
//! Items here are `pub(crate)`; the public subset of the constants is
//! re-exported from the crate root.

pub(crate) mod constants;
pub(crate) mod phy_regs;

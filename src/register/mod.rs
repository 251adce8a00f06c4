//! Register interface for the LPC17xx EMAC and the system blocks it needs.
//!
//! Every location the driver touches is named by a [`Reg`] variant. Access
//! goes through the [`RegisterAccess`] trait so the bring-up sequence, the
//! MII management bus and the descriptor rings are written once and run both
//! against silicon ([`Mmio`]) and against the register-file fake used by the
//! unit tests.
//!
//! Bit layouts live in [`emac`] and [`system`].

pub mod emac;
pub mod system;

use emac::EMAC_BASE;
use system::{PINCON_BASE, SC_BASE};

// =============================================================================
// Raw Volatile Access
// =============================================================================

/// Read a 32-bit register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn read_reg(addr: usize) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn write_reg(addr: usize, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

// =============================================================================
// Register Map
// =============================================================================

/// Declares [`Reg`] together with its absolute address table.
macro_rules! register_map {
    ($( $(#[$doc:meta])* $name:ident = $base:ident + $offset:literal, )*) => {
        /// A named register location used by the driver.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub enum Reg {
            $( $(#[$doc])* $name, )*
        }

        impl Reg {
            /// Every register in the map, in address-table order
            pub const ALL: &'static [Reg] = &[$( Reg::$name, )*];

            /// Absolute bus address of the register
            #[inline(always)]
            #[must_use]
            pub const fn address(self) -> usize {
                match self {
                    $( Reg::$name => $base + $offset, )*
                }
            }
        }
    };
}

register_map! {
    /// Power control for peripherals
    Pconp = SC_BASE + 0x0C4,
    /// Pin function select, P1.0 - P1.15
    Pinsel2 = PINCON_BASE + 0x008,
    /// Pin function select, P1.16 - P1.31
    Pinsel3 = PINCON_BASE + 0x00C,

    /// MAC configuration register 1
    Mac1 = EMAC_BASE + 0x000,
    /// MAC configuration register 2
    Mac2 = EMAC_BASE + 0x004,
    /// Back-to-back inter-packet gap
    Ipgt = EMAC_BASE + 0x008,
    /// Non back-to-back inter-packet gap
    Ipgr = EMAC_BASE + 0x00C,
    /// Collision window / retry
    Clrt = EMAC_BASE + 0x010,
    /// Maximum frame length
    Maxf = EMAC_BASE + 0x014,
    /// PHY support (RMII speed)
    Supp = EMAC_BASE + 0x018,
    /// Test register
    Test = EMAC_BASE + 0x01C,
    /// MII management configuration
    Mcfg = EMAC_BASE + 0x020,
    /// MII management command
    Mcmd = EMAC_BASE + 0x024,
    /// MII management address
    Madr = EMAC_BASE + 0x028,
    /// MII management write data
    Mwtd = EMAC_BASE + 0x02C,
    /// MII management read data
    Mrdd = EMAC_BASE + 0x030,
    /// MII management indicators
    Mind = EMAC_BASE + 0x034,
    /// Station address 0
    Sa0 = EMAC_BASE + 0x040,
    /// Station address 1
    Sa1 = EMAC_BASE + 0x044,
    /// Station address 2
    Sa2 = EMAC_BASE + 0x048,

    /// Command register
    Command = EMAC_BASE + 0x100,
    /// Status register
    Status = EMAC_BASE + 0x104,
    /// RX descriptor table base
    RxDescriptor = EMAC_BASE + 0x108,
    /// RX status table base
    RxStatus = EMAC_BASE + 0x10C,
    /// Number of RX descriptors minus one
    RxDescriptorNumber = EMAC_BASE + 0x110,
    /// RX produce index (hardware owned)
    RxProduceIndex = EMAC_BASE + 0x114,
    /// RX consume index (software owned)
    RxConsumeIndex = EMAC_BASE + 0x118,
    /// TX descriptor table base
    TxDescriptor = EMAC_BASE + 0x11C,
    /// TX status table base
    TxStatus = EMAC_BASE + 0x120,
    /// Number of TX descriptors minus one
    TxDescriptorNumber = EMAC_BASE + 0x124,
    /// TX produce index (software owned)
    TxProduceIndex = EMAC_BASE + 0x128,
    /// TX consume index (hardware owned)
    TxConsumeIndex = EMAC_BASE + 0x12C,

    /// Receive filter control
    RxFilterCtrl = EMAC_BASE + 0x200,

    /// Interrupt status
    IntStatus = EMAC_BASE + 0xFE0,
    /// Interrupt enable
    IntEnable = EMAC_BASE + 0xFE4,
    /// Interrupt clear
    IntClear = EMAC_BASE + 0xFE8,
    /// Interrupt set
    IntSet = EMAC_BASE + 0xFEC,
    /// Power-down register
    PowerDown = EMAC_BASE + 0xFF4,
}

// =============================================================================
// Access Trait
// =============================================================================

/// Named read/write/masked-update access to the register map.
///
/// Implementors only provide [`read`](Self::read) and
/// [`write`](Self::write). The read-modify-write helpers are built on top
/// and are not atomic.
pub trait RegisterAccess {
    /// Read a register
    fn read(&self, reg: Reg) -> u32;

    /// Write a register
    fn write(&mut self, reg: Reg, value: u32);

    /// Modify a register using a read-modify-write operation
    #[inline]
    fn modify<F>(&mut self, reg: Reg, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(reg);
        self.write(reg, f(value));
    }

    /// Set bits in a register
    #[inline]
    fn set_bits(&mut self, reg: Reg, bits: u32) {
        self.modify(reg, |v| v | bits);
    }

    /// Clear bits in a register
    #[inline]
    fn clear_bits(&mut self, reg: Reg, bits: u32) {
        self.modify(reg, |v| v & !bits);
    }

    /// Replace the bits selected by `mask` with `value`, keeping the rest
    #[inline]
    fn write_field(&mut self, reg: Reg, mask: u32, value: u32) {
        self.modify(reg, |v| (v & !mask) | (value & mask));
    }
}

impl<R: RegisterAccess + ?Sized> RegisterAccess for &mut R {
    #[inline]
    fn read(&self, reg: Reg) -> u32 {
        (**self).read(reg)
    }

    #[inline]
    fn write(&mut self, reg: Reg, value: u32) {
        (**self).write(reg, value);
    }
}

// =============================================================================
// Memory-Mapped Implementation
// =============================================================================

/// Volatile memory-mapped access to the real peripheral registers.
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Take the register blocks.
    ///
    /// # Safety
    ///
    /// Only one `Mmio` may drive the EMAC at a time, and the caller must be
    /// running on an LPC175x/6x where the addresses in [`Reg`] are valid.
    #[must_use]
    pub const unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

impl RegisterAccess for Mmio {
    #[inline(always)]
    fn read(&self, reg: Reg) -> u32 {
        // SAFETY: every Reg address is a valid, aligned peripheral register
        unsafe { read_reg(reg.address()) }
    }

    #[inline(always)]
    fn write(&mut self, reg: Reg, value: u32) {
        // SAFETY: every Reg address is a valid, aligned peripheral register
        unsafe { write_reg(reg.address(), value) }
    }
}

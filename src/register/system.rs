//! System control and pin-connect definitions used by the Ethernet bring-up.
//!
//! Only the power gate for the EMAC and the two PINSEL registers that route
//! the RMII and MII management pins are covered here.
//!
//! | Pin   | Function    | PINSEL field |
//! |-------|-------------|--------------|
//! | P1.0  | ENET_TXD0   | PINSEL2[1:0]   |
//! | P1.1  | ENET_TXD1   | PINSEL2[3:2]   |
//! | P1.4  | ENET_TX_EN  | PINSEL2[9:8]   |
//! | P1.8  | ENET_CRS    | PINSEL2[17:16] |
//! | P1.9  | ENET_RXD0   | PINSEL2[19:18] |
//! | P1.10 | ENET_RXD1   | PINSEL2[21:20] |
//! | P1.14 | ENET_RX_ER  | PINSEL2[29:28] |
//! | P1.15 | ENET_REF_CLK| PINSEL2[31:30] |
//! | P1.16 | ENET_MDC    | PINSEL3[1:0]   |
//! | P1.17 | ENET_MDIO   | PINSEL3[3:2]   |

/// System control block base address
pub const SC_BASE: usize = 0x400F_C000;

/// Pin connect block base address
pub const PINCON_BASE: usize = 0x4002_C000;

/// Power Control for Peripherals register (PCONP)
pub mod pconp {
    /// Ethernet block power/clock control
    pub const PCENET: u32 = 1 << 30;
}

/// Two-bit function-select field for port 1 pin `pin` within its PINSEL register.
const fn pin_field(pin: u32, function: u32) -> u32 {
    function << ((pin % 16) * 2)
}

/// Function-select bits for every pin in `pins`.
const fn pins_field(pins: &[u32], function: u32) -> u32 {
    let mut value = 0;
    let mut i = 0;
    while i < pins.len() {
        value |= pin_field(pins[i], function);
        i += 1;
    }
    value
}

/// Pin function select register 2 (P1.0 - P1.15)
pub mod pinsel2 {
    use super::pins_field;

    /// Port 1 pins routed through PINSEL2
    pub const ETHERNET_PINS: [u32; 8] = [0, 1, 4, 8, 9, 10, 14, 15];

    /// Function-select bits owned by the Ethernet pins
    pub const MASK: u32 = pins_field(&ETHERNET_PINS, 0b11);

    /// Alternate function 01 (Ethernet) on every Ethernet pin
    pub const ETHERNET: u32 = pins_field(&ETHERNET_PINS, 0b01);
}

/// Pin function select register 3 (P1.16 - P1.31)
pub mod pinsel3 {
    use super::pins_field;

    /// Port 1 pins routed through PINSEL3 (MDC, MDIO)
    pub const ETHERNET_PINS: [u32; 2] = [16, 17];

    /// Function-select bits owned by MDC and MDIO
    pub const MASK: u32 = pins_field(&ETHERNET_PINS, 0b11);

    /// Alternate function 01 (ENET_MDC, ENET_MDIO)
    pub const ETHERNET: u32 = pins_field(&ETHERNET_PINS, 0b01);
}

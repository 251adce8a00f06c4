//! Controller bring-up steps.
//!
//! Each step is a free function over [`RegisterAccess`] so the sequence in
//! [`Ethernet::init`](super::ethernet::Ethernet::init) reads top to bottom in
//! hardware order. The order is significant: the MII management block can
//! only be configured once MAC1 has left soft reset, and the datapaths must
//! stay disabled until both rings are armed.

use embedded_hal::delay::DelayNs;

use super::config::{Duplex, EthConfig, Speed, StationAddress};
use crate::phy::LinkStatus;
use crate::register::emac::{clrt, command, int, ipgr, ipgt, mac1, mac2, supp};
use crate::register::system::{pconp, pinsel2, pinsel3};
use crate::register::{Reg, RegisterAccess};

/// Power the EMAC block
pub fn power_on<R: RegisterAccess>(regs: &mut R) {
    regs.set_bits(Reg::Pconp, pconp::PCENET);
}

/// Route the RMII and management pins to the EMAC
pub fn route_pins<R: RegisterAccess>(regs: &mut R) {
    regs.write_field(Reg::Pinsel2, pinsel2::MASK, pinsel2::ETHERNET);
    regs.write_field(Reg::Pinsel3, pinsel3::MASK, pinsel3::ETHERNET);
}

/// Assert every MAC and host-side reset, wait, then release the MAC and
/// select RMII.
///
/// The datapath resets in Command also zero the four ring index registers.
pub fn reset<R: RegisterAccess, D: DelayNs>(regs: &mut R, delay: &mut D, config: &EthConfig) {
    regs.write(Reg::Mac1, mac1::RESET_ALL);
    regs.write(Reg::Command, command::RESET_ALL);
    delay.delay_ms(config.mac_reset_delay_ms);

    let mac1 = if config.pass_all_frames {
        mac1::PASS_ALL_FRAMES
    } else {
        0
    };
    regs.write(Reg::Mac1, mac1);
    regs.write_field(Reg::Command, command::FIELD_MASK, command::RMII);
}

/// Frame check, padding, inter-packet gap, retry and frame length defaults
pub fn configure_mac<R: RegisterAccess>(regs: &mut R, config: &EthConfig) {
    regs.write(Reg::Mac2, mac2::DEFAULT);
    regs.write(Reg::Ipgr, ipgr::DEFAULT);
    regs.write(Reg::Clrt, clrt::DEFAULT);
    regs.write(Reg::Maxf, config.max_frame_len as u32);
}

/// Disable both datapaths; optionally bypass the receive filter
pub fn disable_datapaths<R: RegisterAccess>(regs: &mut R, config: &EthConfig) {
    regs.clear_bits(Reg::Command, command::DATAPATHS);
    if config.pass_rx_filter {
        regs.set_bits(Reg::Command, command::PASS_RX_FILTER);
    }
}

/// Match the MAC duplex and RMII speed to what the PHY negotiated
pub fn apply_link<R: RegisterAccess>(regs: &mut R, status: LinkStatus) {
    match status.duplex {
        Duplex::Full => {
            regs.set_bits(Reg::Mac2, mac2::FULL_DUPLEX);
            regs.write_field(Reg::Ipgt, ipgt::MASK, ipgt::FULL_DUPLEX);
            regs.set_bits(Reg::Command, command::FULL_DUPLEX);
        }
        Duplex::Half => {
            regs.clear_bits(Reg::Mac2, mac2::FULL_DUPLEX);
            regs.write_field(Reg::Ipgt, ipgt::MASK, ipgt::HALF_DUPLEX);
            regs.clear_bits(Reg::Command, command::FULL_DUPLEX);
        }
    }

    match status.speed {
        Speed::Mbps100 => regs.set_bits(Reg::Supp, supp::SPEED_100),
        Speed::Mbps10 => regs.clear_bits(Reg::Supp, supp::SPEED_100),
    }
}

/// Program SA0..SA2
pub fn program_station_address<R: RegisterAccess>(regs: &mut R, station: &StationAddress) {
    let [sa0, sa1, sa2] = station.register_values();
    regs.write(Reg::Sa0, sa0);
    regs.write(Reg::Sa1, sa1);
    regs.write(Reg::Sa2, sa2);
}

/// Arm the receive filter and interrupt mask, and drop anything pending
pub fn arm_filter_and_interrupts<R: RegisterAccess>(regs: &mut R, config: &EthConfig) {
    regs.write(Reg::RxFilterCtrl, config.rx_filter);
    regs.write(Reg::IntEnable, config.interrupt_enable);
    regs.write(Reg::IntClear, int::ALL);
}

/// Start both datapaths and the MAC receiver
pub fn enable_datapaths<R: RegisterAccess>(regs: &mut R) {
    regs.set_bits(Reg::Command, command::DATAPATHS);
    regs.set_bits(Reg::Mac1, mac1::RECEIVE_ENABLE);
}

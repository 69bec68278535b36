// Licensed under the Apache-2.0 license

//! Flattened register map of the fabric CSR block, for the exported SoC
//! description consumed by downstream device-tree and driver generators.

use crate::{HwMutex, Ipi, Mailbox};
use crate::{HW_MUTEX_CSR_OFFSET, IPI_CSR_OFFSET, MAILBOX_CSR_OFFSET};
use hetero_emu_consts::NUM_SMALL_CORES;
use hetero_emu_types::RvAddr;

/// Access of a register as seen from the main complex. `ReadOnly` entries
/// are firmware convention for the opposite direction, not enforced by the
/// fabric.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RegAccess {
    ReadOnly,
    ReadWrite,
    WriteStrobe,
}

#[derive(Debug, Clone)]
pub struct RegDef {
    pub name: String,
    pub offset: RvAddr,
    pub width: u8,
    pub access: RegAccess,
}

fn reg(name: &str, offset: RvAddr, width: u8, access: RegAccess) -> RegDef {
    RegDef {
        name: name.to_string(),
        offset,
        width,
        access,
    }
}

/// Register map of the whole CSR block, offsets relative to the block base.
pub fn fabric_registers() -> Vec<RegDef> {
    let mut regs = vec![
        reg("ipi_status", IPI_CSR_OFFSET + Ipi::ADDR_STATUS, 32, RegAccess::ReadOnly),
        reg("ipi_trigger", IPI_CSR_OFFSET + Ipi::ADDR_TRIGGER, 32, RegAccess::WriteStrobe),
        reg("ipi_clear", IPI_CSR_OFFSET + Ipi::ADDR_CLEAR, 32, RegAccess::WriteStrobe),
        reg("ipi_enable", IPI_CSR_OFFSET + Ipi::ADDR_ENABLE, 32, RegAccess::ReadWrite),
    ];
    for core in 0..NUM_SMALL_CORES {
        let base = MAILBOX_CSR_OFFSET + core as RvAddr * Mailbox::CORE_STRIDE;
        regs.push(reg(
            &format!("mbox_main_to_core{core}_cmd"),
            base + Mailbox::ADDR_CMD,
            32,
            RegAccess::ReadWrite,
        ));
        regs.push(reg(
            &format!("mbox_main_to_core{core}_data"),
            base + Mailbox::ADDR_DATA,
            32,
            RegAccess::ReadWrite,
        ));
        regs.push(reg(
            &format!("mbox_main_to_core{core}_status"),
            base + Mailbox::ADDR_STATUS,
            8,
            RegAccess::ReadOnly,
        ));
        regs.push(reg(
            &format!("mbox_core{core}_to_main_resp"),
            base + Mailbox::ADDR_RESP,
            32,
            RegAccess::ReadOnly,
        ));
        regs.push(reg(
            &format!("mbox_core{core}_to_main_data"),
            base + Mailbox::ADDR_RESP_DATA,
            32,
            RegAccess::ReadOnly,
        ));
        regs.push(reg(
            &format!("mbox_core{core}_to_main_ctrl"),
            base + Mailbox::ADDR_CTRL,
            8,
            RegAccess::ReadWrite,
        ));
    }
    regs.push(reg(
        "hw_mutex_request",
        HW_MUTEX_CSR_OFFSET + HwMutex::ADDR_REQUEST,
        16,
        RegAccess::WriteStrobe,
    ));
    regs.push(reg(
        "hw_mutex_status",
        HW_MUTEX_CSR_OFFSET + HwMutex::ADDR_STATUS,
        16,
        RegAccess::ReadOnly,
    ));
    regs.push(reg(
        "hw_mutex_release",
        HW_MUTEX_CSR_OFFSET + HwMutex::ADDR_RELEASE,
        16,
        RegAccess::WriteStrobe,
    ));
    regs
}

/*++

Licensed under the Apache-2.0 license.

File Name:

    demo.rs

Abstract:

    File contains a mailbox/mutex exercise following the firmware polling
    convention layered on top of the fabric: the main complex posts a
    command and fires an IPI, the auxiliary core polls, answers through its
    response slot and raises its control byte.

--*/

use crate::soc::HeteroSoc;
use anyhow::{bail, Context};
use hetero_emu_cpu::AuxCore;
use hetero_emu_periph::{HwMutex, Ipi, Mailbox, HW_MUTEX_CSR_OFFSET, IPI_CSR_OFFSET, MAILBOX_CSR_OFFSET};
use hetero_emu_types::{RvAddr, RvData, RvSize};

/// Command protocol by firmware convention; nothing here is enforced by
/// the fabric itself.
pub const CMD_PING: RvData = 0x0001;
pub const CMD_STATUS: RvData = 0x0010;
pub const RESP_PONG: RvData = 0x8001;
pub const RESP_STATUS: RvData = 0x8010;
pub const RESP_UNKNOWN: RvData = 0xFFFF;

/// Conventional bring-up value: unmask the status view of both cores'
/// IPI bits. Not a hardware reset value.
const IPI_ENABLE_DEFAULT: RvData = 0x3;

struct CsrMap {
    base: RvAddr,
}

impl CsrMap {
    fn ipi(&self, reg: RvAddr) -> RvAddr {
        self.base + IPI_CSR_OFFSET + reg
    }

    fn mbox(&self, core: usize, reg: RvAddr) -> RvAddr {
        self.base + MAILBOX_CSR_OFFSET + core as RvAddr * Mailbox::CORE_STRIDE + reg
    }

    fn mutex(&self, reg: RvAddr) -> RvAddr {
        self.base + HW_MUTEX_CSR_OFFSET + reg
    }
}

/// One iteration of the auxiliary core's polling loop: consume a pending
/// command if its IPI input is asserted, write the response and raise the
/// control byte.
fn service_core(core: &AuxCore, csr: &CsrMap) -> anyhow::Result<()> {
    if !core.irq().is_asserted() {
        return Ok(());
    }
    let id = core.id();
    let cmd = core.dbus().read(RvSize::Word, csr.mbox(id, Mailbox::ADDR_CMD))?;
    let data = core.dbus().read(RvSize::Word, csr.mbox(id, Mailbox::ADDR_DATA))?;
    log::info!("core {id}: received cmd={cmd:#06x} data={data:#010x}");

    let resp = match cmd {
        CMD_PING => RESP_PONG,
        CMD_STATUS => RESP_STATUS | (id as RvData),
        _ => RESP_UNKNOWN,
    };
    core.dbus()
        .write(RvSize::Word, csr.mbox(id, Mailbox::ADDR_RESP), resp)?;
    core.dbus()
        .write(RvSize::Word, csr.mbox(id, Mailbox::ADDR_RESP_DATA), data)?;
    core.dbus()
        .write(RvSize::Byte, csr.mbox(id, Mailbox::ADDR_CTRL), 1)?;
    // Acknowledge the IPI so the next command re-asserts the line.
    core.dbus()
        .write(RvSize::Word, csr.ipi(Ipi::ADDR_CLEAR), 1 << id)?;
    log::info!("core {id}: sent response {resp:#06x}");
    Ok(())
}

pub fn run(soc: &HeteroSoc) -> anyhow::Result<()> {
    let fabric = soc.fabric.as_ref().context("fabric is not enabled")?;
    let main = soc.main_dbus().context("fabric is not enabled")?;
    let csr = CsrMap {
        base: fabric.offsets().csr_offset,
    };

    main.write(RvSize::Word, csr.ipi(Ipi::ADDR_ENABLE), IPI_ENABLE_DEFAULT)?;

    // Ping both cores through their mailboxes.
    for core in &soc.cores {
        let id = core.id();
        main.write(RvSize::Word, csr.mbox(id, Mailbox::ADDR_CMD), CMD_PING)?;
        main.write(RvSize::Word, csr.mbox(id, Mailbox::ADDR_DATA), 0x1234_5678)?;
        main.write(RvSize::Word, csr.ipi(Ipi::ADDR_TRIGGER), 1 << id)?;

        service_core(core, &csr)?;

        // Main complex polls the control byte before reading the response.
        if main.read(RvSize::Byte, csr.mbox(id, Mailbox::ADDR_CTRL))? == 0 {
            bail!("core {id} never raised its control byte");
        }
        let resp = main.read(RvSize::Word, csr.mbox(id, Mailbox::ADDR_RESP))?;
        if resp != RESP_PONG {
            bail!("core {id} answered {resp:#06x}, expected PONG");
        }
        main.write(RvSize::Byte, csr.mbox(id, Mailbox::ADDR_CTRL), 0)?;
        log::info!("core {id}: PING/PONG complete");
    }

    // Take and drop a hardware mutex around a shared memory update.
    main.write(RvSize::Word, csr.mutex(HwMutex::ADDR_REQUEST), 0x1)?;
    if main.read(RvSize::Word, csr.mutex(HwMutex::ADDR_STATUS))? & 0x1 == 0 {
        bail!("mutex 0 not granted");
    }
    main.write(RvSize::Word, fabric.offsets().shared_mem_offset, 0xc0ff_ee00)?;
    main.write(RvSize::Word, csr.mutex(HwMutex::ADDR_RELEASE), 0x1)?;
    log::info!("mutex exercise complete");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soc::SocArgs;
    use clap::Parser;

    #[test]
    fn test_demo_protocol_round_trip() {
        let dir = std::env::temp_dir();
        let c0 = dir.join("hetero_emu_demo_core0.bin");
        let c1 = dir.join("hetero_emu_demo_core1.bin");
        std::fs::write(&c0, [0x13u8, 0, 0, 0]).unwrap();
        std::fs::write(&c1, [0x13u8, 0, 0, 0]).unwrap();
        let args = SocArgs::parse_from([
            "hetero-emulator",
            "--with-heterogeneous",
            "--core0-image",
            c0.to_str().unwrap(),
            "--core1-image",
            c1.to_str().unwrap(),
        ]);
        let soc = HeteroSoc::from_args(&args).unwrap();
        run(&soc).unwrap();

        // The demo leaves the mutex released and the IPIs acknowledged.
        let fabric = soc.fabric.as_ref().unwrap();
        assert_eq!(fabric.hw_mutex.regs().lock().unwrap().status(), 0);
        assert_eq!(fabric.ipi.regs().lock().unwrap().pending(), 0);
    }

    #[test]
    fn test_demo_requires_enabled_fabric() {
        let args = SocArgs::parse_from(["hetero-emulator"]);
        let soc = HeteroSoc::from_args(&args).unwrap();
        assert!(run(&soc).is_err());
    }
}

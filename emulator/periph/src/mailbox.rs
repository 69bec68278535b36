/*++

Licensed under the Apache-2.0 license.

File Name:

    mailbox.rs

Abstract:

    File contains the per-core mailbox fabric: one bidirectional set of
    single-slot registers for each auxiliary core.

--*/

use hetero_emu_bus::{Bus, BusError, ReadWriteRegister};
use hetero_emu_consts::NUM_SMALL_CORES;
use hetero_emu_types::{RvAddr, RvData, RvSize};
use std::sync::{Arc, Mutex};
use tock_registers::interfaces::{Readable, Writeable};

/// Register slots of one auxiliary core's mailbox.
///
/// Every field is a single-slot register, not a queue: a new write
/// unconditionally overwrites any unread previous value. There is no
/// hardware acknowledgement and no overflow flag; readiness signalling
/// through the status/ctrl bytes is firmware convention only.
pub struct CoreMailbox {
    /// main -> core command slot
    cmd: ReadWriteRegister<u32>,

    /// main -> core data slot
    data: ReadWriteRegister<u32>,

    /// main-readable status byte
    status: ReadWriteRegister<u32>,

    /// core -> main response slot
    resp: ReadWriteRegister<u32>,

    /// core -> main data slot
    resp_data: ReadWriteRegister<u32>,

    /// core-writable control byte
    ctrl: ReadWriteRegister<u32>,
}

impl CoreMailbox {
    fn new() -> Self {
        Self {
            cmd: ReadWriteRegister::new(0),
            data: ReadWriteRegister::new(0),
            status: ReadWriteRegister::new(0),
            resp: ReadWriteRegister::new(0),
            resp_data: ReadWriteRegister::new(0),
            ctrl: ReadWriteRegister::new(0),
        }
    }
}

pub struct MailboxImpl {
    cores: [CoreMailbox; NUM_SMALL_CORES],
}

impl MailboxImpl {
    pub fn new() -> Self {
        Self {
            cores: std::array::from_fn(|_| CoreMailbox::new()),
        }
    }
}

impl Default for MailboxImpl {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to the mailbox fabric; cloned per bus master.
///
/// The fabric enforces no per-master access control: any master able to
/// address the CSR window can write any slot, including slots that by
/// firmware convention belong to the opposite direction. The read-only
/// annotations in the SoC description document that convention; they are
/// not enforced here.
#[derive(Clone)]
pub struct Mailbox {
    regs: Arc<Mutex<MailboxImpl>>,
}

impl Mailbox {
    /// Byte span of one core's six registers.
    pub const CORE_STRIDE: RvAddr = 0x18;

    /// main -> core command slot
    pub const ADDR_CMD: RvAddr = 0x0000_0000;

    /// main -> core data slot
    pub const ADDR_DATA: RvAddr = 0x0000_0004;

    /// main-readable status byte
    pub const ADDR_STATUS: RvAddr = 0x0000_0008;

    /// core -> main response slot
    pub const ADDR_RESP: RvAddr = 0x0000_000c;

    /// core -> main data slot
    pub const ADDR_RESP_DATA: RvAddr = 0x0000_0010;

    /// core-writable control byte
    pub const ADDR_CTRL: RvAddr = 0x0000_0014;

    pub fn new() -> Self {
        Self {
            regs: Arc::new(Mutex::new(MailboxImpl::new())),
        }
    }

    /// Memory map size.
    pub fn mmap_size(&self) -> RvAddr {
        NUM_SMALL_CORES as RvAddr * Self::CORE_STRIDE
    }

    pub fn regs(&self) -> Arc<Mutex<MailboxImpl>> {
        self.regs.clone()
    }

    fn decode(addr: RvAddr) -> Option<(usize, RvAddr)> {
        let core = (addr / Self::CORE_STRIDE) as usize;
        if core >= NUM_SMALL_CORES {
            return None;
        }
        Some((core, addr % Self::CORE_STRIDE))
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for Mailbox {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        let (core, offset) = Mailbox::decode(addr).ok_or(BusError::LoadAccessFault)?;
        let slot = &self.regs.lock().unwrap().cores[core];
        match (size, offset) {
            (RvSize::Word, Mailbox::ADDR_CMD) => Ok(slot.cmd.reg.get()),
            (RvSize::Word, Mailbox::ADDR_DATA) => Ok(slot.data.reg.get()),
            (RvSize::Word | RvSize::Byte, Mailbox::ADDR_STATUS) => Ok(slot.status.reg.get()),
            (RvSize::Word, Mailbox::ADDR_RESP) => Ok(slot.resp.reg.get()),
            (RvSize::Word, Mailbox::ADDR_RESP_DATA) => Ok(slot.resp_data.reg.get()),
            (RvSize::Word | RvSize::Byte, Mailbox::ADDR_CTRL) => Ok(slot.ctrl.reg.get()),
            _ => Err(BusError::LoadAccessFault),
        }
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        let (core, offset) = Mailbox::decode(addr).ok_or(BusError::StoreAccessFault)?;
        let slot = &self.regs.lock().unwrap().cores[core];
        match (size, offset) {
            (RvSize::Word, Mailbox::ADDR_CMD) => slot.cmd.reg.set(val),
            (RvSize::Word, Mailbox::ADDR_DATA) => slot.data.reg.set(val),
            (RvSize::Word | RvSize::Byte, Mailbox::ADDR_STATUS) => {
                slot.status.reg.set(val & 0xff)
            }
            (RvSize::Word, Mailbox::ADDR_RESP) => slot.resp.reg.set(val),
            (RvSize::Word, Mailbox::ADDR_RESP_DATA) => slot.resp_data.reg.set(val),
            (RvSize::Word | RvSize::Byte, Mailbox::ADDR_CTRL) => slot.ctrl.reg.set(val & 0xff),
            _ => Err(BusError::StoreAccessFault)?,
        }
        Ok(())
    }
}

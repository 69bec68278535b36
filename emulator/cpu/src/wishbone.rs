/*++

Licensed under the Apache-2.0 license.

File Name:

    wishbone.rs

Abstract:

    File contains the Wishbone-style master ports through which auxiliary
    cores reach the shared interconnect.

--*/

use hetero_emu_bus::{Bus, BusError};
use hetero_emu_types::{RvAddr, RvData, RvSize};
use std::cell::RefCell;
use std::rc::Rc;

/// Cycle type identifier (CTI) driven alongside a bus cycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CycleType {
    Classic,
    ConstantBurst,
    IncrementingBurst,
    EndOfBurst,
}

/// Burst type extension (BTE); only meaningful for incrementing bursts.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BurstType {
    Linear,
    Wrap4,
    Wrap8,
    Wrap16,
}

/// One Wishbone bus cycle as driven by a master: 30-bit word address,
/// write data, 4-bit byte select, write enable and the burst annotations.
/// The cyc/stb/ack/err handshake collapses to the `Result` of the access.
#[derive(Debug, Clone)]
pub struct WishboneCycle {
    pub adr: RvAddr,
    pub dat_w: RvData,
    pub sel: u8,
    pub we: bool,
    pub cti: CycleType,
    pub bte: BurstType,
}

impl WishboneCycle {
    /// Map the byte-select lanes to a transaction size and byte address.
    /// Unsupported lane patterns terminate the cycle with ERR.
    fn decode(&self) -> Result<(RvSize, RvAddr), BusError> {
        let byte_base = self.adr << 2;
        match self.sel {
            0b1111 => Ok((RvSize::Word, byte_base)),
            0b0011 => Ok((RvSize::HalfWord, byte_base)),
            0b1100 => Ok((RvSize::HalfWord, byte_base + 2)),
            0b0001 => Ok((RvSize::Byte, byte_base)),
            0b0010 => Ok((RvSize::Byte, byte_base + 1)),
            0b0100 => Ok((RvSize::Byte, byte_base + 2)),
            0b1000 => Ok((RvSize::Byte, byte_base + 3)),
            _ => Err(if self.we {
                BusError::StoreAccessFault
            } else {
                BusError::LoadAccessFault
            }),
        }
    }
}

/// The shared interconnect seen by every master. Arbitration among masters
/// is the underlying fabric's concern; this layer only guarantees that each
/// master is enumerated and that all decode goes through one address map.
pub struct Interconnect {
    bus: Rc<RefCell<dyn Bus>>,
    masters: Vec<String>,
}

impl Interconnect {
    pub fn new(bus: Rc<RefCell<dyn Bus>>) -> Self {
        Self {
            bus,
            masters: Vec::new(),
        }
    }

    /// Register a new master port under `name`. Masters are never removed.
    pub fn add_master(&mut self, name: &str) -> WishboneMaster {
        log::debug!("registering bus master {name}");
        self.masters.push(name.to_string());
        WishboneMaster {
            name: name.to_string(),
            bus: self.bus.clone(),
        }
    }

    /// Names of every master registered so far, in attachment order.
    pub fn masters(&self) -> &[String] {
        &self.masters
    }
}

/// An enumerated master port on the shared interconnect.
#[derive(Clone)]
pub struct WishboneMaster {
    name: String,
    bus: Rc<RefCell<dyn Bus>>,
}

impl WishboneMaster {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Drive one full bus cycle and return the read data (writes echo the
    /// written value, matching the DAT_MISO don't-care of a write cycle).
    pub fn cycle(&self, cycle: WishboneCycle) -> Result<RvData, BusError> {
        let (size, addr) = cycle.decode()?;
        let lane_shift = (addr % 4) * 8;
        if cycle.we {
            let val = (cycle.dat_w >> lane_shift) & size.mask();
            self.bus.borrow_mut().write(size, addr, val)?;
            Ok(cycle.dat_w)
        } else {
            self.bus.borrow_mut().read(size, addr)
        }
    }

    /// Classic single read at a byte address.
    pub fn read(&self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        self.bus.borrow_mut().read(size, addr)
    }

    /// Classic single write at a byte address.
    pub fn write(&self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        self.bus.borrow_mut().write(size, addr, val)
    }
}

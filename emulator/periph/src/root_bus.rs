/*++

Licensed under the Apache-2.0 license.

File Name:

    root_bus.rs

Abstract:

    File contains the root Bus implementation for the coordination fabric:
    address decode from the shared interconnect into the CSR blocks, the
    shared memory window and the auxiliary cores' private windows.

--*/

use crate::{HwMutex, Ipi, Mailbox};
use hetero_emu_bus::{Bus, BusError, Ram};
use hetero_emu_consts::{
    FABRIC_CSR_BASE, FABRIC_CSR_SIZE, NUM_SMALL_CORES, SHARED_MEM_BASE, SHARED_MEM_SIZE,
    SMALL_CORE0_MEM_BASE, SMALL_CORE1_MEM_BASE, SMALL_CORE_MEM_SIZE,
};
use hetero_emu_types::{RvAddr, RvData, RvSize};
use std::cell::RefCell;
use std::rc::Rc;

/// CSR block offsets relative to `csr_offset`.
pub const IPI_CSR_OFFSET: RvAddr = 0x00;
pub const MAILBOX_CSR_OFFSET: RvAddr = 0x10;
pub const HW_MUTEX_CSR_OFFSET: RvAddr = 0x40;

#[derive(Debug, Clone)]
pub struct FabricBusOffsets {
    pub csr_offset: u32,
    pub csr_size: u32,
    pub shared_mem_offset: u32,
    pub shared_mem_size: u32,
    pub core_mem_offsets: [u32; NUM_SMALL_CORES],
    pub core_mem_size: u32,
}

impl Default for FabricBusOffsets {
    fn default() -> Self {
        Self {
            csr_offset: FABRIC_CSR_BASE,
            csr_size: FABRIC_CSR_SIZE,
            shared_mem_offset: SHARED_MEM_BASE,
            shared_mem_size: SHARED_MEM_SIZE,
            core_mem_offsets: [SMALL_CORE0_MEM_BASE, SMALL_CORE1_MEM_BASE],
            core_mem_size: SMALL_CORE_MEM_SIZE,
        }
    }
}

/// Root bus of the coordination fabric. Cloned once per bus master; all
/// clones decode into the same register blocks and memory windows.
#[derive(Clone)]
pub struct FabricBus {
    pub ipi: Ipi,
    pub mailbox: Mailbox,
    pub hw_mutex: HwMutex,
    pub shared_mem: Rc<RefCell<Ram>>,
    pub core_mem: [Rc<RefCell<Ram>>; NUM_SMALL_CORES],
    offsets: FabricBusOffsets,
}

impl FabricBus {
    pub fn new(offsets: FabricBusOffsets) -> Self {
        let core_mem =
            std::array::from_fn(|_| Rc::new(RefCell::new(Ram::new(vec![0; offsets.core_mem_size as usize]))));
        Self {
            ipi: Ipi::new(),
            mailbox: Mailbox::new(),
            hw_mutex: HwMutex::new(),
            shared_mem: Rc::new(RefCell::new(Ram::new(vec![
                0;
                offsets.shared_mem_size as usize
            ]))),
            core_mem,
            offsets,
        }
    }

    pub fn offsets(&self) -> &FabricBusOffsets {
        &self.offsets
    }
}

/// Window check in u64 so a base near the top of the address space cannot
/// wrap the end-of-window sum.
fn in_window(addr: RvAddr, base: u32, size: u32) -> bool {
    addr >= base && (addr as u64) < base as u64 + size as u64
}

impl Default for FabricBus {
    fn default() -> Self {
        Self::new(FabricBusOffsets::default())
    }
}

impl Bus for FabricBus {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        if in_window(addr, self.offsets.csr_offset, self.offsets.csr_size) {
            let offset = addr - self.offsets.csr_offset;
            return match offset {
                o if o >= HW_MUTEX_CSR_OFFSET
                    && o < HW_MUTEX_CSR_OFFSET + self.hw_mutex.mmap_size() =>
                {
                    self.hw_mutex.read(size, o - HW_MUTEX_CSR_OFFSET)
                }
                o if o >= MAILBOX_CSR_OFFSET
                    && o < MAILBOX_CSR_OFFSET + self.mailbox.mmap_size() =>
                {
                    self.mailbox.read(size, o - MAILBOX_CSR_OFFSET)
                }
                o if o < IPI_CSR_OFFSET + self.ipi.mmap_size() => {
                    self.ipi.read(size, o - IPI_CSR_OFFSET)
                }
                _ => Err(BusError::LoadAccessFault),
            };
        }
        if in_window(addr, self.offsets.shared_mem_offset, self.offsets.shared_mem_size) {
            return self
                .shared_mem
                .borrow_mut()
                .read(size, addr - self.offsets.shared_mem_offset);
        }
        for (i, base) in self.offsets.core_mem_offsets.iter().enumerate() {
            if in_window(addr, *base, self.offsets.core_mem_size) {
                return self.core_mem[i].borrow_mut().read(size, addr - *base);
            }
        }
        Err(BusError::LoadAccessFault)
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        if in_window(addr, self.offsets.csr_offset, self.offsets.csr_size) {
            let offset = addr - self.offsets.csr_offset;
            return match offset {
                o if o >= HW_MUTEX_CSR_OFFSET
                    && o < HW_MUTEX_CSR_OFFSET + self.hw_mutex.mmap_size() =>
                {
                    self.hw_mutex.write(size, o - HW_MUTEX_CSR_OFFSET, val)
                }
                o if o >= MAILBOX_CSR_OFFSET
                    && o < MAILBOX_CSR_OFFSET + self.mailbox.mmap_size() =>
                {
                    self.mailbox.write(size, o - MAILBOX_CSR_OFFSET, val)
                }
                o if o < IPI_CSR_OFFSET + self.ipi.mmap_size() => {
                    self.ipi.write(size, o - IPI_CSR_OFFSET, val)
                }
                _ => Err(BusError::StoreAccessFault),
            };
        }
        if in_window(addr, self.offsets.shared_mem_offset, self.offsets.shared_mem_size) {
            return self
                .shared_mem
                .borrow_mut()
                .write(size, addr - self.offsets.shared_mem_offset, val);
        }
        for (i, base) in self.offsets.core_mem_offsets.iter().enumerate() {
            if in_window(addr, *base, self.offsets.core_mem_size) {
                return self.core_mem[i].borrow_mut().write(size, addr - *base, val);
            }
        }
        Err(BusError::StoreAccessFault)
    }
}

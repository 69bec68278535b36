/*++

Licensed under the Apache-2.0 license.

File Name:

    hw_mutex.rs

Abstract:

    File contains the bank of 16 hardware mutexes.

--*/

use hetero_emu_bus::{Bus, BusError, ReadOnlyRegister};
use hetero_emu_consts::NUM_MUTEXES;
use hetero_emu_types::{RvAddr, RvData, RvSize};
use std::sync::{Arc, Mutex};
use tock_registers::interfaces::{Readable, Writeable};

const LOCK_MASK: u32 = (1 << NUM_MUTEXES) - 1;

/// Lock state of the mutex bank. Bit i of `locked` is 1 while mutex i is
/// held. No owner identity is tracked: any master that strobes the release
/// bit for index i unlocks it, regardless of who acquired it. That is a
/// known fairness and safety gap of the programming contract, kept as-is
/// because hardening it would change the external register semantics.
pub struct HwMutexImpl {
    // Only request/release strobes update the bank; stores to status are
    // ignored at the bus layer.
    locked: ReadOnlyRegister<u32>,
}

impl HwMutexImpl {
    pub fn new() -> Self {
        Self {
            locked: ReadOnlyRegister::new(0),
        }
    }

    /// Evaluate one strobe cycle. Request and release are independent
    /// same-cycle operations against the state visible at the start of the
    /// cycle (flip-flop semantics): a request acquires only bits that were
    /// unlocked at the cycle start, a release unconditionally clears its
    /// bits, and neither sees the other's same-cycle result. For a bit that
    /// is both requested and released while initially unlocked, the acquire
    /// therefore wins.
    pub fn clock_edge(&mut self, request: Option<RvData>, release: Option<RvData>) {
        let prev = self.locked.reg.get();
        let acquire = request.unwrap_or(0) & !prev;
        let next = (prev & !release.unwrap_or(0)) | acquire;
        self.locked.reg.set(next & LOCK_MASK);
    }

    pub fn status(&self) -> RvData {
        self.locked.reg.get()
    }

    pub fn is_locked(&self, index: usize) -> bool {
        self.locked.reg.get() & (1 << index) != 0
    }
}

impl Default for HwMutexImpl {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to the mutex bank; cloned per bus master.
///
/// The hardware prevents a held lock from being silently re-acquired, but
/// offers no combined test-and-acquire: a master that reads `status` and
/// then strobes `request` races with its peers between the two accesses.
/// The only reliable acquisition protocol is strobe-then-reread.
#[derive(Clone)]
pub struct HwMutex {
    regs: Arc<Mutex<HwMutexImpl>>,
}

impl HwMutex {
    /// Mutex Request Register (write-strobed, per-bit acquire attempt)
    pub const ADDR_REQUEST: RvAddr = 0x0000_0000;

    /// Mutex Status Register (read-only, 1 = locked)
    pub const ADDR_STATUS: RvAddr = 0x0000_0004;

    /// Mutex Release Register (write-strobed, per-bit unconditional release)
    pub const ADDR_RELEASE: RvAddr = 0x0000_0008;

    pub fn new() -> Self {
        Self {
            regs: Arc::new(Mutex::new(HwMutexImpl::new())),
        }
    }

    /// Memory map size.
    pub fn mmap_size(&self) -> RvAddr {
        0xc
    }

    pub fn regs(&self) -> Arc<Mutex<HwMutexImpl>> {
        self.regs.clone()
    }
}

impl Default for HwMutex {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for HwMutex {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        let regs = self.regs.lock().unwrap();
        match (size, addr) {
            (RvSize::Word | RvSize::HalfWord, HwMutex::ADDR_REQUEST) => Ok(0),
            (RvSize::Word | RvSize::HalfWord, HwMutex::ADDR_STATUS) => Ok(regs.status()),
            (RvSize::Word | RvSize::HalfWord, HwMutex::ADDR_RELEASE) => Ok(0),
            _ => Err(BusError::LoadAccessFault),
        }
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        let mut regs = self.regs.lock().unwrap();
        match (size, addr) {
            (RvSize::Word | RvSize::HalfWord, HwMutex::ADDR_REQUEST) => {
                regs.clock_edge(Some(val & LOCK_MASK), None)
            }
            // Stores to the status register are ignored, not faulted.
            (RvSize::Word | RvSize::HalfWord, HwMutex::ADDR_STATUS) => {}
            (RvSize::Word | RvSize::HalfWord, HwMutex::ADDR_RELEASE) => {
                regs.clock_edge(None, Some(val & LOCK_MASK))
            }
            _ => Err(BusError::StoreAccessFault)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_and_release() {
        let mut bank = HwMutex::new();
        bank.write(RvSize::HalfWord, HwMutex::ADDR_REQUEST, 0x0005)
            .unwrap();
        assert_eq!(
            bank.read(RvSize::HalfWord, HwMutex::ADDR_STATUS).unwrap(),
            0x0005
        );
        bank.write(RvSize::HalfWord, HwMutex::ADDR_RELEASE, 0x0001)
            .unwrap();
        assert_eq!(
            bank.read(RvSize::HalfWord, HwMutex::ADDR_STATUS).unwrap(),
            0x0004
        );
    }

    #[test]
    fn test_request_idempotent_on_locked_bit() {
        let mut bank = HwMutex::new();
        bank.write(RvSize::Word, HwMutex::ADDR_REQUEST, 0x0008).unwrap();
        // A second request for a held lock has no effect and no signal;
        // the requester only learns the outcome by re-reading status.
        bank.write(RvSize::Word, HwMutex::ADDR_REQUEST, 0x0008).unwrap();
        assert_eq!(
            bank.read(RvSize::Word, HwMutex::ADDR_STATUS).unwrap(),
            0x0008
        );
    }

    #[test]
    fn test_release_idempotent_on_unlocked_bit() {
        let mut bank = HwMutex::new();
        bank.write(RvSize::Word, HwMutex::ADDR_RELEASE, 0xffff).unwrap();
        assert_eq!(bank.read(RvSize::Word, HwMutex::ADDR_STATUS).unwrap(), 0);
    }

    #[test]
    fn test_release_needs_no_owner() {
        let mut bank = HwMutex::new();
        // One master acquires...
        bank.write(RvSize::Word, HwMutex::ADDR_REQUEST, 0x0002).unwrap();
        // ...and a different master's handle releases it anyway.
        let mut other = bank.clone();
        other
            .write(RvSize::Word, HwMutex::ADDR_RELEASE, 0x0002)
            .unwrap();
        assert_eq!(bank.read(RvSize::Word, HwMutex::ADDR_STATUS).unwrap(), 0);
    }

    #[test]
    fn test_same_cycle_request_and_release_independent() {
        // Mutex 3 initially unlocked; request bit 3 and release bit 3 in
        // the same evaluation cycle. Both operate on the start-of-cycle
        // state, so the acquire wins and the lock ends held.
        let bank = HwMutex::new();
        let regs = bank.regs();
        assert!(!regs.lock().unwrap().is_locked(3));
        regs.lock().unwrap().clock_edge(Some(1 << 3), Some(1 << 3));
        assert!(regs.lock().unwrap().is_locked(3));

        // Same event against an initially held lock: the release clears it
        // and the request, evaluated against the held prior state, has no
        // effect.
        regs.lock().unwrap().clock_edge(Some(1 << 3), Some(1 << 3));
        // Prior state was locked, so this cycle ends unlocked.
        assert!(!regs.lock().unwrap().is_locked(3));
    }

    #[test]
    fn test_bits_above_bank_width_ignored() {
        let mut bank = HwMutex::new();
        bank.write(RvSize::Word, HwMutex::ADDR_REQUEST, 0xffff_0000)
            .unwrap();
        assert_eq!(bank.read(RvSize::Word, HwMutex::ADDR_STATUS).unwrap(), 0);
    }
}

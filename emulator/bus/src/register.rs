// Licensed under the Apache-2.0 license

use tock_registers::registers::InMemoryRegister;
use tock_registers::{RegisterLongName, UIntLike};

/// Register cell writable from the bus; the peripheral owns the storage.
pub struct ReadWriteRegister<T: UIntLike, R: RegisterLongName = ()> {
    pub reg: InMemoryRegister<T, R>,
}

impl<T: UIntLike, R: RegisterLongName> ReadWriteRegister<T, R> {
    pub fn new(value: T) -> Self {
        Self {
            reg: InMemoryRegister::new(value),
        }
    }
}

/// Register cell only the peripheral may update; bus writes are ignored.
pub struct ReadOnlyRegister<T: UIntLike, R: RegisterLongName = ()> {
    pub reg: InMemoryRegister<T, R>,
}

impl<T: UIntLike, R: RegisterLongName> ReadOnlyRegister<T, R> {
    pub fn new(value: T) -> Self {
        Self {
            reg: InMemoryRegister::new(value),
        }
    }
}

/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the coordination fabric peripheral library.

--*/

mod hw_mutex;
mod ipi;
mod mailbox;
mod regmap;
mod root_bus;

pub use hw_mutex::{HwMutex, HwMutexImpl};
pub use ipi::{Ipi, IpiImpl, IpiLine};
pub use mailbox::{Mailbox, MailboxImpl};
pub use regmap::{fabric_registers, RegAccess, RegDef};
pub use root_bus::{
    FabricBus, FabricBusOffsets, HW_MUTEX_CSR_OFFSET, IPI_CSR_OFFSET, MAILBOX_CSR_OFFSET,
};

// Licensed under the Apache-2.0 license

mod bus;
mod error;
mod ram;
mod region;
mod register;

pub use bus::{Bus, BusError};
pub use error::SocError;
pub use ram::Ram;
pub use region::{AccessMode, AddressMap, MemoryRegion};
pub use register::{ReadOnlyRegister, ReadWriteRegister};

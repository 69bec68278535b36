/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the auxiliary core and bus-master library.

--*/

mod core;
mod wishbone;

pub use crate::core::{AuxCore, AuxCoreConfig, AuxCoreKind};
pub use wishbone::{BurstType, CycleType, Interconnect, WishboneCycle, WishboneMaster};

/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Library interface for the heterogeneous SoC fabric emulator.

--*/

pub mod demo;
pub mod soc;
pub mod soc_desc;

pub use soc::{Constant, HeteroSoc, SocArgs};
pub use soc_desc::SocDescription;

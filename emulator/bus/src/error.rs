// Licensed under the Apache-2.0 license

use hetero_emu_types::RvAddr;
use thiserror::Error;

/// Fatal SoC assembly errors. None of these are recoverable: an address
/// collision or a core with no backing implementation leaves the SoC in a
/// state that cannot be decoded or executed correctly.
#[derive(Debug, Error)]
pub enum SocError {
    #[error("region {name} @ {base:#010x} (size {size:#x}) overlaps region {other}")]
    RegionOverlap {
        name: String,
        base: RvAddr,
        size: u32,
        other: String,
    },

    #[error("auxiliary core {id} has no backing implementation image")]
    MissingCoreImage { id: usize },

    #[error("auxiliary core {id} image ({len} bytes) does not fit its {size:#x}-byte window")]
    CoreImageTooLarge { id: usize, len: usize, size: u32 },

    #[error("auxiliary core {id} private window not decoded at {addr:#010x}")]
    CoreWindowNotDecoded { id: usize, addr: RvAddr },
}

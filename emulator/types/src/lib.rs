/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains the primitive types shared by all bus participants.

--*/

/// Address driven onto the shared interconnect.
pub type RvAddr = u32;

/// Data word moved by a single bus transaction.
pub type RvData = u32;

/// Size of a single bus transaction.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RvSize {
    Byte = 1,
    HalfWord = 2,
    Word = 4,
}

impl RvSize {
    /// Mask covering the bits a transaction of this size can move.
    pub fn mask(self) -> RvData {
        match self {
            RvSize::Byte => 0xff,
            RvSize::HalfWord => 0xffff,
            RvSize::Word => 0xffff_ffff,
        }
    }
}

impl From<RvSize> for usize {
    fn from(size: RvSize) -> Self {
        size as usize
    }
}

impl From<RvSize> for u32 {
    fn from(size: RvSize) -> Self {
        size as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mask() {
        assert_eq!(RvSize::Byte.mask(), 0xff);
        assert_eq!(RvSize::HalfWord.mask(), 0xffff);
        assert_eq!(RvSize::Word.mask(), 0xffff_ffff);
    }
}

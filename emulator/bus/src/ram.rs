// Licensed under the Apache-2.0 license

use crate::{Bus, BusError};
use hetero_emu_types::{RvAddr, RvData, RvSize};

/// Byte-addressable RAM backing a memory window (shared memory or an
/// auxiliary core's private window).
pub struct Ram {
    data: Vec<u8>,
}

impl Ram {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl Bus for Ram {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        if addr as usize % usize::from(size) != 0 {
            return Err(BusError::LoadAddrMisaligned);
        }
        let start = addr as usize;
        let end = start + usize::from(size);
        if end > self.data.len() {
            return Err(BusError::LoadAccessFault);
        }
        let mut val: RvData = 0;
        for (i, byte) in self.data[start..end].iter().enumerate() {
            val |= (*byte as RvData) << (i * 8);
        }
        Ok(val)
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        if addr as usize % usize::from(size) != 0 {
            return Err(BusError::StoreAddrMisaligned);
        }
        let start = addr as usize;
        let end = start + usize::from(size);
        if end > self.data.len() {
            return Err(BusError::StoreAccessFault);
        }
        for (i, byte) in self.data[start..end].iter_mut().enumerate() {
            *byte = (val >> (i * 8)) as u8;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_little_endian() {
        let mut ram = Ram::new(vec![0u8; 16]);
        ram.write(RvSize::Word, 4, 0x1234_5678).unwrap();
        assert_eq!(ram.read(RvSize::Word, 4).unwrap(), 0x1234_5678);
        assert_eq!(ram.read(RvSize::Byte, 4).unwrap(), 0x78);
        assert_eq!(ram.read(RvSize::HalfWord, 6).unwrap(), 0x1234);
    }

    #[test]
    fn test_faults() {
        let mut ram = Ram::new(vec![0u8; 8]);
        assert_eq!(
            ram.read(RvSize::Word, 6).err(),
            Some(BusError::LoadAddrMisaligned)
        );
        assert_eq!(
            ram.read(RvSize::Word, 8).err(),
            Some(BusError::LoadAccessFault)
        );
        assert_eq!(
            ram.write(RvSize::HalfWord, 3, 0).err(),
            Some(BusError::StoreAddrMisaligned)
        );
        assert_eq!(
            ram.write(RvSize::Word, 8, 0).err(),
            Some(BusError::StoreAccessFault)
        );
    }
}

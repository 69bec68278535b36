// Licensed under the Apache-2.0 license

use crate::SocError;
use hetero_emu_types::RvAddr;

/// Access mode of a reserved memory window.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
}

/// A reserved, non-overlapping address window on the shared interconnect.
///
/// Regions are created at SoC assembly time and are immutable afterwards.
/// Every window the coordination fabric reserves is non-cacheable: multiple
/// masters must observe each other's writes without stale cache lines.
#[derive(Debug, Clone)]
pub struct MemoryRegion {
    name: String,
    base: RvAddr,
    size: u32,
    mode: AccessMode,
    cached: bool,
}

impl MemoryRegion {
    pub fn new(name: &str, base: RvAddr, size: u32, mode: AccessMode, cached: bool) -> Self {
        Self {
            name: name.to_string(),
            base,
            size,
            mode,
            cached,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> RvAddr {
        self.base
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub fn cached(&self) -> bool {
        self.cached
    }

    /// One past the last address of the window.
    pub fn end(&self) -> u64 {
        self.base as u64 + self.size as u64
    }

    pub fn contains(&self, addr: RvAddr) -> bool {
        addr >= self.base && (addr as u64) < self.end()
    }

    pub fn overlaps(&self, other: &MemoryRegion) -> bool {
        (self.base as u64) < other.end() && (other.base as u64) < self.end()
    }
}

/// Append-only registry of the address windows decoded on the shared bus.
///
/// A reservation that intersects any prior reservation is rejected; there is
/// no way to proceed with colliding address decoding, so the caller is
/// expected to treat the error as fatal for the whole SoC assembly.
#[derive(Default)]
pub struct AddressMap {
    regions: Vec<MemoryRegion>,
}

impl AddressMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&mut self, region: MemoryRegion) -> Result<(), SocError> {
        if let Some(other) = self.regions.iter().find(|r| r.overlaps(&region)) {
            return Err(SocError::RegionOverlap {
                name: region.name().to_string(),
                base: region.base(),
                size: region.size(),
                other: other.name().to_string(),
            });
        }
        log::debug!(
            "reserved region {} @ {:#010x} (size {:#x})",
            region.name(),
            region.base(),
            region.size()
        );
        self.regions.push(region);
        Ok(())
    }

    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    pub fn find(&self, name: &str) -> Option<&MemoryRegion> {
        self.regions.iter().find(|r| r.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(name: &str, base: RvAddr, size: u32) -> MemoryRegion {
        MemoryRegion::new(name, base, size, AccessMode::ReadWrite, false)
    }

    #[test]
    fn test_reserve_disjoint() {
        let mut map = AddressMap::new();
        map.reserve(region("shared_mem", 0x8010_0000, 0x8000)).unwrap();
        map.reserve(region("small_core_0_mem", 0x8020_0000, 0x10_0000))
            .unwrap();
        map.reserve(region("small_core_1_mem", 0x8030_0000, 0x10_0000))
            .unwrap();
        assert_eq!(map.regions().len(), 3);
    }

    #[test]
    fn test_reserve_overlap_rejected() {
        let mut map = AddressMap::new();
        map.reserve(region("shared_mem", 0x8010_0000, 0x8000)).unwrap();
        // Collides with the tail of the shared window.
        let err = map
            .reserve(region("intruder", 0x8010_7ffc, 0x1000))
            .unwrap_err();
        assert!(matches!(err, SocError::RegionOverlap { .. }));
        assert_eq!(map.regions().len(), 1);
    }

    #[test]
    fn test_adjacent_regions_allowed() {
        let mut map = AddressMap::new();
        map.reserve(region("a", 0x8010_0000, 0x8000)).unwrap();
        map.reserve(region("b", 0x8010_8000, 0x8000)).unwrap();
    }

    #[test]
    fn test_contains_and_end() {
        let r = region("a", 0x8010_0000, 0x8000);
        assert!(r.contains(0x8010_0000));
        assert!(r.contains(0x8010_7fff));
        assert!(!r.contains(0x8010_8000));
        assert_eq!(r.end(), 0x8010_8000);
    }
}

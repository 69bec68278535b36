/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains the address-layout constants of the heterogeneous
    coordination fabric. These literal values are part of the external
    contract consumed by downstream device-tree and firmware tooling and
    must be preserved bit-exact.

--*/

/// Number of auxiliary cores attached alongside the main complex.
pub const NUM_SMALL_CORES: usize = 2;

/// Shared memory window, visible to every bus master, never cached.
pub const SHARED_MEM_BASE: u32 = 0x8010_0000;
pub const SHARED_MEM_SIZE: u32 = 0x8000; // 32 KiB

/// Private window of each auxiliary core; doubles as its reset vector.
pub const SMALL_CORE_MEM_SIZE: u32 = 0x0010_0000; // 1 MiB
pub const SMALL_CORE0_MEM_BASE: u32 = 0x8020_0000;
pub const SMALL_CORE1_MEM_BASE: u32 = 0x8030_0000;

/// Fabric CSR block (IPI controller, mailboxes, mutex bank).
pub const FABRIC_CSR_BASE: u32 = 0xf000_2000;
pub const FABRIC_CSR_SIZE: u32 = 0x1000; // 4 KiB

/// Number of independent hardware mutexes in the bank.
pub const NUM_MUTEXES: usize = 16;

/// Width of the inter-processor interrupt vector, regardless of how many
/// sources are actually wired.
pub const IPI_WIDTH: usize = 32;

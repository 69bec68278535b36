/*++

Licensed under the Apache-2.0 license.

File Name:

    soc.rs

Abstract:

    File contains the SoC assembly for the heterogeneous coordination
    fabric: region reservation, register blocks, core attachment and the
    published constants.

--*/

use anyhow::Context;
use clap::Parser;
use clap_num::maybe_hex;
use hetero_emu_bus::{AccessMode, AddressMap, MemoryRegion, SocError};
use hetero_emu_consts::{FABRIC_CSR_BASE, NUM_SMALL_CORES, SHARED_MEM_BASE};
use hetero_emu_cpu::{AuxCore, AuxCoreConfig, AuxCoreKind, Interconnect, WishboneMaster};
use hetero_emu_periph::{FabricBus, FabricBusOffsets};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Clone, Debug, Parser)]
#[command(version, about = "Heterogeneous SoC coordination fabric emulator")]
pub struct SocArgs {
    /// Attach the auxiliary cores and the coordination fabric.
    #[arg(long, default_value_t = false)]
    pub with_heterogeneous: bool,

    /// Backing implementation image for auxiliary core 0 (IO core).
    #[arg(long)]
    pub core0_image: Option<PathBuf>,

    /// Backing implementation image for auxiliary core 1 (RT core).
    #[arg(long)]
    pub core1_image: Option<PathBuf>,

    /// Base address of the shared memory window.
    #[arg(long, value_parser = maybe_hex::<u32>, default_value_t = SHARED_MEM_BASE)]
    pub shared_mem_base: u32,

    /// Base address of the fabric CSR block.
    #[arg(long, value_parser = maybe_hex::<u32>, default_value_t = FABRIC_CSR_BASE)]
    pub csr_base: u32,

    /// Where to write the SoC description JSON (stdout if omitted).
    #[arg(long)]
    pub soc_desc: Option<PathBuf>,

    /// Run the mailbox/mutex exercise after assembly.
    #[arg(long, default_value_t = false)]
    pub demo: bool,
}

/// A published named constant, consumed by downstream device-tree and
/// driver generation.
#[derive(Debug, Clone)]
pub struct Constant {
    pub name: &'static str,
    pub value: u32,
}

/// The assembled SoC. With the fabric enabled it owns the address map, the
/// register blocks, the interconnect and both attached cores; disabled it
/// is an empty shell publishing no fabric constants.
pub struct HeteroSoc {
    pub address_map: AddressMap,
    pub fabric: Option<FabricBus>,
    pub interconnect: Option<Interconnect>,
    pub cores: Vec<AuxCore>,
    pub constants: Vec<Constant>,
    main_dbus: Option<WishboneMaster>,
}

impl HeteroSoc {
    /// Load the core images from disk and assemble.
    pub fn from_args(args: &SocArgs) -> anyhow::Result<Self> {
        if !args.with_heterogeneous {
            return Ok(Self::disabled());
        }
        let core0_image = read_image(args.core0_image.as_ref(), 0)?;
        let core1_image = read_image(args.core1_image.as_ref(), 1)?;
        Self::assemble(args, core0_image, core1_image).map_err(Into::into)
    }

    fn disabled() -> Self {
        Self {
            address_map: AddressMap::new(),
            fabric: None,
            interconnect: None,
            cores: Vec::new(),
            constants: Vec::new(),
            main_dbus: None,
        }
    }

    /// Assembly order matters: every fabric window is reserved before any
    /// core attaches, so a core's private window is guaranteed unique at
    /// instantiation time.
    fn assemble(
        args: &SocArgs,
        core0_image: Vec<u8>,
        core1_image: Vec<u8>,
    ) -> Result<Self, SocError> {
        log::info!("assembling heterogeneous fabric: {NUM_SMALL_CORES} auxiliary cores");

        let offsets = FabricBusOffsets {
            csr_offset: args.csr_base,
            shared_mem_offset: args.shared_mem_base,
            ..FabricBusOffsets::default()
        };

        let mut address_map = AddressMap::new();
        address_map.reserve(MemoryRegion::new(
            "fabric_csr",
            offsets.csr_offset,
            offsets.csr_size,
            AccessMode::ReadWrite,
            false,
        ))?;
        address_map.reserve(MemoryRegion::new(
            "shared_mem",
            offsets.shared_mem_offset,
            offsets.shared_mem_size,
            AccessMode::ReadWrite,
            false,
        ))?;
        for (i, base) in offsets.core_mem_offsets.iter().enumerate() {
            address_map.reserve(MemoryRegion::new(
                &format!("small_core_{i}_mem"),
                *base,
                offsets.core_mem_size,
                AccessMode::ReadWrite,
                false,
            ))?;
        }

        let fabric = FabricBus::new(offsets.clone());
        let mut interconnect = Interconnect::new(Rc::new(RefCell::new(fabric.clone())));
        interconnect.add_master("main_complex_ibus");
        let main_dbus = interconnect.add_master("main_complex_dbus");

        let mut cores = Vec::with_capacity(NUM_SMALL_CORES);
        for (id, (kind, image)) in [
            (AuxCoreKind::IoCore, core0_image),
            (AuxCoreKind::RtCore, core1_image),
        ]
        .into_iter()
        .enumerate()
        {
            cores.push(AuxCore::attach(
                AuxCoreConfig {
                    id,
                    kind,
                    base: offsets.core_mem_offsets[id],
                    image,
                },
                &mut interconnect,
                offsets.core_mem_size,
                fabric.ipi.irq_line(id),
            )?);
        }

        let constants = vec![
            Constant {
                name: "HETEROGENEOUS_ENABLED",
                value: 1,
            },
            Constant {
                name: "NUM_SMALL_CORES",
                value: NUM_SMALL_CORES as u32,
            },
            Constant {
                name: "SHARED_MEM_BASE",
                value: offsets.shared_mem_offset,
            },
            Constant {
                name: "SHARED_MEM_SIZE",
                value: offsets.shared_mem_size,
            },
        ];

        Ok(Self {
            address_map,
            fabric: Some(fabric),
            interconnect: Some(interconnect),
            cores,
            constants,
            main_dbus: Some(main_dbus),
        })
    }

    pub fn enabled(&self) -> bool {
        self.fabric.is_some()
    }

    /// Data port of the main complex.
    pub fn main_dbus(&self) -> Option<&WishboneMaster> {
        self.main_dbus.as_ref()
    }
}

fn read_image(path: Option<&PathBuf>, id: usize) -> anyhow::Result<Vec<u8>> {
    let path = path.ok_or(SocError::MissingCoreImage { id })?;
    let image = std::fs::read(path)
        .with_context(|| format!("reading core {id} image {}", path.display()))?;
    if image.is_empty() {
        return Err(SocError::MissingCoreImage { id }.into());
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hetero_emu_consts::{SMALL_CORE0_MEM_BASE, SMALL_CORE1_MEM_BASE};

    fn args() -> SocArgs {
        SocArgs {
            with_heterogeneous: true,
            core0_image: None,
            core1_image: None,
            shared_mem_base: SHARED_MEM_BASE,
            csr_base: FABRIC_CSR_BASE,
            soc_desc: None,
            demo: false,
        }
    }

    fn stub_image() -> Vec<u8> {
        vec![0x13, 0x00, 0x00, 0x00]
    }

    #[test]
    fn test_assembly_reserves_all_windows() {
        let soc = HeteroSoc::assemble(&args(), stub_image(), stub_image()).unwrap();
        let names: Vec<_> = soc
            .address_map
            .regions()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(
            names,
            ["fabric_csr", "shared_mem", "small_core_0_mem", "small_core_1_mem"]
        );
        // Every fabric window must be non-cacheable.
        assert!(soc.address_map.regions().iter().all(|r| !r.cached()));
    }

    #[test]
    fn test_published_constants_bit_exact() {
        let soc = HeteroSoc::assemble(&args(), stub_image(), stub_image()).unwrap();
        let find = |name: &str| {
            soc.constants
                .iter()
                .find(|c| c.name == name)
                .unwrap()
                .value
        };
        assert_eq!(find("HETEROGENEOUS_ENABLED"), 1);
        assert_eq!(find("NUM_SMALL_CORES"), 2);
        assert_eq!(find("SHARED_MEM_BASE"), 0x8010_0000);
        assert_eq!(find("SHARED_MEM_SIZE"), 0x8000);
    }

    #[test]
    fn test_master_enumeration_order() {
        let soc = HeteroSoc::assemble(&args(), stub_image(), stub_image()).unwrap();
        assert_eq!(
            soc.interconnect.unwrap().masters(),
            &[
                "main_complex_ibus".to_string(),
                "main_complex_dbus".to_string(),
                "small_core_0_ibus".to_string(),
                "small_core_0_dbus".to_string(),
                "small_core_1_ibus".to_string(),
                "small_core_1_dbus".to_string(),
            ]
        );
    }

    #[test]
    fn test_colliding_shared_window_fails_assembly() {
        let mut a = args();
        // Put the shared window on top of core 0's private window.
        a.shared_mem_base = SMALL_CORE0_MEM_BASE;
        assert!(matches!(
            HeteroSoc::assemble(&a, stub_image(), stub_image()),
            Err(SocError::RegionOverlap { .. })
        ));
    }

    #[test]
    fn test_disabled_soc_publishes_nothing() {
        let soc = HeteroSoc::disabled();
        assert!(!soc.enabled());
        assert!(soc.constants.is_empty());
        assert!(soc.address_map.regions().is_empty());
    }

    #[test]
    fn test_reset_vectors_match_private_windows() {
        let soc = HeteroSoc::assemble(&args(), stub_image(), stub_image()).unwrap();
        assert_eq!(soc.cores[0].reset_vector(), SMALL_CORE0_MEM_BASE);
        assert_eq!(soc.cores[1].reset_vector(), SMALL_CORE1_MEM_BASE);
    }
}

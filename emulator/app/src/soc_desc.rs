/*++

Licensed under the Apache-2.0 license.

File Name:

    soc_desc.rs

Abstract:

    File contains the exported SoC description: published constants,
    reserved memory regions and the flattened fabric register map. This is
    the artifact downstream device-tree and driver generators consume.

--*/

use crate::soc::HeteroSoc;
use hetero_emu_bus::AccessMode;
use hetero_emu_periph::{fabric_registers, RegAccess};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SocDescription {
    pub constants: Vec<ConstantDesc>,
    pub memory_regions: Vec<RegionDesc>,
    pub csr_registers: Vec<CsrRegisterDesc>,
    pub bus_masters: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ConstantDesc {
    pub name: String,
    pub value: u32,
}

#[derive(Debug, Serialize)]
pub struct RegionDesc {
    pub name: String,
    pub base: u32,
    pub size: u32,
    pub mode: String,
    pub cached: bool,
}

#[derive(Debug, Serialize)]
pub struct CsrRegisterDesc {
    pub name: String,
    pub addr: u32,
    pub width: u8,
    pub access: String,
}

impl SocDescription {
    pub fn from_soc(soc: &HeteroSoc) -> Self {
        let constants = soc
            .constants
            .iter()
            .map(|c| ConstantDesc {
                name: c.name.to_string(),
                value: c.value,
            })
            .collect();

        let memory_regions = soc
            .address_map
            .regions()
            .iter()
            .map(|r| RegionDesc {
                name: r.name().to_string(),
                base: r.base(),
                size: r.size(),
                mode: match r.mode() {
                    AccessMode::ReadOnly => "r".to_string(),
                    AccessMode::ReadWrite => "rw".to_string(),
                },
                cached: r.cached(),
            })
            .collect();

        let csr_registers = match &soc.fabric {
            Some(fabric) => fabric_registers()
                .into_iter()
                .map(|r| CsrRegisterDesc {
                    name: r.name,
                    addr: fabric.offsets().csr_offset + r.offset,
                    width: r.width,
                    access: match r.access {
                        RegAccess::ReadOnly => "r".to_string(),
                        RegAccess::ReadWrite => "rw".to_string(),
                        RegAccess::WriteStrobe => "w".to_string(),
                    },
                })
                .collect(),
            None => Vec::new(),
        };

        let bus_masters = soc
            .interconnect
            .as_ref()
            .map(|x| x.masters().to_vec())
            .unwrap_or_default();

        Self {
            constants,
            memory_regions,
            csr_registers,
            bus_masters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soc::SocArgs;
    use clap::Parser;

    fn demo_soc() -> HeteroSoc {
        // Core images come from temp files so from_args exercises the
        // same load path as the CLI.
        let dir = std::env::temp_dir();
        let c0 = dir.join("hetero_emu_test_core0.bin");
        let c1 = dir.join("hetero_emu_test_core1.bin");
        std::fs::write(&c0, [0x13u8, 0, 0, 0]).unwrap();
        std::fs::write(&c1, [0x13u8, 0, 0, 0]).unwrap();
        let args = SocArgs::parse_from([
            "hetero-emulator",
            "--with-heterogeneous",
            "--core0-image",
            c0.to_str().unwrap(),
            "--core1-image",
            c1.to_str().unwrap(),
        ]);
        HeteroSoc::from_args(&args).unwrap()
    }

    #[test]
    fn test_description_round_trips_to_json() {
        let desc = SocDescription::from_soc(&demo_soc());
        let json = serde_json::to_string_pretty(&desc).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["constants"][0]["name"], "HETEROGENEOUS_ENABLED");
        assert_eq!(parsed["constants"][2]["value"], 0x8010_0000u32);
        assert_eq!(parsed["memory_regions"][1]["name"], "shared_mem");
        assert_eq!(parsed["memory_regions"][1]["cached"], false);
        assert_eq!(parsed["csr_registers"][0]["name"], "ipi_status");
        assert_eq!(parsed["csr_registers"][0]["addr"], 0xf000_2000u32);
        assert_eq!(parsed["bus_masters"][0], "main_complex_ibus");
    }

    #[test]
    fn test_disabled_soc_description_is_empty() {
        let args = SocArgs::parse_from(["hetero-emulator"]);
        let soc = HeteroSoc::from_args(&args).unwrap();
        let desc = SocDescription::from_soc(&soc);
        assert!(desc.constants.is_empty());
        assert!(desc.memory_regions.is_empty());
        assert!(desc.csr_registers.is_empty());
        assert!(desc.bus_masters.is_empty());
    }
}

/*++

Licensed under the Apache-2.0 license.

File Name:

    core.rs

Abstract:

    File contains the auxiliary core model: instantiation, bus-master
    wiring and private-window binding.

--*/

use crate::{Interconnect, WishboneMaster};
use hetero_emu_bus::{BusError, SocError};
use hetero_emu_periph::IpiLine;
use hetero_emu_types::{RvAddr, RvData, RvSize};

/// Flavor of an auxiliary core. The IO core services peripheral traffic;
/// the RT core runs fixed-latency real-time tasks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AuxCoreKind {
    IoCore,
    RtCore,
}

impl AuxCoreKind {
    /// Name of the backing core implementation this flavor instantiates.
    pub fn implementation(&self) -> &'static str {
        match self {
            AuxCoreKind::IoCore => "VexRiscv_IOCore",
            AuxCoreKind::RtCore => "VexRiscv_RTCore",
        }
    }
}

/// Configuration of one auxiliary core. `image` is the core's backing
/// implementation and is required: attaching a core with nothing to
/// execute leaves a bus master with undefined fetch behavior, so an absent
/// image is a hard error, never a silent skip.
pub struct AuxCoreConfig {
    pub id: usize,
    pub kind: AuxCoreKind,
    pub base: RvAddr,
    pub image: Vec<u8>,
}

/// An attached auxiliary core: its two enumerated bus masters, its private
/// window base (which doubles as the reset vector) and its dedicated
/// interrupt input. Cores are attached once at SoC assembly and never
/// removed.
pub struct AuxCore {
    id: usize,
    kind: AuxCoreKind,
    reset_vector: RvAddr,
    ibus: WishboneMaster,
    dbus: WishboneMaster,
    irq: IpiLine,
}

impl AuxCore {
    /// Instantiate the core and wire it into the interconnect: register
    /// the instruction and data ports as independent masters, load the
    /// backing image at the reset vector and bind the interrupt line.
    ///
    /// The caller must already have reserved the core's private window;
    /// address-decode uniqueness is guaranteed by that reservation.
    pub fn attach(
        config: AuxCoreConfig,
        interconnect: &mut Interconnect,
        window_size: u32,
        irq: IpiLine,
    ) -> Result<Self, SocError> {
        if config.image.is_empty() {
            return Err(SocError::MissingCoreImage { id: config.id });
        }
        if config.image.len() > window_size as usize {
            return Err(SocError::CoreImageTooLarge {
                id: config.id,
                len: config.image.len(),
                size: window_size,
            });
        }

        let ibus = interconnect.add_master(&format!("small_core_{}_ibus", config.id));
        let dbus = interconnect.add_master(&format!("small_core_{}_dbus", config.id));

        let core = Self {
            id: config.id,
            kind: config.kind,
            reset_vector: config.base,
            ibus,
            dbus,
            irq,
        };
        core.load_image(&config.image)?;
        log::info!(
            "attached {} as core {} @ {:#010x}",
            config.kind.implementation(),
            config.id,
            config.base
        );
        Ok(core)
    }

    /// Copy the backing image into the private window through the data
    /// port, so the load goes through the same decode path the core will
    /// use at runtime. A fault here means the window the configuration
    /// named is not bound on the interconnect.
    fn load_image(&self, image: &[u8]) -> Result<(), SocError> {
        for (i, byte) in image.iter().enumerate() {
            let addr = self.reset_vector + i as RvAddr;
            self.dbus
                .write(RvSize::Byte, addr, *byte as RvData)
                .map_err(|_| SocError::CoreWindowNotDecoded { id: self.id, addr })?;
        }
        Ok(())
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn kind(&self) -> AuxCoreKind {
        self.kind
    }

    pub fn reset_vector(&self) -> RvAddr {
        self.reset_vector
    }

    /// Instruction-side fetch, as the core would issue it out of reset.
    pub fn fetch(&self, addr: RvAddr) -> Result<RvData, BusError> {
        self.ibus.read(RvSize::Word, addr)
    }

    pub fn dbus(&self) -> &WishboneMaster {
        &self.dbus
    }

    /// The core's dedicated interrupt input: raw IPI pending bit `id`,
    /// not gated by the enable mask.
    pub fn irq(&self) -> &IpiLine {
        &self.irq
    }
}

/*++

Licensed under the Apache-2.0 license.

File Name:

    main.rs

Abstract:

    File contains main entrypoint for the heterogeneous SoC fabric
    emulator.

--*/

use anyhow::Context;
use clap::Parser;
use hetero_emulator::{demo, HeteroSoc, SocArgs, SocDescription};

fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()
        .unwrap();

    let args = SocArgs::parse();
    let soc = HeteroSoc::from_args(&args)?;

    if soc.enabled() {
        log::info!(
            "fabric assembled: {} cores, {} bus masters, {} regions",
            soc.cores.len(),
            soc.interconnect.as_ref().map_or(0, |x| x.masters().len()),
            soc.address_map.regions().len()
        );
    } else {
        log::info!("heterogeneous fabric disabled; nothing to attach");
    }

    let desc = SocDescription::from_soc(&soc);
    let json = serde_json::to_string_pretty(&desc)?;
    match &args.soc_desc {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("writing SoC description to {}", path.display()))?;
            log::info!("wrote SoC description to {}", path.display());
        }
        None => println!("{json}"),
    }

    if args.demo {
        demo::run(&soc)?;
    }

    Ok(())
}

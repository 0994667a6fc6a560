//! `harbour-ports list` command

use anyhow::Result;

use crate::cli::ListArgs;
use harbour_ports::PortRegistry;

pub fn execute(args: ListArgs) -> Result<()> {
    let registry = PortRegistry::load_dir(&args.ports_dir)?;

    for port in registry.iter() {
        println!("{:<32} {}", port.name(), port.core_paragraph.version());
    }

    let failures = registry.failures();
    if !failures.is_empty() {
        eprintln!("\n{} port(s) failed to load:", failures.len());
        for failure in failures {
            eprintln!("  {}: {:#}", failure.path.display(), failure.error);
        }
    }

    tracing::info!(
        "loaded {} port(s), {} failed",
        registry.len(),
        failures.len()
    );

    Ok(())
}

mod bootstrap;

use anyhow::Result;
use clap::Parser;
use gpuwho_core::error::GpuWhoError;
use gpuwho_core::settings::Settings;
use gpuwho_data::{engine, normalize, owners, smi};
use gpuwho_ui::table;

fn main() -> Result<()> {
    let settings = Settings::parse();
    bootstrap::setup_logging();

    tracing::debug!("gpuwho v{} starting", env!("CARGO_PKG_VERSION"));

    // Telemetry first, ownership second: the join can only ever miss owners
    // for processes that exited in between, never see owners for processes
    // that were not in the telemetry snapshot.
    let report = smi::query()?;
    let usages = normalize::normalize(&report)?;
    let owners = owners::resolve();
    let joined = engine::join(usages, &owners);

    if settings.verbose {
        println!("{}", table::process_table(&joined));
        return Ok(());
    }

    match engine::aggregate(&joined) {
        Ok(summaries) => println!("{}", table::summary_table(&summaries)),
        // No GPU activity: an empty table, not a failure.
        Err(GpuWhoError::EmptyInput) => {
            tracing::info!("no GPU processes found");
            println!("{}", table::summary_table(&[]));
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

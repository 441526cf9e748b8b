//! `wiregen check`

use crate::target::TargetArgs;
use anyhow::{Context, Result};
use std::process::ExitCode;
use wiregen::Staleness;

pub fn run(target: &TargetArgs) -> Result<ExitCode> {
    let generator = target.generator()?;

    let stale = generator
        .check(&target.dir, &target.types)
        .with_context(|| format!("Failed to check {}", target.dir.display()))?;

    if stale.is_empty() {
        println!("✓ Generated files are up to date");
        return Ok(ExitCode::SUCCESS);
    }

    for file in &stale {
        let reason = match file.staleness {
            Staleness::Missing => "missing",
            Staleness::Outdated => "out of date",
        };
        eprintln!("✗ {} ({}): {reason}", file.path.display(), file.type_name);
    }
    eprintln!("\nRun `wiregen generate` to update {} file(s)", stale.len());

    Ok(ExitCode::FAILURE)
}

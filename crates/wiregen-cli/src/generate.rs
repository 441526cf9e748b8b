//! `wiregen generate`

use crate::target::TargetArgs;
use anyhow::{Context, Result};
use std::process::ExitCode;
use wiregen::WriteOutcome;

pub fn run(target: &TargetArgs, dry_run: bool) -> Result<ExitCode> {
    let generator = target.generator()?;

    if dry_run {
        let planned = generator
            .plan(&target.dir, &target.types)
            .with_context(|| format!("Failed to generate for {}", target.dir.display()))?;
        for file in &planned {
            println!("would write {} ({})", file.path.display(), file.type_name);
        }
        println!("\n{} file(s) planned, nothing written", planned.len());
        return Ok(ExitCode::SUCCESS);
    }

    let results = generator
        .generate(&target.dir, &target.types)
        .with_context(|| format!("Failed to generate for {}", target.dir.display()))?;

    let mut written = 0;
    for (file, outcome) in &results {
        match outcome {
            WriteOutcome::Written => {
                written += 1;
                println!("✓ {} ({})", file.path.display(), file.type_name);
            }
            WriteOutcome::Unchanged => {
                println!("  {} (unchanged)", file.path.display());
            }
        }
    }
    println!("\n{written} of {} file(s) written", results.len());

    Ok(ExitCode::SUCCESS)
}

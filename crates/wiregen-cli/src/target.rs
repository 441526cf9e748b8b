//! Arguments shared by every command

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use wiregen::{Config, Generator};

#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Directory holding the Go sources (default: current directory)
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Configuration file (default: <dir>/wiregen.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Generate only this type; repeatable. Skips role-suffix discovery.
    #[arg(short = 't', long = "type", value_name = "NAME")]
    pub types: Vec<String>,
}

impl TargetArgs {
    /// Configuration for this target
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display())),
            None => Config::discover(&self.dir)
                .with_context(|| format!("Failed to load config from {}", self.dir.display())),
        }
    }

    /// Generator configured for this target
    pub fn generator(&self) -> Result<Generator> {
        let config = self.load_config()?;
        Generator::new(config).context("Failed to load templates")
    }
}

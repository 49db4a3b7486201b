//! `chunkguard config` – show the config path and effective values.

use anyhow::Result;
use chunkguard_core::config::{self, LoaderConfig};

pub fn run_config(cfg: &LoaderConfig) -> Result<()> {
    println!("config: {}", config::config_path()?.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    println!("effective: {:?}", cfg.to_options());
    Ok(())
}

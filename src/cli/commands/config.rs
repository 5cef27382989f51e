//! Config command: print the effective settings.

use anyhow::Result;

use crate::config::Settings;

pub fn run(settings: &Settings) -> Result<()> {
    print!("{}", settings.to_toml()?);
    Ok(())
}

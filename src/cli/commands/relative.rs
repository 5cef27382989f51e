//! Relative command: URL path relative to a project root.

use anyhow::{Context, Result};
use url::Url;

use crate::paths::relative_path;

pub fn run(base: &str, target: &str) -> Result<()> {
    let base = Url::parse(base).with_context(|| format!("Invalid base URL: {base}"))?;
    let target = Url::parse(target).with_context(|| format!("Invalid URL: {target}"))?;

    println!("{}", relative_path(&base, &target));
    Ok(())
}

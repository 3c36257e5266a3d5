//! config command - Print the effective settings

use crate::core::config::Config;
use anyhow::{Context, Result};

/// Print the effective settings as TOML.
///
/// The settings file in use, if any, is named in a leading comment.
pub fn config(config: &Config) -> Result<()> {
    let rendered = config
        .effective_toml()
        .context("failed to render settings")?;

    match config.path() {
        Some(path) => println!("# {}", path.display()),
        None => println!("# defaults (no settings file found)"),
    }
    print!("{}", rendered);
    Ok(())
}

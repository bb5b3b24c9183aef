use anyhow::{bail, Result};

use overscroll_core::AppConfig;

pub fn show(config: &AppConfig) -> Result<()> {
    println!("# {}", AppConfig::config_path().display());
    print!("{}", config.to_toml()?);
    Ok(())
}

pub fn init() -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() {
        bail!("Config file already exists at {}", path.display());
    }

    AppConfig::default().save()?;
    println!("Wrote default configuration to {}", path.display());

    Ok(())
}

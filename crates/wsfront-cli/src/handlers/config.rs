use crate::types::OutputFormat;
use anyhow::{Context, Result};
use std::path::Path;
use wsfront_runtime::FrontendConfig;

pub fn show(path: &Path, format: OutputFormat) -> Result<()> {
    let config = FrontendConfig::load_from(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "path": path.display().to_string(),
                "exists": path.exists(),
                "config": config,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Plain => {
            let source = if path.exists() { "" } else { " (not found, defaults)" };
            println!("# {}{}", path.display(), source);
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    FrontendConfig::default()
        .save_to(path)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

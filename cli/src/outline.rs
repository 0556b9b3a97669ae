use anyhow::{Context, Result};
use std::path::Path;

pub fn run_outline_command(output: Option<&Path>) -> Result<()> {
    let protocol = emtsim_std::trauma_protocol();
    let json = serde_json::json!({
        "name": protocol.name,
        "description": protocol.description,
        "stages": protocol.outline(),
    });
    let rendered = serde_json::to_string_pretty(&json)?;

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write outline to {}", path.display()))?;
            tracing::info!(path = %path.display(), "Outline written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

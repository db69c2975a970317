//! `kush.toml` loading.
//!
//! Only the `[frontend]` table is read; other tables are left to the tools
//! that own them.

use std::path::Path;

use anyhow::Context;
use kush_compiler::FrontendConfig;
use serde::Deserialize;

pub const MANIFEST_FILE: &str = "kush.toml";

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    frontend: FrontendConfig,
}

/// Load the front end options from `explicit`, or from `./kush.toml` when it
/// exists. No file means default options.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<FrontendConfig> {
    let path = match explicit {
        Some(path) => path,
        None => {
            let default = Path::new(MANIFEST_FILE);
            if !default.is_file() {
                return Ok(FrontendConfig::default());
            }
            default
        }
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = parse(&content).with_context(|| format!("invalid {}", path.display()))?;
    tracing::debug!(path = %path.display(), "read configuration");
    Ok(config)
}

pub fn parse(content: &str) -> anyhow::Result<FrontendConfig> {
    let manifest: Manifest = toml::from_str(content)?;
    Ok(manifest.frontend)
}

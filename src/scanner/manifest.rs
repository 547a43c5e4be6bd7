use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Image;

/// Reads a JSON array of images from `path`.
pub fn load_manifest(path: &Path) -> Result<Vec<Image>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let images = parse_manifest(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    tracing::info!(count = images.len(), "Loaded image manifest from {:?}", path);
    Ok(images)
}

pub fn parse_manifest(json: &str) -> Result<Vec<Image>> {
    Ok(serde_json::from_str(json)?)
}

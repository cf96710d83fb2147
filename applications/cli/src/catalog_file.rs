//! Catalog TOML loading
//!
//! ```toml
//! [[tracks]]
//! title = "Moment"
//! artist = "Serge Quadrado"
//! url = "https://cdn.example/moment.mp3"
//! duration = "02:14"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tonearm_core::{Catalog, Track};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tracks: Vec<Track>,
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    parse_catalog(&contents).with_context(|| format!("Invalid catalog {}", path.display()))
}

pub fn parse_catalog(contents: &str) -> Result<Catalog> {
    let file: CatalogFile = toml::from_str(contents)?;
    Ok(Catalog::new(file.tracks)?)
}

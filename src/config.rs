//! Runtime configuration

use crate::error::Result;
use crate::palette::PaletteTable;
use std::fs;
use std::path::Path;

/// Settings resolved from CLI flags and the environment
#[derive(Debug, Default)]
pub struct Config {
    /// Substitution table used by `downsample`
    pub table: PaletteTable,
}

impl Config {
    /// Load config, reading the palette table from `table_path` if given
    pub fn load(table_path: Option<&Path>) -> Result<Self> {
        let Some(path) = table_path else {
            log::debug!("using built-in palette table");
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(path)?;
        let table = PaletteTable::from_toml_str(&contents)?;
        log::info!(
            "loaded {} palette mapping(s) from {}",
            table.mappings().len(),
            path.display()
        );
        Ok(Self { table })
    }
}

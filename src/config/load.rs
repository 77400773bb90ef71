use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;

use super::types::SheetcutConfig;

/// Settings read from a `.sheetcut` file.
///
/// Relative entries (sheets, output directory, data file) are anchored at
/// `base_dir`, the directory holding the file, not at the working directory.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: SheetcutConfig,
    pub base_dir: PathBuf,
}

impl LoadedConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let config = serde_json::from_str::<SheetcutConfig>(&text)
            .with_context(|| format!("{} is not a valid sheetcut config", path.display()))?;

        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self { config, base_dir })
    }

    /// Sheets named by the `input` list, in list order.
    ///
    /// Wildcard entries expand to their sorted matches; a wildcard with no
    /// matches is reported and contributes nothing.
    pub fn resolve_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut sheets = Vec::with_capacity(self.config.input.len());
        for entry in &self.config.input {
            if has_wildcards(entry) {
                let matches = self.expand(entry)?;
                if matches.is_empty() {
                    warn!("'{}' matched no sheets", entry);
                }
                sheets.extend(matches);
            } else {
                sheets.push(self.anchored(entry));
            }
        }
        Ok(sheets)
    }

    pub fn resolve_output_dir(&self) -> PathBuf {
        self.anchored(&self.config.output_dir)
    }

    pub fn resolve_data_file(&self) -> Option<PathBuf> {
        self.config.data_file.as_deref().map(|file| self.anchored(file))
    }

    fn anchored(&self, entry: impl AsRef<Path>) -> PathBuf {
        self.base_dir.join(entry)
    }

    fn expand(&self, entry: &str) -> Result<Vec<PathBuf>> {
        let pattern = self.anchored(entry);
        glob::glob(&pattern.to_string_lossy())
            .with_context(|| format!("bad input pattern '{}'", entry))?
            .map(|hit| hit.with_context(|| format!("cannot list matches of '{}'", entry)))
            .collect()
    }
}

fn has_wildcards(entry: &str) -> bool {
    entry.chars().any(|c| matches!(c, '*' | '?' | '['))
}

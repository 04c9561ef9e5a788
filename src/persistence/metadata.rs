use super::files::read_file;
use crate::domain::SortOption;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Session state stored in meta.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    #[serde(default)]
    pub selected_project: Option<String>,
    #[serde(default)]
    pub sort_option: SortOption,
    #[serde(default = "default_ascending")]
    pub sort_ascending: bool,
    #[serde(default)]
    pub show_archived: bool,
}

fn default_ascending() -> bool {
    true
}

impl Default for SessionMetadata {
    fn default() -> Self {
        Self {
            selected_project: None,
            sort_option: SortOption::None,
            sort_ascending: true,
            show_archived: false,
        }
    }
}

/// Load session metadata from meta.json file
pub fn load_metadata<P: AsRef<Path>>(path: P) -> Result<SessionMetadata> {
    let path = path.as_ref();

    // Missing or empty file means a fresh session
    let content = read_file(path)?;
    if content.trim().is_empty() {
        return Ok(SessionMetadata::default());
    }

    let metadata: SessionMetadata = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(metadata)
}

/// Save session metadata to meta.json file
pub fn save_metadata<P: AsRef<Path>>(path: P, metadata: &SessionMetadata) -> Result<()> {
    let json = serde_json::to_string_pretty(metadata)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

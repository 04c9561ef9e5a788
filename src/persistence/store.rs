//! Storage collaborator for projects and tasks.
//!
//! Entries are addressed by logical `/`-separated paths such as
//! `Projects/Website/Tasks/Deploy.json`. A path prefix acts as a folder:
//! deleting it removes everything beneath it.

use super::files::{atomic_write, ensure_dir};
use anyhow::{bail, Context, Result};
#[cfg(test)]
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub trait AssetStore {
    /// Read an entry, `None` if it does not exist
    fn load(&self, path: &str) -> Result<Option<String>>;

    /// Create or overwrite an entry
    fn save(&mut self, path: &str, content: &str) -> Result<()>;

    /// Remove an entry or a whole folder. Missing paths are not an error.
    fn delete(&mut self, path: &str) -> Result<()>;

    /// Every entry at or below `prefix`, sorted by path
    fn list(&self, prefix: &str) -> Result<Vec<String>>;

    fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.load(path)?.is_some())
    }
}

/// True when `path` is `prefix` itself or lies beneath it
#[cfg(test)]
fn is_under(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    prefix.is_empty()
        || path == prefix
        || (path.starts_with(prefix) && path[prefix.len()..].starts_with('/'))
}

/// Store kept entirely in memory
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    failing_saves: Vec<String>,
    failing_deletes: Vec<String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Make every later save of exactly `path` fail
    pub fn fail_saves(&mut self, path: &str) {
        self.failing_saves.push(path.to_string());
    }

    /// Make every later delete of exactly `path` fail
    pub fn fail_deletes(&mut self, path: &str) {
        self.failing_deletes.push(path.to_string());
    }
}

#[cfg(test)]
fn refuse(failing: &[String], path: &str) -> Result<()> {
    if failing.iter().any(|p| p == path) {
        bail!("Write refused: {}", path);
    }
    Ok(())
}

#[cfg(test)]
impl AssetStore for MemoryStore {
    fn load(&self, path: &str) -> Result<Option<String>> {
        Ok(self.entries.get(path).cloned())
    }

    fn save(&mut self, path: &str, content: &str) -> Result<()> {
        refuse(&self.failing_saves, path)?;
        self.entries.insert(path.to_string(), content.to_string());
        Ok(())
    }

    fn delete(&mut self, path: &str) -> Result<()> {
        refuse(&self.failing_deletes, path)?;
        self.entries.retain(|key, _| !is_under(key, path));
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .entries
            .keys()
            .filter(|key| is_under(key, prefix))
            .cloned()
            .collect())
    }
}

/// Store backed by files under a root directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a logical path onto the filesystem, refusing to escape the root
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let mut resolved = self.root.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if segment == "." || segment == ".." {
                bail!("Invalid storage path: {}", path);
            }
            resolved.push(segment);
        }
        Ok(resolved)
    }

    fn collect_files(&self, dir: &Path, logical: &str, out: &mut Vec<String>) -> Result<()> {
        for entry in fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            // Leftover temp files and other hidden entries are not assets
            if name.starts_with('.') {
                continue;
            }

            let child = if logical.is_empty() {
                name
            } else {
                format!("{}/{}", logical, name)
            };
            if entry.file_type()?.is_dir() {
                self.collect_files(&entry.path(), &child, out)?;
            } else {
                out.push(child);
            }
        }
        Ok(())
    }
}

impl AssetStore for FileStore {
    fn load(&self, path: &str) -> Result<Option<String>> {
        let file = self.resolve(path)?;
        if !file.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&file)
            .with_context(|| format!("Failed to read file: {}", file.display()))?;
        Ok(Some(content))
    }

    fn save(&mut self, path: &str, content: &str) -> Result<()> {
        let file = self.resolve(path)?;
        let dir = file
            .parent()
            .context("Storage path has no parent directory")?;
        ensure_dir(dir)?;
        atomic_write(&file, content)
    }

    fn delete(&mut self, path: &str) -> Result<()> {
        let target = self.resolve(path)?;
        if target == self.root {
            bail!("Refusing to delete the storage root");
        }
        if target.is_dir() {
            fs::remove_dir_all(&target)
                .with_context(|| format!("Failed to delete directory: {}", target.display()))?;
        } else if target.exists() {
            fs::remove_file(&target)
                .with_context(|| format!("Failed to delete file: {}", target.display()))?;
        }
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let logical = prefix.trim_matches('/');
        let start = self.resolve(logical)?;
        let mut out = Vec::new();

        if start.is_file() {
            out.push(logical.to_string());
        } else if start.is_dir() {
            self.collect_files(&start, logical, &mut out)?;
        }

        out.sort();
        Ok(out)
    }
}

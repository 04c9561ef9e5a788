use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the data directory, local or in the home directory
pub const BOARD_DIR_NAME: &str = ".taskboard";

/// Get the board directory - checks for local .taskboard first, then falls back to global ~/.taskboard
pub fn get_board_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    if let Some(local_dir) = find_local_board(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(BOARD_DIR_NAME))
}

/// Find local .taskboard directory by walking up the directory tree
fn find_local_board(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let board_dir = current.join(BOARD_DIR_NAME);
        if board_dir.is_dir() {
            return Some(board_dir);
        }

        current = current.parent()?;
    }
}

/// Ensure a directory exists
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(())
}

/// Initialize a local .taskboard directory inside `parent`
pub fn init_local_board(parent: &Path) -> Result<PathBuf> {
    let board_dir = parent.join(BOARD_DIR_NAME);

    if board_dir.exists() {
        anyhow::bail!("Board directory already exists: {}", board_dir.display());
    }

    fs::create_dir_all(&board_dir)
        .with_context(|| format!("Failed to create directory: {}", board_dir.display()))?;

    Ok(board_dir)
}

/// Path to meta.json (selected project and sort settings)
pub fn meta_file(board_dir: &Path) -> PathBuf {
    board_dir.join("meta.json")
}

/// Stage `content` in a temp file beside `path`, then rename it into place
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let parent = path
        .parent()
        .with_context(|| format!("No parent directory for {}", path.display()))?;

    let mut staged = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to stage a write in {}", parent.display()))?;
    staged.write_all(content.as_bytes())?;
    staged.as_file().sync_all()?;
    staged
        .persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}

/// Contents of `path`, or an empty string when it does not exist
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

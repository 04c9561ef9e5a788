use crate::domain::{sort_tasks, Project, SortOption, Task};
use crate::error::BoardError;
use crate::persistence::{ensure_dir, load_metadata, meta_file, save_metadata, FileStore, SessionMetadata};
use crate::repository::{ProjectRepository, TaskRepository};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Main application state: every project on disk plus the session metadata
pub struct AppState {
    pub repo: ProjectRepository<FileStore>,
    pub metadata: SessionMetadata,
    meta_path: PathBuf,
    pub needs_save: bool,
}

impl AppState {
    /// Load all projects under `board_dir` and restore the last session
    pub fn open(board_dir: &Path) -> Result<Self> {
        ensure_dir(board_dir)?;

        let mut repo = ProjectRepository::open(FileStore::new(board_dir))
            .with_context(|| format!("Failed to load projects from {}", board_dir.display()))?;

        log::debug!(
            "loaded {} projects from {}",
            repo.projects().len(),
            repo.store().root().display()
        );

        let meta_path = meta_file(board_dir);
        let metadata = load_metadata(&meta_path)?;

        if let Some(name) = &metadata.selected_project {
            if repo.select(name).is_err() {
                log::warn!("selected project '{}' no longer exists", name);
            }
        }

        Ok(Self {
            repo,
            metadata,
            meta_path,
            needs_save: false,
        })
    }

    pub fn select_project(&mut self, name: &str) -> Result<()> {
        self.repo.select(name)?;
        self.needs_save = true;
        Ok(())
    }

    /// Name of `name` if it exists, else of the selected project
    pub fn project_name(&self, name: Option<&str>) -> Result<String, BoardError> {
        let project = match name {
            Some(name) => self
                .repo
                .get(name)
                .ok_or_else(|| BoardError::ProjectNotFound(name.to_string()))?,
            None => self.repo.selected().ok_or(BoardError::NoProjectSelected)?,
        };
        Ok(project.name.clone())
    }

    /// Task operations for `name`, or for the selected project
    pub fn tasks(&mut self, name: Option<&str>) -> Result<TaskRepository<'_, FileStore>, BoardError> {
        match name {
            Some(name) => self.repo.tasks(name),
            None => self.repo.selected_tasks(),
        }
    }

    /// Remember a new sort order. `None` keeps the stored value.
    pub fn set_sort(&mut self, option: Option<SortOption>, ascending: Option<bool>) {
        if let Some(option) = option {
            if option != self.metadata.sort_option {
                self.metadata.sort_option = option;
                self.needs_save = true;
                // A new sort without a direction starts ascending
                if ascending.is_none() {
                    self.metadata.sort_ascending = true;
                }
            }
        }
        if let Some(ascending) = ascending {
            if ascending != self.metadata.sort_ascending {
                self.metadata.sort_ascending = ascending;
                self.needs_save = true;
            }
        }
    }

    /// Tasks to list for `project` under the current sort order
    pub fn visible_tasks<'p>(&self, project: &'p Project, include_archived: bool) -> Vec<&'p Task> {
        let tasks: Vec<&Task> = if include_archived || self.metadata.show_archived {
            project.tasks.iter().collect()
        } else {
            project.active_tasks().collect()
        };
        sort_tasks(tasks, self.metadata.sort_option, self.metadata.sort_ascending)
    }

    /// Write meta.json if anything changed, including the selected project
    pub fn save(&mut self) -> Result<()> {
        let selected = self.repo.selected().map(|p| p.name.clone());
        if selected != self.metadata.selected_project {
            self.metadata.selected_project = selected;
            self.needs_save = true;
        }

        if self.needs_save {
            save_metadata(&self.meta_path, &self.metadata)?;
            self.needs_save = false;
            log::debug!("saved session metadata to {}", self.meta_path.display());
        }
        Ok(())
    }
}

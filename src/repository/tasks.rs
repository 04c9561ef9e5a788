use super::{write_project, write_task};
use crate::domain::{due, Project, Task, TaskFields};
use crate::error::{BoardError, BoardResult};
use crate::persistence::layout::{task_folder, unique_path};
use crate::persistence::AssetStore;
use chrono::NaiveDate;
use uuid::Uuid;

/// Task operations scoped to one project.
///
/// Borrowed from [`ProjectRepository::tasks`](super::ProjectRepository::tasks);
/// every mutation is persisted before the call returns.
pub struct TaskRepository<'a, S: AssetStore> {
    project: &'a mut Project,
    store: &'a mut S,
    today: NaiveDate,
}

impl<'a, S: AssetStore> TaskRepository<'a, S> {
    pub fn new(project: &'a mut Project, store: &'a mut S) -> Self {
        Self {
            project,
            store,
            today: due::today(),
        }
    }

    /// Compute remaining time against a fixed date instead of the clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn project(&self) -> &Project {
        &*self.project
    }

    pub fn list(&self) -> &[Task] {
        &self.project.tasks
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.project.task(id)
    }

    pub fn find_by_title(&self, title: &str) -> Option<&Task> {
        self.project.task_by_title(title)
    }

    /// Look up by exact title, then by id or id prefix
    pub fn resolve(&self, key: &str) -> BoardResult<Uuid> {
        if let Some(task) = self.find_by_title(key) {
            return Ok(task.id);
        }
        let key_lower = key.to_lowercase();
        let mut matches = self
            .project
            .tasks
            .iter()
            .filter(|t| key_lower.len() >= 4 && t.id.to_string().starts_with(&key_lower));
        match (matches.next(), matches.next()) {
            (Some(task), None) => Ok(task.id),
            _ => Err(BoardError::TaskNotFound(key.to_string())),
        }
    }

    /// Create a task, append it to the project and persist both
    pub fn create(&mut self, fields: TaskFields) -> BoardResult<&Task> {
        self.validate_title(&fields.title, None)?;

        let folder = task_folder(&self.project.name);
        let asset_path = unique_path(&*self.store, &folder, &fields.title)
            .map_err(|e| BoardError::storage(&folder, e))?;
        let task = Task::new(fields, asset_path, self.today);

        self.save_task(&task)?;
        self.project.tasks.push(task);
        if let Err(e) = self.save_project() {
            // Roll back so memory and storage agree with the caller's view
            if let Some(task) = self.project.tasks.pop() {
                if let Err(cleanup) = self.store.delete(&task.asset_path) {
                    log::warn!("left orphan task entry {}: {}", task.asset_path, cleanup);
                }
            }
            return Err(e);
        }

        let task = &self.project.tasks[self.project.tasks.len() - 1];
        log::info!("created task '{}' in project '{}'", task.title, self.project.name);
        Ok(task)
    }

    /// Overwrite every mutable field of a task and persist it.
    /// The storage path stays where it was even when the title changes.
    pub fn update(&mut self, id: Uuid, fields: TaskFields) -> BoardResult<()> {
        let index = self.index_of(id)?;
        self.validate_title(&fields.title, Some(id))?;

        let previous = self.project.tasks[index].clone();
        self.project.tasks[index].apply(fields, self.today);

        let task = self.project.tasks[index].clone();
        if let Err(e) = self.save_task(&task) {
            self.project.tasks[index] = previous;
            return Err(e);
        }
        log::debug!("updated task '{}'", task.title);
        Ok(())
    }

    /// Remove a task and its storage entry; siblings are untouched
    pub fn delete(&mut self, id: Uuid) -> BoardResult<Task> {
        let index = self.index_of(id)?;

        let path = self.project.tasks[index].asset_path.clone();
        self.store
            .delete(&path)
            .map_err(|e| BoardError::storage(&path, e))?;

        let task = self.project.tasks.remove(index);
        self.save_project()?;
        log::info!("deleted task '{}' from project '{}'", task.title, self.project.name);
        Ok(task)
    }

    pub fn set_archived(&mut self, id: Uuid, archived: bool) -> BoardResult<()> {
        let index = self.index_of(id)?;
        if self.project.tasks[index].archived == archived {
            return Ok(());
        }

        self.project.tasks[index].archived = archived;
        let task = self.project.tasks[index].clone();
        if let Err(e) = self.save_task(&task) {
            self.project.tasks[index].archived = !archived;
            return Err(e);
        }
        Ok(())
    }

    /// Recompute every cached remaining-time text, persisting the ones that changed.
    /// Returns how many changed.
    pub fn refresh_remaining(&mut self) -> BoardResult<usize> {
        let mut changed = Vec::new();
        for task in &mut self.project.tasks {
            let before = task.remaining_time.clone();
            task.refresh_remaining(self.today);
            if task.remaining_time != before {
                changed.push(task.clone());
            }
        }

        for task in &changed {
            self.save_task(task)?;
        }
        Ok(changed.len())
    }

    /// Non-blank, and no other task in the project has exactly this title
    fn validate_title(&self, title: &str, editing: Option<Uuid>) -> BoardResult<()> {
        if title.trim().is_empty() {
            return Err(BoardError::EmptyTitle);
        }
        let duplicate = self
            .project
            .tasks
            .iter()
            .any(|t| t.title == title && Some(t.id) != editing);
        if duplicate {
            return Err(BoardError::DuplicateTitle(title.to_string()));
        }
        Ok(())
    }

    fn index_of(&self, id: Uuid) -> BoardResult<usize> {
        self.project
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| BoardError::TaskNotFound(id.to_string()))
    }

    fn save_task(&mut self, task: &Task) -> BoardResult<()> {
        write_task(&mut *self.store, task)
    }

    fn save_project(&mut self) -> BoardResult<()> {
        write_project(&mut *self.store, &*self.project)
    }
}

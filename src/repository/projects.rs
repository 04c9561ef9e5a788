use super::tasks::TaskRepository;
use super::write_project;
use crate::domain::{due, Project};
use crate::error::{BoardError, BoardResult};
use crate::persistence::layout::{parent_folder, project_folder, unique_path};
use crate::persistence::{load_and_migrate, AssetStore};
use chrono::NaiveDate;

/// Owns every project and the store they are persisted in, and tracks
/// which project is selected.
pub struct ProjectRepository<S: AssetStore> {
    store: S,
    projects: Vec<Project>,
    selected: Option<usize>,
    today: NaiveDate,
}

impl<S: AssetStore> ProjectRepository<S> {
    /// Empty repository; call [`load_all`](Self::load_all) to read the store
    pub fn new(store: S) -> Self {
        Self {
            store,
            projects: Vec::new(),
            selected: None,
            today: due::today(),
        }
    }

    /// Repository with every stored project loaded
    pub fn open(store: S) -> BoardResult<Self> {
        let mut repo = Self::new(store);
        repo.load_all()?;
        Ok(repo)
    }

    /// Compute remaining time against a fixed date instead of the clock
    #[cfg(test)]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Reload every project from the store, in storage-discovery order.
    /// The selected index is kept, clamped to the new list.
    pub fn load_all(&mut self) -> BoardResult<&[Project]> {
        self.projects = load_and_migrate(&mut self.store, self.today)
            .map_err(|e| BoardError::storage("Projects", e))?;
        self.selected = clamp_selection(self.selected.unwrap_or(0) as isize, self.projects.len());
        log::debug!("loaded {} projects", self.projects.len());
        Ok(&self.projects)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Case-insensitive lookup by name
    pub fn get(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.is_named(name))
    }

    pub fn selected(&self) -> Option<&Project> {
        self.selected.and_then(|i| self.projects.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn select(&mut self, name: &str) -> BoardResult<()> {
        self.selected = Some(self.index_of(name)?);
        Ok(())
    }

    /// Create an empty project and make it the selected one
    pub fn create(&mut self, name: &str) -> BoardResult<&Project> {
        self.validate_name(name, None)?;

        let folder = project_folder(name);
        let asset_path = unique_path(&self.store, &folder, name)
            .map_err(|e| BoardError::storage(&folder, e))?;
        let project = Project::new(name.to_string(), asset_path);

        write_project(&mut self.store, &project)?;

        log::info!("created project '{}' at {}", project.name, project.asset_path);
        self.projects.push(project);
        let index = self.projects.len() - 1;
        self.selected = Some(index);
        Ok(&self.projects[index])
    }

    /// Change a project's name in place. Its storage entry stays where it is.
    pub fn rename(&mut self, name: &str, new_name: &str) -> BoardResult<()> {
        let index = self.index_of(name)?;
        self.validate_name(new_name, Some(index))?;

        let project = &mut self.projects[index];
        let old_name = std::mem::replace(&mut project.name, new_name.to_string());

        if let Err(e) = write_project(&mut self.store, project) {
            project.name = old_name;
            return Err(e);
        }

        log::info!("renamed project '{}' to '{}'", old_name, new_name);
        Ok(())
    }

    /// Delete a project with all of its tasks and storage entries.
    ///
    /// The selected index moves back by one, clamped to the remaining list.
    /// If a task entry cannot be deleted the project stays, minus the tasks
    /// already removed, and its record is rewritten to match.
    pub fn delete(&mut self, name: &str) -> BoardResult<Project> {
        let index = self.index_of(name)?;
        let project = &self.projects[index];

        let mut removed = 0;
        let mut failure = None;
        for task in &project.tasks {
            match self.store.delete(&task.asset_path) {
                Ok(()) => removed += 1,
                Err(e) => {
                    failure = Some(BoardError::storage(&task.asset_path, e));
                    break;
                }
            }
        }
        if let Some(err) = failure {
            let project = &mut self.projects[index];
            project.tasks = project.tasks.split_off(removed);
            if let Err(e) = write_project(&mut self.store, project) {
                log::warn!("project '{}' still lists deleted tasks: {}", project.name, e);
            }
            return Err(err);
        }
        let project = &self.projects[index];
        self.store
            .delete(&project.asset_path)
            .map_err(|e| BoardError::storage(&project.asset_path, e))?;

        // Folders go only once empty; a folder can be shared after a rename
        let mut folders = vec![parent_folder(&project.asset_path).to_string(), project_folder(&project.name)];
        folders.dedup();
        for folder in folders {
            self.remove_if_empty(&folder)?;
        }

        let project = self.projects.remove(index);
        let current = self.selected.map(|i| i as isize).unwrap_or(0);
        self.selected = clamp_selection(current - 1, self.projects.len());

        log::info!("deleted project '{}' and {} tasks", project.name, project.tasks.len());
        Ok(project)
    }

    /// Task operations for the named project
    pub fn tasks(&mut self, name: &str) -> BoardResult<TaskRepository<'_, S>> {
        let index = self.index_of(name)?;
        Ok(TaskRepository::new(&mut self.projects[index], &mut self.store).with_today(self.today))
    }

    /// Task operations for the selected project
    pub fn selected_tasks(&mut self) -> BoardResult<TaskRepository<'_, S>> {
        let index = self
            .selected
            .filter(|&i| i < self.projects.len())
            .ok_or(BoardError::NoProjectSelected)?;
        Ok(TaskRepository::new(&mut self.projects[index], &mut self.store).with_today(self.today))
    }

    fn index_of(&self, name: &str) -> BoardResult<usize> {
        self.projects
            .iter()
            .position(|p| p.is_named(name))
            .ok_or_else(|| BoardError::ProjectNotFound(name.to_string()))
    }

    /// Non-blank and not matching another project case-insensitively
    fn validate_name(&self, name: &str, renaming: Option<usize>) -> BoardResult<()> {
        if name.trim().is_empty() {
            return Err(BoardError::InvalidName);
        }
        let duplicate = self
            .projects
            .iter()
            .enumerate()
            .any(|(i, p)| Some(i) != renaming && p.is_named(name));
        if duplicate {
            return Err(BoardError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn remove_if_empty(&mut self, folder: &str) -> BoardResult<()> {
        let remaining = self
            .store
            .list(folder)
            .map_err(|e| BoardError::storage(folder, e))?;
        if remaining.is_empty() {
            self.store
                .delete(folder)
                .map_err(|e| BoardError::storage(folder, e))?;
        }
        Ok(())
    }
}

/// `index` clamped to `0..len`, or none when the list is empty
fn clamp_selection(index: isize, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(index.clamp(0, len as isize - 1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskFields;
    use crate::persistence::{FileStore, MemoryStore};
    use pretty_assertions::assert_eq;

    fn repo() -> ProjectRepository<MemoryStore> {
        ProjectRepository::new(MemoryStore::new())
    }

    fn names<S: AssetStore>(repo: &ProjectRepository<S>) -> Vec<String> {
        repo.projects().iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_create_selects_new_project() {
        let mut repo = repo();
        repo.create("Website").unwrap();
        repo.create("Game").unwrap();

        assert_eq!(names(&repo), vec!["Website", "Game"]);
        assert_eq!(repo.selected().unwrap().name, "Game");
        assert_eq!(repo.get("game").unwrap().asset_path, "Projects/Game/Game.json");
        assert!(repo.store().load("Projects/Website/Website.json").unwrap().is_some());
    }

    #[test]
    fn test_create_validates_name() {
        let mut repo = repo();
        assert!(matches!(repo.create(""), Err(BoardError::InvalidName)));
        assert!(matches!(repo.create("   "), Err(BoardError::InvalidName)));

        repo.create("Website").unwrap();
        assert!(matches!(repo.create("website"), Err(BoardError::DuplicateName(_))));
        assert!(matches!(repo.create("WEBSITE"), Err(BoardError::DuplicateName(_))));
        assert_eq!(repo.projects().len(), 1);
        assert_eq!(repo.store().len(), 1);
    }

    #[test]
    fn test_rename_keeps_storage_path() {
        let mut repo = repo();
        repo.create("Draft").unwrap();
        repo.rename("draft", "Final").unwrap();

        let project = repo.get("Final").unwrap();
        assert_eq!(project.asset_path, "Projects/Draft/Draft.json");
        assert!(repo.get("Draft").is_none());

        let reloaded = ProjectRepository::open(repo.store().clone()).unwrap();
        assert_eq!(names(&reloaded), vec!["Final"]);
    }

    #[test]
    fn test_rename_validates_name() {
        let mut repo = repo();
        repo.create("A").unwrap();
        repo.create("B").unwrap();

        assert!(matches!(repo.rename("A", " "), Err(BoardError::InvalidName)));
        assert!(matches!(repo.rename("A", "b"), Err(BoardError::DuplicateName(_))));
        assert!(matches!(repo.rename("C", "D"), Err(BoardError::ProjectNotFound(_))));

        // Changing only the case of its own name is allowed
        repo.rename("A", "a").unwrap();
        assert_eq!(names(&repo), vec!["a", "B"]);
    }

    #[test]
    fn test_delete_removes_tasks_and_entries() {
        let mut repo = repo();
        repo.create("Keep").unwrap();
        repo.tasks("Keep").unwrap().create(TaskFields::titled("Stay")).unwrap();
        repo.create("Doomed").unwrap();
        {
            let mut tasks = repo.tasks("Doomed").unwrap();
            tasks.create(TaskFields::titled("One")).unwrap();
            tasks.create(TaskFields::titled("Two")).unwrap();
        }

        let removed = repo.delete("doomed").unwrap();
        assert_eq!(removed.tasks.len(), 2);

        assert_eq!(repo.store().list("Projects/Doomed").unwrap(), Vec::<String>::new());
        assert_eq!(repo.store().list("Projects").unwrap().len(), 2);

        let reloaded = ProjectRepository::open(repo.store().clone()).unwrap();
        assert_eq!(names(&reloaded), vec!["Keep"]);
        assert_eq!(reloaded.get("Keep").unwrap().tasks[0].title, "Stay");
    }

    #[test]
    fn test_failed_delete_keeps_project_consistent() {
        let mut repo = repo();
        repo.create("Game").unwrap();
        {
            let mut tasks = repo.tasks("Game").unwrap();
            tasks.create(TaskFields::titled("One")).unwrap();
            tasks.create(TaskFields::titled("Two")).unwrap();
        }
        repo.store.fail_deletes("Projects/Game/Tasks/Two.json");

        assert!(matches!(repo.delete("Game"), Err(BoardError::Storage { .. })));

        let project = repo.get("Game").unwrap();
        assert_eq!(project.tasks.len(), 1);
        assert_eq!(project.tasks[0].title, "Two");

        let reloaded = ProjectRepository::open(repo.store().clone()).unwrap();
        let titles: Vec<_> = reloaded.get("Game").unwrap().tasks.iter().map(|t| t.title.clone()).collect();
        assert_eq!(titles, vec!["Two"]);
    }

    #[test]
    fn test_delete_clamps_selection() {
        let mut repo = repo();
        repo.create("A").unwrap();
        repo.create("B").unwrap();
        repo.create("C").unwrap();
        assert_eq!(repo.selected_index(), Some(2));

        repo.delete("A").unwrap();
        assert_eq!(repo.selected_index(), Some(1));
        assert_eq!(repo.selected().unwrap().name, "C");

        repo.select("B").unwrap();
        repo.delete("C").unwrap();
        assert_eq!(repo.selected_index(), Some(0));

        repo.delete("B").unwrap();
        assert_eq!(repo.selected_index(), None);
        assert!(matches!(repo.selected_tasks(), Err(BoardError::NoProjectSelected)));
    }

    #[test]
    fn test_delete_after_rename_spares_reused_folder() {
        let mut repo = repo();
        repo.create("A").unwrap();
        repo.rename("A", "B").unwrap();
        repo.create("A").unwrap();
        assert_eq!(repo.get("A").unwrap().asset_path, "Projects/A/A 1.json");

        repo.delete("B").unwrap();
        assert!(repo.store().load("Projects/A/A 1.json").unwrap().is_some());
        assert_eq!(names(&repo), vec!["A"]);
    }

    #[test]
    fn test_load_all_keeps_selection_in_bounds() {
        let mut repo = repo();
        repo.create("A").unwrap();
        repo.create("B").unwrap();

        let mut reloaded = ProjectRepository::new(repo.store().clone());
        assert_eq!(reloaded.selected_index(), None);
        reloaded.load_all().unwrap();
        assert_eq!(reloaded.selected().unwrap().name, "A");
    }

    #[test]
    fn test_selected_tasks_work_on_selected_project() {
        let mut repo = repo();
        repo.create("A").unwrap();
        repo.create("B").unwrap();
        repo.select("a").unwrap();

        repo.selected_tasks().unwrap().create(TaskFields::titled("For A")).unwrap();
        assert_eq!(repo.get("A").unwrap().tasks.len(), 1);
        assert!(repo.get("B").unwrap().tasks.is_empty());
    }

    #[test]
    fn test_round_trip_through_file_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        {
            let mut repo = ProjectRepository::new(FileStore::new(temp_dir.path())).with_today(today);
            repo.create("Game").unwrap();
            let mut fields = TaskFields::titled("Fix jump");
            fields.due_date = "2024-05-12".to_string();
            repo.tasks("Game").unwrap().create(fields).unwrap();
        }

        assert!(temp_dir.path().join("Projects/Game/Game.json").is_file());
        assert!(temp_dir.path().join("Projects/Game/Tasks/Fix jump.json").is_file());

        let repo = ProjectRepository::open(FileStore::new(temp_dir.path()))
            .unwrap()
            .with_today(today);
        let project = repo.get("Game").unwrap();
        assert_eq!(project.tasks.len(), 1);
        assert_eq!(project.tasks[0].due_date, "2024-05-12");
    }
}

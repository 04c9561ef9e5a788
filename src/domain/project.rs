use super::task::Task;
use uuid::Uuid;

/// A named container owning an ordered list of tasks
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub tasks: Vec<Task>,
    /// Logical storage path; a rename does not move it
    pub asset_path: String,
}

impl Project {
    pub fn new(name: String, asset_path: String) -> Self {
        Self {
            name,
            tasks: Vec::new(),
            asset_path,
        }
    }

    /// Case-insensitive name comparison, the rule for project identity
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Exact (case-sensitive) title lookup
    pub fn task_by_title(&self, title: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.title == title)
    }

    /// Tasks not archived, in list order
    pub fn active_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.archived)
    }
}

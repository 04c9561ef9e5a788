pub mod projects;
pub mod tasks;

pub use projects::ProjectRepository;
pub use tasks::TaskRepository;

use crate::domain::{Project, Task};
use crate::error::{BoardError, BoardResult};
use crate::persistence::{project_to_json, task_to_json, AssetStore};

fn write_project<S: AssetStore + ?Sized>(store: &mut S, project: &Project) -> BoardResult<()> {
    let path = &project.asset_path;
    let json = project_to_json(project).map_err(|e| BoardError::storage(path, e))?;
    store.save(path, &json).map_err(|e| BoardError::storage(path, e))
}

fn write_task<S: AssetStore + ?Sized>(store: &mut S, task: &Task) -> BoardResult<()> {
    let path = &task.asset_path;
    let json = task_to_json(task).map_err(|e| BoardError::storage(path, e))?;
    store.save(path, &json).map_err(|e| BoardError::storage(path, e))
}

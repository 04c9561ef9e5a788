use super::layout::{is_project_entry, PROJECTS_ROOT};
use super::records::{
    project_to_json, task_to_json, ProjectRecord, TaskRecord, CURRENT_SCHEMA_VERSION,
};
use super::store::AssetStore;
use crate::domain::{due, Project, Task};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use uuid::Uuid;

/// Load every project and its tasks, upgrading old records on the way.
///
/// 1. Discover project entries under `Projects/` (sorted by path)
/// 2. Load each task the project references; missing or unreadable tasks are skipped
/// 3. Upgrade version 0 records (assign ids, default created date, archived flag)
/// 4. Recompute remaining time against `today`
/// 5. Rewrite upgraded records and projects that lost task references
pub fn load_and_migrate<S: AssetStore + ?Sized>(store: &mut S, today: NaiveDate) -> Result<Vec<Project>> {
    let mut projects = Vec::new();

    for path in store.list(PROJECTS_ROOT)? {
        if !is_project_entry(&path) {
            continue;
        }
        let Some(content) = store.load(&path)? else {
            continue;
        };
        let record: ProjectRecord = match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("skipping unreadable project entry {}: {}", path, e);
                continue;
            }
        };

        let (project, rewrite) = load_project(store, record, path, today)?;
        if rewrite {
            log::info!("upgrading project entry {}", project.asset_path);
            store.save(&project.asset_path, &project_to_json(&project)?)?;
        }
        projects.push(project);
    }

    Ok(projects)
}

fn load_project<S: AssetStore + ?Sized>(
    store: &mut S,
    record: ProjectRecord,
    asset_path: String,
    today: NaiveDate,
) -> Result<(Project, bool)> {
    let mut rewrite = record.schema_version < CURRENT_SCHEMA_VERSION;
    let mut project = Project::new(record.name, asset_path);

    for task_path in record.tasks {
        let Some(content) = store.load(&task_path)? else {
            log::warn!("project '{}' references missing task {}", project.name, task_path);
            rewrite = true;
            continue;
        };
        let task_record: TaskRecord = match serde_json::from_str(&content) {
            Ok(task_record) => task_record,
            Err(e) => {
                // Left on disk so it can be repaired by hand
                log::warn!("skipping unreadable task entry {}: {}", task_path, e);
                continue;
            }
        };

        let (task, upgraded) = upgrade_task(task_record, task_path, today);
        if upgraded {
            store
                .save(&task.asset_path, &task_to_json(&task)?)
                .with_context(|| format!("Failed to rewrite task entry {}", task.asset_path))?;
        }
        project.tasks.push(task);
    }

    Ok((project, rewrite))
}

/// Turn a stored record into a task. Returns `true` when the record was
/// older than the current schema and should be written back.
pub fn upgrade_task(record: TaskRecord, asset_path: String, today: NaiveDate) -> (Task, bool) {
    let mut upgraded = record.schema_version < CURRENT_SCHEMA_VERSION;

    if record.schema_version > CURRENT_SCHEMA_VERSION {
        log::warn!(
            "task entry {} has schema version {}, newer than {}",
            asset_path,
            record.schema_version,
            CURRENT_SCHEMA_VERSION
        );
    }

    let id = record.id.unwrap_or_else(|| {
        upgraded = true;
        Uuid::new_v4()
    });
    let created_date = if record.created_date.trim().is_empty() {
        upgraded = true;
        due::now_stamp()
    } else {
        record.created_date
    };

    let mut task = Task {
        id,
        title: record.title,
        description: record.description,
        status: record.status,
        priority: record.priority,
        category: record.category,
        assignee: record.assignee,
        created_date,
        due_date: record.due_date,
        remaining_time: record.remaining_time,
        archived: record.archived,
        asset_path,
    };
    task.refresh_remaining(today);

    (task, upgraded)
}

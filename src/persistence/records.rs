//! On-disk JSON records for projects and tasks.
//!
//! A project record lists the storage paths of its tasks in order; each task
//! lives in its own record. Both carry a `schema_version` so older entries can
//! be upgraded on load (see `migration`).

use crate::domain::{Project, Task, TaskPriority, TaskStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Version written by this build
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(default)]
    pub schema_version: u32,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(default)]
    pub schema_version: u32,
    /// Older entries may predate ids
    #[serde(default)]
    pub id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub created_date: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub remaining_time: String,
    #[serde(default)]
    pub archived: bool,
}

impl ProjectRecord {
    pub fn from_project(project: &Project) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            name: project.name.clone(),
            tasks: project.tasks.iter().map(|t| t.asset_path.clone()).collect(),
        }
    }
}

impl TaskRecord {
    pub fn from_task(task: &Task) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            id: Some(task.id),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            category: task.category.clone(),
            assignee: task.assignee.clone(),
            created_date: task.created_date.clone(),
            due_date: task.due_date.clone(),
            remaining_time: task.remaining_time.clone(),
            archived: task.archived,
        }
    }
}

pub fn project_to_json(project: &Project) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ProjectRecord::from_project(project))
}

pub fn task_to_json(task: &Task) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&TaskRecord::from_task(task))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskFields;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_task_record_carries_every_field() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let mut fields = TaskFields::titled("Deploy");
        fields.assignee = "ana".to_string();
        fields.status = TaskStatus::InProgress;
        fields.due_date = "2024-05-12".to_string();
        let task = Task::new(fields, "Projects/P/Tasks/Deploy.json".into(), today);

        let json = task_to_json(&task).unwrap();
        let record: TaskRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, TaskRecord::from_task(&task));
        assert_eq!(record.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(record.remaining_time, "2 days left");
        assert!(json.contains("\"status\": \"InProgress\""));
    }

    #[test]
    fn test_project_record_lists_task_paths() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let mut project = Project::new("P".to_string(), "Projects/P/P.json".to_string());
        project.tasks.push(Task::new(TaskFields::titled("A"), "Projects/P/Tasks/A.json".into(), today));
        project.tasks.push(Task::new(TaskFields::titled("B"), "Projects/P/Tasks/B.json".into(), today));

        let record = ProjectRecord::from_project(&project);
        assert_eq!(record.name, "P");
        assert_eq!(record.tasks, vec!["Projects/P/Tasks/A.json", "Projects/P/Tasks/B.json"]);
    }

    #[test]
    fn test_minimal_task_record_uses_defaults() {
        let record: TaskRecord = serde_json::from_str(r#"{"title": "Old"}"#).unwrap();
        assert_eq!(record.schema_version, 0);
        assert_eq!(record.id, None);
        assert_eq!(record.status, TaskStatus::ToDo);
        assert_eq!(record.priority, TaskPriority::Low);
        assert!(!record.archived);
    }
}

use super::due;
use super::enums::{TaskPriority, TaskStatus};
use chrono::NaiveDate;
use uuid::Uuid;

/// A unit of work owned by exactly one project
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Assigned once at creation, never changes
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category: String,
    pub assignee: String,
    /// "YYYY-MM-DD HH:MM", set once at creation
    pub created_date: String,
    /// Free text; may be empty or unparsable
    pub due_date: String,
    /// Cached display text derived from `due_date`
    pub remaining_time: String,
    pub archived: bool,
    /// Logical storage path; not changed by a title edit
    pub asset_path: String,
}

/// Editable task fields, as collected by a form or the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category: String,
    pub assignee: String,
    pub due_date: String,
    /// Only honoured on create; defaults to now
    pub created_date: Option<String>,
}

impl TaskFields {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

impl Task {
    /// Build a new task with a fresh id. Validation is the repository's job.
    pub fn new(fields: TaskFields, asset_path: String, today: NaiveDate) -> Self {
        let created_date = fields
            .created_date
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(due::now_stamp);

        let mut task = Self {
            id: Uuid::new_v4(),
            title: fields.title,
            description: fields.description,
            status: fields.status,
            priority: fields.priority,
            category: fields.category,
            assignee: fields.assignee,
            created_date,
            due_date: fields.due_date,
            remaining_time: String::new(),
            archived: false,
            asset_path,
        };
        task.refresh_remaining(today);
        task
    }

    /// Overwrite every mutable field. Id, created date, archive flag and
    /// storage path are left alone.
    pub fn apply(&mut self, fields: TaskFields, today: NaiveDate) {
        self.title = fields.title;
        self.description = fields.description;
        self.status = fields.status;
        self.priority = fields.priority;
        self.category = fields.category;
        self.assignee = fields.assignee;
        self.due_date = fields.due_date;
        self.refresh_remaining(today);
    }

    /// Current editable fields, e.g. to pre-fill an edit form
    pub fn fields(&self) -> TaskFields {
        TaskFields {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
            category: self.category.clone(),
            assignee: self.assignee.clone(),
            due_date: self.due_date.clone(),
            created_date: Some(self.created_date.clone()),
        }
    }

    pub fn refresh_remaining(&mut self, today: NaiveDate) {
        self.remaining_time = due::remaining(&self.due_date, today);
    }

    /// Parsed due date, if any
    pub fn due(&self) -> Option<NaiveDate> {
        due::parse_date(&self.due_date)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Done && self.due().is_some_and(|d| d < today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_task_new_defaults() {
        let task = Task::new(TaskFields::titled("Write docs"), "p/Tasks/Write docs.json".into(), day(2024, 5, 10));
        assert_eq!(task.title, "Write docs");
        assert_eq!(task.status, TaskStatus::ToDo);
        assert_eq!(task.priority, TaskPriority::Low);
        assert!(!task.archived);
        assert!(!task.created_date.is_empty());
        assert_eq!(task.remaining_time, "");
    }

    #[test]
    fn test_task_new_keeps_supplied_created_date() {
        let mut fields = TaskFields::titled("Old");
        fields.created_date = Some("2023-01-02 09:00".to_string());
        let task = Task::new(fields, String::new(), day(2024, 5, 10));
        assert_eq!(task.created_date, "2023-01-02 09:00");
    }

    #[test]
    fn test_task_ids_are_unique() {
        let a = Task::new(TaskFields::titled("A"), String::new(), day(2024, 5, 10));
        let b = Task::new(TaskFields::titled("A"), String::new(), day(2024, 5, 10));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_apply_overwrites_fields_and_recomputes_remaining() {
        let today = day(2024, 5, 10);
        let mut task = Task::new(TaskFields::titled("Old"), "x.json".into(), today);
        let id = task.id;
        let created = task.created_date.clone();

        let mut fields = TaskFields::titled("New");
        fields.description = "Updated".to_string();
        fields.status = TaskStatus::InProgress;
        fields.priority = TaskPriority::High;
        fields.due_date = "2024-05-13".to_string();
        fields.created_date = Some("1999-01-01 00:00".to_string());
        task.apply(fields, today);

        assert_eq!(task.title, "New");
        assert_eq!(task.description, "Updated");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.remaining_time, "3 days left");
        assert_eq!(task.id, id);
        assert_eq!(task.created_date, created);
        assert_eq!(task.asset_path, "x.json");
    }

    #[test]
    fn test_is_overdue() {
        let today = day(2024, 5, 10);
        let mut fields = TaskFields::titled("Late");
        fields.due_date = "2024-05-01".to_string();
        let mut task = Task::new(fields, String::new(), today);
        assert!(task.is_overdue(today));

        task.status = TaskStatus::Done;
        assert!(!task.is_overdue(today));
    }
}

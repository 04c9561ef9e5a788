use serde::{Deserialize, Serialize};

/// Progress state of a task. Declaration order is the sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    ToDo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Parse status from a user-supplied tag like "todo" or "in-progress"
    pub fn from_tag(tag: &str) -> Option<Self> {
        match normalize_tag(tag).as_str() {
            "TODO" => Some(Self::ToDo),
            "INPROGRESS" | "DOING" => Some(Self::InProgress),
            "DONE" => Some(Self::Done),
            _ => None,
        }
    }

    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::ToDo => "TODO",
            Self::InProgress => "IN PROGRESS",
            Self::Done => "DONE",
        }
    }

    pub fn all() -> &'static [TaskStatus] {
        &[TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done]
    }
}

/// Priority level of a task. Declaration order is the sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    #[default]
    Low,
    Normal,
    High,
}

impl TaskPriority {
    /// Parse priority from a user-supplied tag like "high"
    pub fn from_tag(tag: &str) -> Option<Self> {
        match normalize_tag(tag).as_str() {
            "LOW" => Some(Self::Low),
            "NORMAL" | "MEDIUM" => Some(Self::Normal),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }

    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Normal => "NORMAL",
            Self::High => "HIGH",
        }
    }

    pub fn all() -> &'static [TaskPriority] {
        &[TaskPriority::Low, TaskPriority::Normal, TaskPriority::High]
    }
}

/// Field a task list can be ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOption {
    #[default]
    None,
    Assignee,
    Priority,
    Status,
    RemainingTime,
}

impl SortOption {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match normalize_tag(tag).as_str() {
            "NONE" => Some(Self::None),
            "ASSIGNEE" => Some(Self::Assignee),
            "PRIORITY" => Some(Self::Priority),
            "STATUS" => Some(Self::Status),
            "REMAINING" | "REMAININGTIME" | "DUE" => Some(Self::RemainingTime),
            _ => None,
        }
    }

    /// Display name for this option
    pub fn name(&self) -> &'static str {
        match self {
            SortOption::None => "None",
            SortOption::Assignee => "Assignee",
            SortOption::Priority => "Priority",
            SortOption::Status => "Status",
            SortOption::RemainingTime => "Remaining time",
        }
    }
}

/// Uppercase and drop separators so "in-progress", "In Progress" and "inprogress" match
fn normalize_tag(tag: &str) -> String {
    tag.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .to_uppercase()
}

use super::enums::{TaskPriority, TaskStatus};
use super::project::Project;
use super::task::Task;
use chrono::NaiveDate;

/// Per-status task counts for a project header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
    pub overdue: usize,
    pub archived: usize,
}

/// Count tasks by status. Archived tasks only count as archived.
pub fn count_tasks(project: &Project, today: NaiveDate) -> TaskCounts {
    let mut counts = TaskCounts::default();

    for task in &project.tasks {
        if task.archived {
            counts.archived += 1;
            continue;
        }
        match task.status {
            TaskStatus::ToDo => counts.todo += 1,
            TaskStatus::InProgress => counts.in_progress += 1,
            TaskStatus::Done => counts.done += 1,
        }
        if task.is_overdue(today) {
            counts.overdue += 1;
        }
    }

    counts
}

/// Get status badge text
pub fn status_badge(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::ToDo => "○ TODO",
        TaskStatus::InProgress => "◐ IN PROGRESS",
        TaskStatus::Done => "● DONE",
    }
}

pub fn priority_badge(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Low => "▽",
        TaskPriority::Normal => "◇",
        TaskPriority::High => "▲",
    }
}

/// One-line summary: badge, priority, title, then assignee and remaining time when set
pub fn task_line(task: &Task) -> String {
    let mut line = format!(
        "{} {} {}",
        priority_badge(task.priority),
        status_badge(task.status),
        task.title
    );

    if !task.assignee.is_empty() {
        line.push_str(&format!(" @{}", task.assignee));
    }
    if !task.category.is_empty() {
        line.push_str(&format!(" #{}", task.category));
    }
    if !task.remaining_time.is_empty() {
        line.push_str(&format!(" ({})", task.remaining_time));
    }
    if task.archived {
        line.push_str(" [archived]");
    }

    line
}

/// Multi-line detail block for a single task
pub fn task_details(task: &Task) -> String {
    let mut out = String::new();
    out.push_str(&format!("Title:       {}\n", task.title));
    out.push_str(&format!("Id:          {}\n", task.id));
    out.push_str(&format!("Status:      {}\n", task.status.to_tag()));
    out.push_str(&format!("Priority:    {}\n", task.priority.to_tag()));
    out.push_str(&format!("Category:    {}\n", task.category));
    out.push_str(&format!("Assignee:    {}\n", task.assignee));
    out.push_str(&format!("Created:     {}\n", task.created_date));
    out.push_str(&format!("Due:         {}\n", task.due_date));
    out.push_str(&format!("Remaining:   {}\n", task.remaining_time));
    if !task.description.trim().is_empty() {
        out.push_str("Description:\n");
        for line in task.description.lines() {
            out.push_str(&format!("    {}\n", line));
        }
    }
    out
}

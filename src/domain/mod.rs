pub mod due;
pub mod enums;
pub mod project;
pub mod sort;
pub mod task;
pub mod views;

pub use enums::{SortOption, TaskPriority, TaskStatus};
pub use project::Project;
pub use sort::sort_tasks;
pub use task::{Task, TaskFields};
pub use views::{count_tasks, task_details, task_line};

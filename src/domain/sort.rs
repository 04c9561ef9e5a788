use super::enums::SortOption;
use super::task::Task;
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Order tasks by `option`. The sort is stable, so ties keep their input
/// order in both directions, and `SortOption::None` returns the input order.
pub fn sort_tasks<'a, I>(tasks: I, option: SortOption, ascending: bool) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut sorted: Vec<&Task> = tasks.into_iter().collect();
    if option == SortOption::None {
        return sorted;
    }

    sorted.sort_by(|a, b| {
        let ordering = compare(a, b, option);
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
    sorted
}

fn compare(a: &Task, b: &Task, option: SortOption) -> Ordering {
    match option {
        SortOption::None => Ordering::Equal,
        SortOption::Assignee => a.assignee.cmp(&b.assignee),
        SortOption::Priority => a.priority.cmp(&b.priority),
        SortOption::Status => a.status.cmp(&b.status),
        SortOption::RemainingTime => due_key(a).cmp(&due_key(b)),
    }
}

/// Missing or unparsable due dates sort after every real date
fn due_key(task: &Task) -> NaiveDate {
    task.due().unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskFields, TaskPriority, TaskStatus};
    use pretty_assertions::assert_eq;

    fn task(title: &str) -> Task {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        Task::new(TaskFields::titled(title), String::new(), today)
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn test_sort_none_preserves_order() {
        let tasks = vec![task("C"), task("A"), task("B")];
        let sorted = sort_tasks(&tasks, SortOption::None, false);
        assert_eq!(titles(&sorted), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_sort_by_priority() {
        let mut low = task("low");
        low.priority = TaskPriority::Low;
        let mut high = task("high");
        high.priority = TaskPriority::High;
        let mut normal = task("normal");
        normal.priority = TaskPriority::Normal;
        let tasks = vec![low, high, normal];

        let asc = sort_tasks(&tasks, SortOption::Priority, true);
        assert_eq!(titles(&asc), vec!["low", "normal", "high"]);

        let desc = sort_tasks(&tasks, SortOption::Priority, false);
        assert_eq!(titles(&desc), vec!["high", "normal", "low"]);
    }

    #[test]
    fn test_sort_by_status() {
        let mut done = task("done");
        done.status = TaskStatus::Done;
        let todo = task("todo");
        let mut doing = task("doing");
        doing.status = TaskStatus::InProgress;
        let tasks = vec![done, todo, doing];

        let asc = sort_tasks(&tasks, SortOption::Status, true);
        assert_eq!(titles(&asc), vec!["todo", "doing", "done"]);
    }

    #[test]
    fn test_sort_by_assignee_is_stable() {
        let mut a1 = task("first");
        a1.assignee = "ana".to_string();
        let mut b = task("second");
        b.assignee = "bob".to_string();
        let mut a2 = task("third");
        a2.assignee = "ana".to_string();
        let tasks = vec![a1, b, a2];

        let asc = sort_tasks(&tasks, SortOption::Assignee, true);
        assert_eq!(titles(&asc), vec!["first", "third", "second"]);

        let desc = sort_tasks(&tasks, SortOption::Assignee, false);
        assert_eq!(titles(&desc), vec!["second", "first", "third"]);
    }

    #[test]
    fn test_sort_by_remaining_time_puts_undated_last() {
        let mut soon = task("soon");
        soon.due_date = "2024-05-11".to_string();
        let mut late = task("overdue");
        late.due_date = "2024-05-01".to_string();
        let undated = task("undated");
        let mut broken = task("broken");
        broken.due_date = "whenever".to_string();
        let mut later = task("later");
        later.due_date = "2024-06-01 10:00".to_string();
        let tasks = vec![undated, soon, broken, later, late];

        let asc = sort_tasks(&tasks, SortOption::RemainingTime, true);
        assert_eq!(titles(&asc), vec!["overdue", "soon", "later", "undated", "broken"]);

        let desc = sort_tasks(&tasks, SortOption::RemainingTime, false);
        assert_eq!(titles(&desc), vec!["undated", "broken", "later", "soon", "overdue"]);
    }
}

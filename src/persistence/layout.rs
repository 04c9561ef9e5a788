use super::store::AssetStore;
use anyhow::Result;

/// Root folder holding one sub-folder per project
pub const PROJECTS_ROOT: &str = "Projects";
const TASKS_FOLDER: &str = "Tasks";
const EXTENSION: &str = ".json";

/// Replace characters that cannot appear in a path segment
pub fn sanitize_segment(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ if cleaned.starts_with('.') => format!("_{}", &cleaned[1..]),
        _ => cleaned,
    }
}

/// Folder for a project named `name`: `Projects/<name>`
pub fn project_folder(name: &str) -> String {
    format!("{}/{}", PROJECTS_ROOT, sanitize_segment(name))
}

/// Folder for tasks created while the project was named `name`
pub fn task_folder(project_name: &str) -> String {
    format!("{}/{}", project_folder(project_name), TASKS_FOLDER)
}

/// True for `Projects/<folder>/<file>.json`, the depth at which project entries live
pub fn is_project_entry(path: &str) -> bool {
    let segments: Vec<&str> = path.split('/').collect();
    segments.len() == 3 && segments[0] == PROJECTS_ROOT && segments[2].ends_with(EXTENSION)
}

/// First free `<folder>/<stem>.json`, then `<stem> 1.json`, `<stem> 2.json`, ...
pub fn unique_path<S: AssetStore + ?Sized>(store: &S, folder: &str, stem: &str) -> Result<String> {
    let stem = sanitize_segment(stem);
    let mut candidate = format!("{}/{}{}", folder, stem, EXTENSION);
    let mut counter = 1;

    while store.exists(&candidate)? {
        candidate = format!("{}/{} {}{}", folder, stem, counter, EXTENSION);
        counter += 1;
    }

    Ok(candidate)
}

/// Parent folder of an entry path
pub fn parent_folder(path: &str) -> &str {
    path.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

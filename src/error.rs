use thiserror::Error;

/// A rejected repository operation. Nothing is changed when one is returned.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("project name cannot be empty")]
    InvalidName,

    #[error("a project named '{0}' already exists")]
    DuplicateName(String),

    #[error("task title cannot be empty")]
    EmptyTitle,

    #[error("a task titled '{0}' already exists in this project")]
    DuplicateTitle(String),

    #[error("no project named '{0}'")]
    ProjectNotFound(String),

    #[error("no task '{0}' in this project")]
    TaskNotFound(String),

    #[error("no project selected")]
    NoProjectSelected,

    #[error("storage error at '{path}': {source}")]
    Storage {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl BoardError {
    pub fn storage(path: impl Into<String>, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type BoardResult<T> = std::result::Result<T, BoardError>;

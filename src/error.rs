//! Error types returned by the task store.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task with ID {0} is not found")]
    NotFound(u64),

    #[error("Invalid task data: {0}")]
    InvalidData(String),

    /// Reading or writing the backing file failed for any reason other than
    /// the file not existing yet.
    #[error("Failed to {operation}: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: BoxError,
    },
}

impl TaskError {
    pub fn persistence(operation: &'static str, source: impl Into<BoxError>) -> Self {
        TaskError::Persistence {
            operation,
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;

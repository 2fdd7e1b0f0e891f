use super::todo::TodoId;

/// Every failure a todo operation can report, from the entity up to the service.
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("todo title cannot be empty")]
    EmptyTitle,

    #[error("todo not found: {0}")]
    NotFound(TodoId),

    /// The stored todo changed between fetch and write-back.
    #[error("todo {0} was modified concurrently")]
    Conflict(TodoId),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type TodoResult<T> = Result<T, TodoError>;

use crate::domain::error::{TodoError, TodoResult};
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{CreateTodo, Todo, TodoId, UpdateTodo};
use async_trait::async_trait;

/// Read-modify-write attempts before a concurrent-write `Conflict` is returned.
pub const DEFAULT_MAX_WRITE_ATTEMPTS: usize = 32;

#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn create(&self, input: CreateTodo) -> TodoResult<Todo>;
    async fn get(&self, id: &TodoId) -> TodoResult<Todo>;
    async fn list(&self) -> TodoResult<Vec<Todo>>;
    async fn update(&self, id: &TodoId, input: UpdateTodo) -> TodoResult<Todo>;
    async fn delete(&self, id: &TodoId) -> TodoResult<()>;
    async fn mark_completed(&self, id: &TodoId) -> TodoResult<Todo>;
    async fn mark_incomplete(&self, id: &TodoId) -> TodoResult<Todo>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
    max_write_attempts: usize,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo, max_write_attempts: DEFAULT_MAX_WRITE_ATTEMPTS } }

    pub fn with_max_write_attempts(mut self, attempts: usize) -> Self {
        self.max_write_attempts = attempts.max(1);
        self
    }

    /// Fetches the todo, applies `apply` and writes it back, starting over
    /// from a fresh fetch whenever another writer got in first.
    async fn modify<F>(&self, id: &TodoId, mut apply: F) -> TodoResult<Todo>
    where
        F: FnMut(&mut Todo) -> TodoResult<()> + Send,
    {
        for attempt in 1..=self.max_write_attempts {
            let mut todo = self.repo.get_by_id(id).await?;
            apply(&mut todo)?;
            match self.repo.update(todo.clone()).await {
                Ok(()) => return Ok(todo),
                Err(TodoError::Conflict(_)) => {
                    tracing::debug!(%id, attempt, "concurrent write on todo, retrying");
                }
                Err(e) => return Err(e),
            }
        }
        tracing::warn!(%id, attempts = self.max_write_attempts, "gave up writing todo");
        Err(TodoError::Conflict(id.clone()))
    }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn create(&self, input: CreateTodo) -> TodoResult<Todo> {
        let todo = Todo::new(input.title, input.description.unwrap_or_default())?;
        self.repo.save(todo.clone()).await?;
        tracing::info!(id = %todo.id(), "todo created");
        Ok(todo)
    }

    async fn get(&self, id: &TodoId) -> TodoResult<Todo> {
        tracing::debug!(%id, "fetching todo");
        self.repo.get_by_id(id).await
    }

    async fn list(&self) -> TodoResult<Vec<Todo>> {
        let todos = self.repo.get_all().await?;
        tracing::debug!(count = todos.len(), "listing todos");
        Ok(todos)
    }

    async fn update(&self, id: &TodoId, input: UpdateTodo) -> TodoResult<Todo> {
        let UpdateTodo { title, description } = input;
        let description = description.unwrap_or_default();
        let todo = self.modify(id, |t| t.update(title.clone(), description.clone())).await?;
        tracing::info!(%id, "todo updated");
        Ok(todo)
    }

    async fn delete(&self, id: &TodoId) -> TodoResult<()> {
        self.repo.delete(id).await?;
        tracing::info!(%id, "todo deleted");
        Ok(())
    }

    async fn mark_completed(&self, id: &TodoId) -> TodoResult<Todo> {
        let todo = self.modify(id, |t| { t.mark_completed(); Ok(()) }).await?;
        tracing::info!(%id, "todo completed");
        Ok(todo)
    }

    async fn mark_incomplete(&self, id: &TodoId) -> TodoResult<Todo> {
        let todo = self.modify(id, |t| { t.mark_incomplete(); Ok(()) }).await?;
        tracing::info!(%id, "todo reopened");
        Ok(todo)
    }
}

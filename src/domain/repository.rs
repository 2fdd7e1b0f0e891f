use async_trait::async_trait;

use super::error::TodoResult;
use super::todo::{Todo, TodoId};

#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    /// Inserts or overwrites the todo under its id.
    async fn save(&self, todo: Todo) -> TodoResult<()>;
    async fn get_by_id(&self, id: &TodoId) -> TodoResult<Todo>;
    /// Snapshot of every stored todo, in no particular order.
    async fn get_all(&self) -> TodoResult<Vec<Todo>>;
    /// Writes back a todo fetched earlier. Fails with `NotFound` if it was
    /// deleted and `Conflict` if another write landed since the fetch.
    async fn update(&self, todo: Todo) -> TodoResult<()>;
    async fn delete(&self, id: &TodoId) -> TodoResult<()>;
}

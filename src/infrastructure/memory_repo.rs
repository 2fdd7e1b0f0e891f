use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    error::{TodoError, TodoResult},
    repository::TodoRepository,
    todo::{Todo, TodoId},
};

/// Volatile store: everything is dropped with the process.
/// Clones share the same map.
#[derive(Clone, Default)]
pub struct InMemoryTodoRepository {
    todos: Arc<RwLock<HashMap<TodoId, Todo>>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn save(&self, todo: Todo) -> TodoResult<()> {
        self.todos.write().await.insert(todo.id().clone(), todo);
        Ok(())
    }

    async fn get_by_id(&self, id: &TodoId) -> TodoResult<Todo> {
        self.todos
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| TodoError::NotFound(id.clone()))
    }

    async fn get_all(&self) -> TodoResult<Vec<Todo>> {
        Ok(self.todos.read().await.values().cloned().collect())
    }

    async fn update(&self, mut todo: Todo) -> TodoResult<()> {
        let mut map = self.todos.write().await;
        let Some(stored) = map.get(todo.id()) else { return Err(TodoError::NotFound(todo.id().clone())) };
        if stored.version() != todo.version() {
            return Err(TodoError::Conflict(todo.id().clone()));
        }
        todo.bump_version();
        map.insert(todo.id().clone(), todo);
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> TodoResult<()> {
        match self.todos.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(TodoError::NotFound(id.clone())),
        }
    }
}

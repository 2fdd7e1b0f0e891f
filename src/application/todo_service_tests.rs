#[cfg(test)]
mod tests {
    use super::super::todo_service::{TodoService, TodoServiceImpl};
    use crate::domain::{
        error::{TodoError, TodoResult},
        repository::TodoRepository,
        todo::{CreateTodo, Todo, TodoId, UpdateTodo},
    };
    use crate::infrastructure::memory_repo::InMemoryTodoRepository;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    fn service() -> (InMemoryTodoRepository, TodoServiceImpl<InMemoryTodoRepository>) {
        let repo = InMemoryTodoRepository::new();
        (repo.clone(), TodoServiceImpl::new(repo))
    }

    fn create(title: &str) -> CreateTodo { CreateTodo { title: title.into(), description: None } }

    #[tokio::test]
    async fn unit_create_and_get() {
        let (_, service) = service();
        let created = service.create(CreateTodo { title: "X".into(), description: Some("d".into()) }).await.unwrap();
        assert_eq!(created.title(), "X");
        assert_eq!(created.description(), "d");
        assert_eq!(created.created_at(), created.updated_at());
        let got = service.get(created.id()).await.unwrap();
        assert_eq!(got.id(), created.id());
    }

    #[tokio::test]
    async fn create_with_empty_title_leaves_store_empty() {
        let (repo, service) = service();
        assert_matches!(service.create(create("")).await, Err(TodoError::EmptyTitle));
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_changes_title_and_clears_missing_description() {
        let (_, service) = service();
        let created = service.create(CreateTodo { title: "old".into(), description: Some("desc".into()) }).await.unwrap();
        let updated = service.update(created.id(), UpdateTodo { title: "new".into(), description: None }).await.unwrap();
        assert_eq!(updated.title(), "new");
        assert_eq!(updated.description(), "");
        assert!(updated.updated_at() > created.updated_at());

        let stored = service.get(created.id()).await.unwrap();
        assert_eq!(stored.title(), "new");
    }

    #[tokio::test]
    async fn update_with_empty_title_keeps_stored_state() {
        let (repo, service) = service();
        let created = service.create(create("keep")).await.unwrap();
        let err = service.update(created.id(), UpdateTodo { title: String::new(), description: None }).await;
        assert_matches!(err, Err(TodoError::EmptyTitle));
        assert_eq!(repo.get_by_id(created.id()).await.unwrap(), created);
    }

    #[tokio::test]
    async fn operations_on_missing_id_are_not_found() {
        let (_, service) = service();
        let id = TodoId::from("missing");
        assert_matches!(service.get(&id).await, Err(TodoError::NotFound(_)));
        assert_matches!(service.update(&id, UpdateTodo { title: "t".into(), description: None }).await, Err(TodoError::NotFound(_)));
        assert_matches!(service.delete(&id).await, Err(TodoError::NotFound(_)));
        assert_matches!(service.mark_completed(&id).await, Err(TodoError::NotFound(_)));
        assert_matches!(service.mark_incomplete(&id).await, Err(TodoError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let (_, service) = service();
        let created = service.create(create("gone")).await.unwrap();
        service.delete(created.id()).await.unwrap();
        assert_matches!(service.get(created.id()).await, Err(TodoError::NotFound(_)));
    }

    #[tokio::test]
    async fn complete_and_reopen_are_idempotent() {
        let (_, service) = service();
        let created = service.create(create("Buy milk")).await.unwrap();

        let first = service.mark_completed(created.id()).await.unwrap();
        let second = service.mark_completed(created.id()).await.unwrap();
        assert!(first.is_completed() && second.is_completed());
        assert!(first.updated_at() > first.created_at());
        assert!(second.updated_at() >= first.updated_at());

        let first = service.mark_incomplete(created.id()).await.unwrap();
        let second = service.mark_incomplete(created.id()).await.unwrap();
        assert!(!first.is_completed() && !second.is_completed());
        assert!(second.updated_at() >= first.updated_at());
        assert!(!service.get(created.id()).await.unwrap().is_completed());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_mutations_are_not_lost() {
        let (_, service) = service();
        let service = Arc::new(service);
        let created = service.create(create("race")).await.unwrap();
        let id = created.id().clone();

        let mut handles = Vec::new();
        for i in 0..16 {
            let (service, id) = (service.clone(), id.clone());
            handles.push(tokio::spawn(async move {
                service.update(&id, UpdateTodo { title: format!("title {i}"), description: None }).await.map(|_| ())
            }));
        }
        {
            let (service, id) = (service.clone(), id.clone());
            handles.push(tokio::spawn(async move { service.mark_completed(&id).await.map(|_| ()) }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = service.get(&id).await.unwrap();
        assert!(stored.is_completed());
        assert!(stored.title().starts_with("title "));
        assert_eq!(stored.version(), 17);
    }

    /// Repository that rejects every write-back as stale.
    #[derive(Clone, Default)]
    struct AlwaysStaleRepo {
        inner: InMemoryTodoRepository,
        writes: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TodoRepository for AlwaysStaleRepo {
        async fn save(&self, todo: Todo) -> TodoResult<()> { self.inner.save(todo).await }
        async fn get_by_id(&self, id: &TodoId) -> TodoResult<Todo> { self.inner.get_by_id(id).await }
        async fn get_all(&self) -> TodoResult<Vec<Todo>> { self.inner.get_all().await }
        async fn update(&self, todo: Todo) -> TodoResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Err(TodoError::Conflict(todo.id().clone()))
        }
        async fn delete(&self, id: &TodoId) -> TodoResult<()> { self.inner.delete(id).await }
    }

    #[tokio::test]
    async fn write_attempts_are_bounded() {
        let repo = AlwaysStaleRepo::default();
        let service = TodoServiceImpl::new(repo.clone()).with_max_write_attempts(3);
        let created = service.create(create("stuck")).await.unwrap();
        assert_matches!(service.mark_completed(created.id()).await, Err(TodoError::Conflict(_)));
        assert_eq!(repo.writes.load(Ordering::SeqCst), 3);
    }

    /// Repository whose backend is unavailable.
    struct BrokenRepo;

    #[async_trait]
    impl TodoRepository for BrokenRepo {
        async fn save(&self, _: Todo) -> TodoResult<()> { Err(anyhow::anyhow!("store offline").into()) }
        async fn get_by_id(&self, _: &TodoId) -> TodoResult<Todo> { Err(anyhow::anyhow!("store offline").into()) }
        async fn get_all(&self) -> TodoResult<Vec<Todo>> { Err(anyhow::anyhow!("store offline").into()) }
        async fn update(&self, _: Todo) -> TodoResult<()> { Err(anyhow::anyhow!("store offline").into()) }
        async fn delete(&self, _: &TodoId) -> TodoResult<()> { Err(anyhow::anyhow!("store offline").into()) }
    }

    #[tokio::test]
    async fn repository_failures_pass_through() {
        let service = TodoServiceImpl::new(BrokenRepo);
        assert_matches!(service.create(create("x")).await, Err(TodoError::Internal(_)));
        assert_matches!(service.list().await, Err(TodoError::Internal(_)));
        assert_matches!(service.mark_completed(&TodoId::from("x")).await, Err(TodoError::Internal(_)));
    }
}

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::{get, patch, post}};

use crate::application::todo_service::TodoService;
use crate::domain::todo::{CreateTodo, TodoId, UpdateTodo};
use crate::http::types::{ApiError, TodoRequest, TodoResponse};

#[derive(Clone)]
pub struct AppState<S: TodoService> { pub service: S }

pub fn router<S: TodoService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/todos", post(create_todo::<S>).get(list_todos::<S>))
        .route("/todos/:id", get(get_todo::<S>).put(update_todo::<S>).delete(delete_todo::<S>))
        .route("/todos/:id/complete", patch(complete_todo::<S>))
        .route("/todos/:id/incomplete", patch(incomplete_todo::<S>))
        .with_state(state)
}

type ApiResult<T> = Result<T, ApiError>;

async fn create_todo<S: TodoService>(State(state): State<AppState<S>>, payload: Result<Json<TodoRequest>, JsonRejection>) -> ApiResult<(StatusCode, Json<TodoResponse>)> {
    let Json(body) = payload.map_err(bad_body)?;
    let todo = state.service.create(CreateTodo { title: body.title, description: body.description }).await?;
    Ok((StatusCode::CREATED, Json(TodoResponse::from(&todo))))
}

async fn list_todos<S: TodoService>(State(state): State<AppState<S>>) -> ApiResult<Json<Vec<TodoResponse>>> {
    let todos = state.service.list().await?;
    Ok(Json(todos.iter().map(TodoResponse::from).collect()))
}

async fn get_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> ApiResult<Json<TodoResponse>> {
    let todo = state.service.get(&TodoId::from(id)).await?;
    Ok(Json(TodoResponse::from(&todo)))
}

async fn update_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>, payload: Result<Json<TodoRequest>, JsonRejection>) -> ApiResult<Json<TodoResponse>> {
    let Json(body) = payload.map_err(bad_body)?;
    let todo = state.service.update(&TodoId::from(id), UpdateTodo { title: body.title, description: body.description }).await?;
    Ok(Json(TodoResponse::from(&todo)))
}

async fn delete_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    state.service.delete(&TodoId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn complete_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> ApiResult<Json<TodoResponse>> {
    let todo = state.service.mark_completed(&TodoId::from(id)).await?;
    Ok(Json(TodoResponse::from(&todo)))
}

async fn incomplete_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> ApiResult<Json<TodoResponse>> {
    let todo = state.service.mark_incomplete(&TodoId::from(id)).await?;
    Ok(Json(TodoResponse::from(&todo)))
}

fn bad_body(rejection: JsonRejection) -> ApiError { ApiError::BadRequest(rejection.body_text()) }

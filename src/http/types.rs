use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::{error::TodoError, todo::{Todo, TodoId}};

/// Body of `POST /todos` and `PUT /todos/{id}`.
#[derive(Debug, Deserialize)]
pub struct TodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: TodoId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    #[serde(serialize_with = "http_date")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "http_date")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Todo> for TodoResponse {
    fn from(t: &Todo) -> Self {
        Self {
            id: t.id().clone(),
            title: t.title().to_owned(),
            description: Some(t.description()).filter(|d| !d.is_empty()).map(str::to_owned),
            completed: t.is_completed(),
            created_at: t.created_at(),
            updated_at: t.updated_at(),
        }
    }
}

/// RFC 1123 date in GMT, e.g. `Fri, 16 Oct 2026 09:30:00 GMT`.
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

fn http_date<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&dt.format(HTTP_DATE_FORMAT))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody { pub error: String }

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Todo(#[from] TodoError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Todo(TodoError::EmptyTitle) => (StatusCode::BAD_REQUEST, TodoError::EmptyTitle.to_string()),
            ApiError::Todo(e @ TodoError::NotFound(_)) => (StatusCode::NOT_FOUND, e.to_string()),
            ApiError::Todo(e) => {
                tracing::error!(error = %e, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };
        (status, axum::Json(ErrorBody { error: message })).into_response()
    }
}

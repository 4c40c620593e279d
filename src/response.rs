use axum::Json;
use serde::Serialize;
use tracing::{debug, error};

use crate::error::{ErrorKind, StorageError};

/// Uniform body of every API response. Domain errors travel in `error`
/// with HTTP 200; `data` is null on failure.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub error: String,
    pub data: Option<T>,
}

pub type ApiResult<T> = Json<ApiResponse<T>>;

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> ApiResult<T> {
        Json(Self {
            error: String::new(),
            data: Some(data),
        })
    }

    pub fn from_error(op: &'static str, err: StorageError) -> ApiResult<T> {
        match err.kind() {
            ErrorKind::Internal | ErrorKind::Timeout => {
                error!(op, error = ?err, "storage error");
            }
            kind => debug!(op, ?kind, error = %err, "request rejected"),
        }
        Json(Self {
            error: err.public_message(),
            data: None,
        })
    }

    pub fn from_result(op: &'static str, res: Result<T, StorageError>) -> ApiResult<T> {
        match res {
            Ok(v) => Self::data(v),
            Err(e) => Self::from_error(op, e),
        }
    }

    /// Like [`from_result`](Self::from_result) but an empty collection is a
    /// successful, empty answer.
    pub fn from_list(op: &'static str, res: Result<T, StorageError>) -> ApiResult<T>
    where
        T: Default,
    {
        match res {
            Err(e) if e.kind() == ErrorKind::EmptyList => Self::data(T::default()),
            other => Self::from_result(op, other),
        }
    }
}

pub fn ok(op: &'static str, res: Result<(), StorageError>) -> ApiResult<&'static str> {
    ApiResponse::from_result(op, res.map(|_| "ok"))
}

//! Request body extractors that reject with [`AppError`].
//!
//! Axum's own `Form` and `Json` answer malformed bodies with their own plain
//! responses. These wrappers route the failure through [`AppError`] so it is
//! logged and shaped like every other error.

use axum::{
    extract::{
        FromRequest,
        rejection::{FormRejection, JsonRejection},
    },
    http::StatusCode,
};

use crate::error::AppError;

/// URL-encoded form body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct Form<T>(pub T);

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

fn rejection_error(status: StatusCode, body: String) -> AppError {
    if status.is_server_error() {
        AppError::Internal(body)
    } else {
        AppError::BadRequest(body)
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        rejection_error(rejection.status(), rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        rejection_error(rejection.status(), rejection.body_text())
    }
}

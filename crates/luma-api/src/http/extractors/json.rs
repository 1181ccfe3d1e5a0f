//! JSON body extractor whose rejections use the API error shape.

use axum::extract::FromRequest;

use crate::http::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

use axum::extract::FromRequest;

use crate::server::response::ApiError;

/// JSON body extractor whose rejections use the API's `{ "error": ... }` shape
/// with a 400 status.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Parses a numeric path identifier, answering 400 with `message` otherwise.
pub fn parse_id(raw: &str, message: &'static str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::bad_request(message))
}

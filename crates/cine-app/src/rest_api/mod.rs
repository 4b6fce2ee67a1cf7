pub mod movie;

use crate::error::{ApiError, ApiResult};

/// Catch-all for unmatched routes, so clients always get a JSON error body.
pub async fn not_found(uri: http::Uri) -> ApiResult<()> {
    Err(ApiError::ResourceNotFound(uri.path().to_string()))
}

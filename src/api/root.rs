//! Placeholder root endpoint.

use axum::http::StatusCode;

/// `GET /` and `POST /` both answer 200 with an empty body.
///
/// This is a stub, not designed behavior: the service has no HTTP surface
/// of its own and the route exists only so plain HTTP probes against the
/// port succeed.
pub async fn root() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_root_returns_empty_success() {
        assert_eq!(root().await, StatusCode::OK);
    }
}

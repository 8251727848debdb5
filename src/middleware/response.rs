use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// JSON response with a status code and optional extra headers
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
    pub headers: HeaderMap,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None, // Default to 200 OK
            headers: HeaderMap::new(),
        }
    }

    /// Create an API response with custom status code
    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            data,
            status_code: Some(status_code),
            headers: HeaderMap::new(),
        }
    }

    /// Create a 201 Created response pointing at the new resource
    pub fn created(data: T, location: &str) -> Self {
        Self::with_status(data, StatusCode::CREATED).with_header(header::LOCATION, location)
    }

    /// Adds a header; values that are not valid header text are dropped with a warning
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.insert(name, value);
            }
            Err(e) => tracing::warn!("Dropping invalid {} header value: {}", name, e),
        }
        self
    }
}

impl ApiResponse<()> {
    /// Create a 204 No Content response
    pub fn no_content() -> Self {
        Self::with_status((), StatusCode::NO_CONTENT)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        // For 204 No Content, return empty response
        if status == StatusCode::NO_CONTENT {
            return (status, self.headers).into_response();
        }

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": true,
                        "message": "Failed to serialize response data",
                        "code": "INTERNAL_SERVER_ERROR"
                    })),
                )
                    .into_response();
            }
        };

        (status, self.headers, Json(data_value)).into_response()
    }
}

// Convenience type alias
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_sets_location() {
        let response = ApiResponse::created(json!({"id": 7}), "/api/cities/1/pointsofinterest/7").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/api/cities/1/pointsofinterest/7"
        );
    }

    #[test]
    fn no_content_has_no_body_type() {
        let response = ApiResponse::no_content().into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn invalid_header_values_are_dropped() {
        let response = ApiResponse::success(json!([])).with_header(HeaderName::from_static("x-pagination"), "bad\nvalue");
        assert!(response.headers.is_empty());
    }
}

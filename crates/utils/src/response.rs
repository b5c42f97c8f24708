use serde::Serialize;
use ts_rs::TS;

/// Envelope for successful API responses.
///
/// Error responses are produced by the server's `ApiError` and carry a bare
/// `{"error": "..."}` body, so only the success constructor lives here.
#[derive(Debug, Clone, Serialize, TS)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

use serde::Deserialize;

/// Every endpoint wraps its payload in the same envelope. Which field signals success depends on
/// the endpoint: playlist and account operations set `statusCode`, while lookups tend to set
/// `success`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
    /// HTTP status of the response carrying this body
    #[serde(skip)]
    pub http_status: u16,
}

impl<T> ApiResponse<T> {
    /// True if the body reports `statusCode: 200`
    pub fn accepted(&self) -> bool {
        self.status_code == Some(200)
    }

    /// Status used when describing a rejection: the body's code if present, the HTTP code
    /// otherwise
    pub fn reported_status(&self) -> u16 {
        self.status_code.unwrap_or(self.http_status)
    }

    pub fn message_or(&self, fallback: &str) -> String {
        match &self.message {
            Some(m) if !m.is_empty() => m.clone(),
            _ => fallback.to_string(),
        }
    }
}

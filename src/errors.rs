use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoomkitError {
    #[error("Invalid layout request: {0}")]
    InvalidLayout(String),
    #[error("Invalid volume: {0}")]
    InvalidVolume(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Media devices unavailable: {0}")]
    MissingMediaDevices(String),
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for RoomkitError {
    fn from(error: std::io::Error) -> Self {
        RoomkitError::Io(error.to_string())
    }
}

/// Operation during which an [`SdkException`] was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorAction {
    Autoplay,
    Track,
    Validation,
}

impl std::fmt::Display for ErrorAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorAction::Autoplay => write!(f, "AUTOPLAY"),
            ErrorAction::Track => write!(f, "TRACK"),
            ErrorAction::Validation => write!(f, "VALIDATION"),
        }
    }
}

/// Structured error handed to host applications through sink events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkException {
    pub code: u32,
    pub name: String,
    pub action: ErrorAction,
    pub message: String,
    pub description: String,
    pub is_terminal: bool,
    pub timestamp: String,
}

impl SdkException {
    pub const AUTOPLAY_BLOCKED_CODE: u32 = 3008;

    fn new(code: u32, name: &str, action: ErrorAction, message: &str, description: &str) -> Self {
        Self {
            code,
            name: name.to_string(),
            action,
            message: message.to_string(),
            description: description.to_string(),
            is_terminal: false,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Playback was rejected because the user has not interacted with the page yet
    pub fn autoplay_blocked(description: impl Into<String>) -> Self {
        let description = description.into();
        Self::new(
            Self::AUTOPLAY_BLOCKED_CODE,
            "AutoplayBlocked",
            ErrorAction::Autoplay,
            "Autoplay blocked because the user didn't interact with the document first",
            &description,
        )
    }

    pub fn to_json(&self) -> Result<String, RoomkitError> {
        serde_json::to_string(self)
            .map_err(|e| RoomkitError::Config(format!("Failed to serialize exception: {}", e)))
    }
}

impl std::fmt::Display for SdkException {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}) [{}]: {}", self.name, self.code, self.action, self.message)
    }
}

impl std::error::Error for SdkException {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autoplay_blocked_shape() {
        let ex = SdkException::autoplay_blocked("");
        assert_eq!(ex.code, 3008);
        assert_eq!(ex.name, "AutoplayBlocked");
        assert_eq!(ex.action, ErrorAction::Autoplay);
        assert!(!ex.is_terminal);
        assert!(chrono::DateTime::parse_from_rfc3339(&ex.timestamp).is_ok());
    }

    #[test]
    fn test_exception_serializes_camel_case() {
        let json = SdkException::autoplay_blocked("track-1").to_json().unwrap();
        assert!(json.contains("\"isTerminal\":false"));
        assert!(json.contains("\"action\":\"AUTOPLAY\""));
        assert!(json.contains("\"description\":\"track-1\""));
    }

    #[test]
    fn test_error_display() {
        let error = RoomkitError::InvalidLayout("bad".to_string());
        assert_eq!(error.to_string(), "Invalid layout request: bad");
    }
}

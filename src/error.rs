use reqwest::StatusCode;

/// Result type for conversation polling.
pub type PollResult<T> = Result<T, PollError>;

/// Errors raised while locating or fetching a conversation.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("No auth token found: please set one in settings")]
    MissingCredential,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Conversation API error {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    Timestamp(String),
}

impl PollError {
    /// Errors the user has to act on; everything else is only logged.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, PollError::MissingCredential | PollError::Unauthorized)
    }
}

/// Errors from reading or writing the settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Settings file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Unknown setting: '{0}'")]
    UnknownKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_credential_errors_reach_the_user() {
        assert!(PollError::MissingCredential.is_user_facing());
        assert!(PollError::Unauthorized.is_user_facing());
        assert!(!PollError::Timestamp("nope".into()).is_user_facing());
        assert!(
            !PollError::Status {
                status: StatusCode::BAD_GATEWAY,
                body: String::new(),
            }
            .is_user_facing()
        );
    }
}

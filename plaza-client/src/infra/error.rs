use thiserror::Error;

/// Failures talking to the Plaza API.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid server address '{0}'")]
    InvalidBaseUrl(String),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unauthorized - please sign in again")]
    Unauthorized,

    #[error("Request failed with status {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status { status: u16, message: Option<String> },

    #[error("Server rejected the request: {0}")]
    Rejected(String),

    #[error("Empty response from server")]
    EmptyResponse,

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Explanation supplied by the server, when the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            Self::Rejected(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

impl From<ClientError> for plaza_core::ProfileError {
    fn from(err: ClientError) -> Self {
        match err.server_message() {
            Some(message) => Self::Remote(message.to_string()),
            None => Self::Remote(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_includes_server_message() {
        let err = ClientError::Status {
            status: 409,
            message: Some("Username is taken".into()),
        };
        assert_eq!(
            err.to_string(),
            "Request failed with status 409: Username is taken"
        );
        assert_eq!(err.server_message(), Some("Username is taken"));

        let bare = ClientError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(bare.to_string(), "Request failed with status 502");
    }

    #[test]
    fn converts_to_remote_profile_error() {
        let err: plaza_core::ProfileError =
            ClientError::Rejected("Bio too long".into()).into();
        assert_eq!(err, plaza_core::ProfileError::Remote("Bio too long".into()));
    }
}

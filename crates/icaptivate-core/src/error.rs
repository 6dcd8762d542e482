use thiserror::Error;

use crate::navigation::Route;

/// Failure of a suggestion request, tagged so callers can tell a dead network
/// apart from a server refusal or a body they could not read.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The message was blank, nothing was sent.
    #[error("message is empty")]
    EmptyMessage,

    /// Connection, TLS or body transfer failed.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    /// The body was not the expected JSON shape.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether trying the same request again could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Server { status, .. } => *status >= 500,
            ApiError::EmptyMessage | ApiError::Decode(_) => false,
        }
    }

    /// Short one-line description suitable for a status bar.
    pub fn summary(&self) -> String {
        match self {
            ApiError::EmptyMessage => "Enter a message first".to_string(),
            ApiError::Transport(_) => "Couldn't reach the suggestions service".to_string(),
            ApiError::Server { status, .. } => {
                format!("The suggestions service returned an error ({})", status)
            }
            ApiError::Decode(_) => "The suggestions service sent an unexpected reply".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("tone level {0} is outside 1..=5")]
pub struct ToneOutOfRange(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {action} from {from:?}")]
pub struct NavigationError {
    pub from: Route,
    pub action: &'static str,
}

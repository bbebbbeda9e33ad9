use std::fmt;
use std::path::PathBuf;

/// Custom error type for inventory operations
#[derive(Debug)]
pub enum InventoryError {
    /// Network-level failure (connect, timeout, DNS, broken body stream)
    Transport(reqwest::Error),
    /// Resource Graph answered with status >= 400
    Http { status: u16, message: String },
    /// Successful status but the body is not a usable query page
    MalformedResponse(String),
    /// No bearer token could be acquired
    Auth(String),
    /// Required field absent (or null) in a raw row
    MissingField(String),
    /// Field present but of the wrong shape
    InvalidField { field: String, message: String },
    /// Caller supplied an unusable request (empty subscriptions, blank query)
    InvalidInput(String),
    /// Failed to write the export file
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl InventoryError {
    /// Whether another attempt of the same request may succeed.
    ///
    /// Transport failures, HTTP 429 and any 5xx are transient. Everything
    /// else ends the operation on first sight.
    pub fn is_retryable(&self) -> bool {
        match self {
            InventoryError::Transport(_) => true,
            InventoryError::Http { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            InventoryError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryError::Transport(e) => write!(f, "HTTP request failed: {}", e),
            InventoryError::Http { status, message } => {
                write!(f, "Resource Graph error (status {}): {}", status, message)
            }
            InventoryError::MalformedResponse(msg) => {
                write!(f, "Malformed Resource Graph response: {}", msg)
            }
            InventoryError::Auth(msg) => write!(f, "Authentication failed: {}", msg),
            InventoryError::MissingField(field) => {
                write!(f, "Missing required field '{}' in result row", field)
            }
            InventoryError::InvalidField { field, message } => {
                write!(f, "Invalid field '{}' in result row: {}", field, message)
            }
            InventoryError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            InventoryError::Io { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for InventoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InventoryError::Transport(e) => Some(e),
            InventoryError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for InventoryError {
    fn from(err: reqwest::Error) -> Self {
        InventoryError::Transport(err)
    }
}

/// Result type alias for inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;

//! Crate error type

/// Errors surfaced by the game core and its persistence helpers
#[derive(Debug)]
pub enum GameError {
    /// A generator invariant was violated (no reachable platform)
    Integrity(String),
    /// Tuning values that make the level unbeatable
    InvalidTuning(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl From<std::io::Error> for GameError {
    fn from(e: std::io::Error) -> Self {
        GameError::Io(e)
    }
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        GameError::Json(e)
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::Integrity(msg) => write!(f, "integrity fault: {msg}"),
            GameError::InvalidTuning(msg) => write!(f, "invalid tuning: {msg}"),
            GameError::Io(e) => write!(f, "IO error: {e}"),
            GameError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io(e) => Some(e),
            GameError::Json(e) => Some(e),
            _ => None,
        }
    }
}

use thiserror::Error;

/// Shape identifier not in {heart, flower, saturn, fireworks, buddha}.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown shape '{0}'")]
pub struct ParseShapeError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("color must start with '#': '{0}'")]
    MissingHash(String),
    #[error("color must have 3 or 6 hex digits: '{0}'")]
    BadLength(String),
    #[error("invalid hex digit in color '{0}'")]
    BadDigit(String),
}

/// A single detection call failed. Recovered locally by the control state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("hand detection failed: {0}")]
pub struct DetectError(pub String);

/// Every fallback location was tried and none produced a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FallbackError<E> {
    #[error("no locations to load from")]
    NoLocations,
    #[error("all {attempts} locations failed; last error: {last}")]
    Exhausted { attempts: usize, last: E },
}

impl<E> FallbackError<E> {
    /// The error from the final location tried, if any location was tried.
    pub fn into_last(self) -> Option<E> {
        match self {
            FallbackError::NoLocations => None,
            FallbackError::Exhausted { last, .. } => Some(last),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("No camera stream available")]
    NoStream,
}

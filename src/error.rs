use thiserror::Error;

/// Errors raised while talking to the model or interpreting what it sent back.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("gateway unavailable: {0}")]
    GatewayUnavailable(String),
    #[error("gateway request failed: {0}")]
    Gateway(String),
    #[error("gateway returned an empty response")]
    EmptyResponse,
    #[error("malformed question: {0}")]
    MalformedQuestion(String),
    #[error("{0}")]
    InvalidTopic(String),
}

/// Errors raised when a wheel cannot be laid out.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WheelError {
    #[error("a wheel needs at least one topic")]
    Empty,
    #[error("{0} segments do not divide 360 degrees evenly")]
    UnalignedSegments(usize),
}

/// Errors raised while opening the sound device or loading effects.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Device(String),
    #[error("failed to load sound {name}: {source}")]
    Load {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
}

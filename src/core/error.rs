use std::error::Error;
use std::fmt::{self, Display};

use plotters::drawing::DrawingAreaErrorKind;

/// Error type for story operations
#[derive(Debug)]
pub enum StoryError {
    /// Error during start-up that prevents any chart from being drawn
    InitializationError(String),
    /// A table source could not be read
    SourceError(String),
    /// A table could not be parsed
    ParseError(String),
    /// A chart could not be drawn
    RenderError(String),
    /// Invalid configuration file or value
    ConfigError(String),
    /// The story event queue is unavailable
    ChannelError(String),
    /// Invalid input from a caller
    ValidationError(String),
    /// Metrics registration or encoding failed
    MetricsError(String),
}

impl Display for StoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoryError::InitializationError(msg) => write!(f, "Initialization error: {}", msg),
            StoryError::SourceError(msg) => write!(f, "Source error: {}", msg),
            StoryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            StoryError::RenderError(msg) => write!(f, "Render error: {}", msg),
            StoryError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            StoryError::ChannelError(msg) => write!(f, "Channel error: {}", msg),
            StoryError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            StoryError::MetricsError(msg) => write!(f, "Metrics error: {}", msg),
        }
    }
}

impl Error for StoryError {}

impl From<std::io::Error> for StoryError {
    fn from(err: std::io::Error) -> Self {
        StoryError::SourceError(err.to_string())
    }
}

impl From<csv::Error> for StoryError {
    fn from(err: csv::Error) -> Self {
        StoryError::ParseError(err.to_string())
    }
}

impl From<serde_json::Error> for StoryError {
    fn from(err: serde_json::Error) -> Self {
        StoryError::ConfigError(err.to_string())
    }
}

impl From<prometheus::Error> for StoryError {
    fn from(err: prometheus::Error) -> Self {
        StoryError::MetricsError(err.to_string())
    }
}

impl<E: Error + Send + Sync> From<DrawingAreaErrorKind<E>> for StoryError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        StoryError::RenderError(err.to_string())
    }
}

use thiserror::Error;

/// sdlift errors
#[derive(Error, Debug)]
pub enum SdliftError {
    #[error("Failed to connect to database: {0}")]
    Connection(String),

    #[error("Failed to introspect schema '{schema}': {message}")]
    Introspection { schema: String, message: String },

    #[error("Failed to render SDL for '{target}': {message}")]
    Render { target: String, message: String },

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

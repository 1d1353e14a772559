use miette::Diagnostic;
use thiserror::Error;

/// Main error type for sloth operations
#[derive(Error, Diagnostic, Debug)]
pub enum SlothError {
    #[error("IO error: {0}")]
    #[diagnostic(code(sloth::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(sloth::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(sloth::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Image error with {path}: {message}")]
    #[diagnostic(code(sloth::image))]
    Image {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(sloth::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Generation error: {message}")]
    #[diagnostic(code(sloth::generate))]
    Generate {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, SlothError>;

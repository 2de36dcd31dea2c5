use crate::source::GoSourceError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnumgenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source error in file {file}: {source}")]
    Source {
        file: PathBuf,
        #[source]
        source: GoSourceError,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("Invalid regex pattern: {0}")]
    Regex(String),

    #[error("No Go source files found in {searched}")]
    NoSourceFiles { searched: String },

    #[error("Files belong to different packages: {first} and {second}")]
    PackageMismatch { first: String, second: String },

    #[error("Malformed expression for {type_name} constant {identifier} at line {line}: {reason}")]
    MalformedExpression {
        type_name: String,
        identifier: String,
        line: usize,
        reason: String,
    },

    #[error("Invariant violated by {type_name} constant {identifier}: {message}")]
    InvariantViolation {
        type_name: String,
        identifier: String,
        message: String,
    },

    #[error("Unsupported declaration for type {type_name}: {message}")]
    Unsupported { type_name: String, message: String },

    #[error("Formatter error: {0}")]
    Format(String),

    #[error("Generation failed for type(s): {}", .types.join(", "))]
    GenerationFailed { types: Vec<String> },
}

impl From<regex::Error> for EnumgenError {
    fn from(err: regex::Error) -> Self {
        EnumgenError::Regex(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EnumgenError>;

impl EnumgenError {
    pub fn source_file(file: impl Into<PathBuf>, source: GoSourceError) -> Self {
        EnumgenError::Source {
            file: file.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        EnumgenError::Config(message.into())
    }

    pub fn malformed(
        type_name: impl Into<String>,
        identifier: impl Into<String>,
        line: usize,
        reason: impl Into<String>,
    ) -> Self {
        EnumgenError::MalformedExpression {
            type_name: type_name.into(),
            identifier: identifier.into(),
            line,
            reason: reason.into(),
        }
    }

    pub fn invariant(
        type_name: impl Into<String>,
        identifier: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        EnumgenError::InvariantViolation {
            type_name: type_name.into(),
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    pub fn unsupported(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        EnumgenError::Unsupported {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    pub fn format(message: impl Into<String>) -> Self {
        EnumgenError::Format(message.into())
    }
}

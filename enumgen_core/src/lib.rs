// enumgen - Enum() accessors for Go constant groups

pub mod config;
pub mod enumerate;
pub mod error;
pub mod format;
pub mod generator;
pub mod source;

// Re-export commonly used items for convenience
pub use config::EnumgenConfig;
pub use enumerate::{
    CollectedType, EnumerationResult, FileHeader, collect, emit, enumerate, render_file, resolve,
};
pub use error::{EnumgenError, Result};
pub use generator::{EnumGenerator, GenerationReport, TypeOutcome};

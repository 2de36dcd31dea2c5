//! Generation of `Enum()` accessors for several types of one package.

use crate::enumerate::{
    FileHeader, IntegerKind, ResolvedConstant, SuppressedConstant, collect, emit, render_file,
    resolve,
};
use crate::error::{EnumgenError, Result};
use crate::format::{SourceFormatter, Verbatim, format_or_verbatim};
use crate::source::SourceFile;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// What happened to one requested type.
#[derive(Debug)]
pub enum TypeOutcome {
    /// An accessor was generated.
    Generated { values: usize, suppressed: usize },
    /// The type declares no constants; nothing was generated.
    Empty,
    /// The type could not be generated. Other types are unaffected.
    Failed(EnumgenError),
}

#[derive(Debug)]
pub struct TypeReport {
    pub type_name: String,
    pub outcome: TypeOutcome,
}

/// Information about a generated file.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// The path where the file was written.
    pub path: PathBuf,
    /// The number of bytes written.
    pub bytes_written: usize,
}

/// Report of the generation process.
#[derive(Debug)]
pub struct GenerationReport {
    /// One entry per requested type, in request order.
    pub types: Vec<TypeReport>,
    /// The complete generated file, `None` if no type produced an accessor.
    pub source: Option<String>,
}

impl GenerationReport {
    pub fn failed_types(&self) -> Vec<&str> {
        self.types
            .iter()
            .filter(|t| matches!(t.outcome, TypeOutcome::Failed(_)))
            .map(|t| t.type_name.as_str())
            .collect()
    }

    pub fn generated_count(&self) -> usize {
        self.types
            .iter()
            .filter(|t| matches!(t.outcome, TypeOutcome::Generated { .. }))
            .count()
    }

    /// Write the generated file, if any.
    pub fn write(&self, path: &Path) -> Result<Option<GeneratedFile>> {
        let Some(source) = &self.source else {
            warn!("No type produced output, not writing {:?}", path);
            return Ok(None);
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, source)?;
        info!("Wrote {:?} ({} bytes)", path, source.len());

        Ok(Some(GeneratedFile {
            path: path.to_path_buf(),
            bytes_written: source.len(),
        }))
    }

    /// `Err(GenerationFailed)` if any type failed.
    pub fn check(&self) -> Result<()> {
        let failed = self.failed_types();
        if failed.is_empty() {
            Ok(())
        } else {
            Err(EnumgenError::GenerationFailed {
                types: failed.into_iter().map(String::from).collect(),
            })
        }
    }
}

/// Resolved values of one type, as shown by `enumgen inspect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inspection {
    pub type_name: String,
    pub kind: IntegerKind,
    pub constants: Vec<ResolvedConstant>,
    pub suppressed: Vec<SuppressedConstant>,
}

/// Generator for `Enum()` accessors.
pub struct EnumGenerator<'a> {
    files: &'a [SourceFile],
    formatter: Box<dyn SourceFormatter>,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a generator over the parsed files of one package.
    pub fn new(files: &'a [SourceFile]) -> Self {
        Self {
            files,
            formatter: Box::new(Verbatim),
        }
    }

    pub fn with_formatter(mut self, formatter: impl SourceFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Resolves a type without generating anything.
    pub fn inspect(&self, type_name: &str) -> Result<Inspection> {
        let collected = collect(self.files, type_name)?;
        let result = resolve(&collected)?;

        Ok(Inspection {
            type_name: collected.type_name,
            kind: collected.kind,
            constants: result.constants,
            suppressed: result.suppressed,
        })
    }

    /// Generates the accessor of a single type.
    pub fn generate_type(&self, type_name: &str) -> Result<Option<(String, TypeOutcome)>> {
        let collected = collect(self.files, type_name)?;
        let result = resolve(&collected)?;

        Ok(emit(&result, type_name).map(|accessor| {
            let outcome = TypeOutcome::Generated {
                values: result.len(),
                suppressed: result.suppressed.len(),
            };
            (accessor, outcome)
        }))
    }

    /// Generates accessors for all `types` into one file. A type that fails
    /// is reported and skipped.
    pub fn generate(&self, types: &[String], header: &FileHeader) -> GenerationReport {
        info!("Starting enum generation for {} type(s)", types.len());
        let mut accessors = Vec::new();
        let mut reports = Vec::with_capacity(types.len());

        for type_name in types {
            let outcome = match self.generate_type(type_name) {
                Ok(Some((accessor, outcome))) => {
                    if let TypeOutcome::Generated { values, suppressed } = &outcome {
                        info!(
                            type_name = %type_name,
                            values,
                            suppressed,
                            "Generated Enum() accessor"
                        );
                    }
                    accessors.push(accessor);
                    outcome
                }
                Ok(None) => {
                    warn!(type_name = %type_name, "No values found, skipping type");
                    TypeOutcome::Empty
                }
                Err(e) => {
                    error!(type_name = %type_name, "Generation failed: {}", e);
                    TypeOutcome::Failed(e)
                }
            };
            reports.push(TypeReport {
                type_name: type_name.clone(),
                outcome,
            });
        }

        let source = match (self.files.first(), accessors.is_empty()) {
            (Some(file), false) => {
                let text = render_file(header, &file.package, accessors.iter().map(String::as_str));
                Some(format_or_verbatim(self.formatter.as_ref(), text))
            }
            _ => None,
        };

        GenerationReport {
            types: reports,
            source,
        }
    }
}

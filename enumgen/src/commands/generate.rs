//! Generate command - writes Enum() accessors for the requested types.

use crate::cli::{Cli, GenerateArgs};
use crate::workspace_scanner::{PackageScanner, package_dir};
use convert_case::{Case, Casing};
use enumgen_core::{
    config::EnumgenConfig,
    enumerate::FileHeader,
    error::{EnumgenError, Result},
    format::Gofmt,
    generator::EnumGenerator,
    source::parse_go_files,
};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Runs generation with the types from the configuration file.
pub fn run_default(cli: &Cli) -> Result<()> {
    run(cli, GenerateArgs::default())
}

/// Runs the generate command.
pub fn run(cli: &Cli, args: GenerateArgs) -> Result<()> {
    let config = match EnumgenConfig::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    let types = if args.types.is_empty() {
        config.generate.types.clone()
    } else {
        args.types.clone()
    };
    let Some(first_type) = types.first() else {
        return Err(EnumgenError::config(
            "no types to generate; pass --type or set [generate] types in enumgen.toml",
        ));
    };

    let paths = PackageScanner::new(config.generate.include_tests).scan(&args.paths)?;
    let files = parse_go_files(&paths)?;
    debug!("Parsed {} file(s) of package {}", files.len(), files[0].package);

    let mut generator = EnumGenerator::new(&files);
    if config.format.enabled && !args.no_format {
        generator = generator.with_formatter(Gofmt::new(config.format.command.as_str()));
    } else {
        debug!("Formatting disabled");
    }

    let header = FileHeader::new(std::env::args().skip(1));
    let report = generator.generate(&types, &header);

    let output = args
        .output
        .clone()
        .or_else(|| config.generate.output.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| {
            default_output_path(&package_dir(&paths), first_type, &config.generate.output_suffix)
        });

    if let Some(file) = report.write(&output)? {
        info!(
            "Generated {} accessor(s) into {:?}",
            report.generated_count(),
            file.path
        );
    }

    report.check()
}

/// `<dir>/<snake_case type><suffix>`, e.g. `pkg/day_of_week_enum.go`.
pub fn default_output_path(dir: &Path, type_name: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{}{}", type_name.to_case(Case::Snake), suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("pkg"), "DayOfWeek", "_enum.go"),
            PathBuf::from("pkg/day_of_week_enum.go")
        );
        assert_eq!(
            default_output_path(Path::new("."), "Day", "_enum.go"),
            PathBuf::from("./day_enum.go")
        );
    }
}

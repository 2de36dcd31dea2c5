//! Inspect command - displays the resolved values of types.

use crate::cli::{Cli, InspectArgs, InspectFormat};
use crate::workspace_scanner::PackageScanner;
use enumgen_core::{
    config::EnumgenConfig,
    enumerate::IntegerKind,
    error::Result,
    generator::{EnumGenerator, Inspection},
    source::parse_go_files,
};
use tracing::error;

/// Runs the inspect command.
pub fn run(cli: &Cli, args: InspectArgs) -> Result<()> {
    let config = EnumgenConfig::load(cli.config.as_deref())?;
    let paths = PackageScanner::new(config.generate.include_tests).scan(&args.paths)?;
    let files = parse_go_files(&paths)?;
    let generator = EnumGenerator::new(&files);

    let inspections = args
        .types
        .iter()
        .map(|type_name| {
            generator.inspect(type_name).inspect_err(|e| {
                error!("Failed to resolve {}: {}", type_name, e);
            })
        })
        .collect::<Result<Vec<_>>>()?;

    match args.format {
        InspectFormat::Pretty => {
            for inspection in &inspections {
                print!("{}", render_pretty(inspection));
            }
        }
        InspectFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&inspections)?);
        }
    }

    Ok(())
}

fn kind_name(kind: IntegerKind) -> String {
    match kind {
        IntegerKind::Signed { bits } => format!("int{}", bits),
        IntegerKind::Unsigned { bits } => format!("uint{}", bits),
    }
}

fn render_pretty(inspection: &Inspection) -> String {
    let mut out = format!(
        "\n=== {} ({}) ===\n\n",
        inspection.type_name,
        kind_name(inspection.kind)
    );

    if inspection.constants.is_empty() {
        out.push_str("  (no constants)\n");
        return out;
    }

    let width = inspection
        .constants
        .iter()
        .chain(inspection.suppressed.iter().map(|s| &s.constant))
        .map(|c| c.identifier.len())
        .max()
        .unwrap_or(0);

    for constant in &inspection.constants {
        out.push_str(&format!(
            "  {:<width$} = {}\n",
            constant.identifier, constant.value
        ));
    }

    if !inspection.suppressed.is_empty() {
        out.push_str("\nSuppressed duplicates:\n");
        for suppressed in &inspection.suppressed {
            out.push_str(&format!(
                "  {:<width$} = {} (duplicate of {})\n",
                suppressed.constant.identifier, suppressed.constant.value, suppressed.duplicate_of
            ));
        }
    }

    out
}

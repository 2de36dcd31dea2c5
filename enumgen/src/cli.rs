//! Command-line interface definitions for enumgen.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// enumgen - generates Enum() accessors listing the values of Go constant groups
#[derive(Parser, Debug)]
#[command(name = "enumgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to enumgen.toml configuration file
    #[arg(short, long, global = true, env = "ENUMGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate Enum() accessors into a Go file (default)
    Generate(GenerateArgs),

    /// Show the resolved values of types without generating anything
    Inspect(InspectArgs),

    /// Initialize a new enumgen.toml configuration file
    Init(InitArgs),
}

// ============================================================================
// Generate Arguments
// ============================================================================

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Comma-separated list of type names (overrides config)
    #[arg(short = 't', long = "type", value_delimiter = ',')]
    pub types: Vec<String>,

    /// Output file (default: <snake_case type>_enum.go in the package directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write generated code without running the formatter
    #[arg(long)]
    pub no_format: bool,

    /// Go files or package directories (default: current directory)
    pub paths: Vec<PathBuf>,
}

// ============================================================================
// Inspect Arguments
// ============================================================================

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Comma-separated list of type names
    #[arg(short = 't', long = "type", value_delimiter = ',', required = true)]
    pub types: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: InspectFormat,

    /// Go files or package directories (default: current directory)
    pub paths: Vec<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InspectFormat {
    /// Human-readable output
    Pretty,
    /// JSON output
    Json,
}

// ============================================================================
// Init Arguments
// ============================================================================

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from([
            "enumgen", "-vv", "generate", "--type", "Day,Month", "--no-format", "a.go", "pkg",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Generate(args)) => {
                assert_eq!(args.types, vec!["Day", "Month"]);
                assert!(args.no_format);
                assert_eq!(args.paths, vec![PathBuf::from("a.go"), PathBuf::from("pkg")]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::parse_from(["enumgen", "-q"]);
        assert!(cli.quiet);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_inspect_requires_type() {
        assert!(Cli::try_parse_from(["enumgen", "inspect"]).is_err());

        let cli = Cli::parse_from(["enumgen", "inspect", "-t", "Day", "--format", "json"]);
        match cli.command {
            Some(Commands::Inspect(args)) => assert_eq!(args.format, InspectFormat::Json),
            other => panic!("unexpected command {:?}", other),
        }
    }
}

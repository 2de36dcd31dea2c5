use crate::error::{EnumgenError, Result};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, error, info, trace, warn};

/// Name of the configuration file searched for in the current directory and
/// its ancestors.
pub const CONFIG_FILE_NAME: &str = "enumgen.toml";

/// Suffix appended to the snake_cased type name to build the default output
/// file name.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_enum.go";

pub const DEFAULT_FORMAT_COMMAND: &str = "gofmt";

/// Pattern to match ${VAR_NAME} or ${VAR_NAME:-default}
static ENV_VAR_PATTERN: LazyLock<std::result::Result<regex::Regex, regex::Error>> =
    LazyLock::new(|| regex::Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}"));

/// Settings for the `generate` command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Types generated when none are given on the command line.
    pub types: Vec<String>,

    /// Output file. Supports `${VAR}` and `${VAR:-default}`.
    pub output: Option<String>,

    pub output_suffix: String,

    /// Also read `_test.go` files.
    pub include_tests: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            types: Vec::new(),
            output: None,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            include_tests: false,
        }
    }
}

/// Settings for formatting generated code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FormatConfig {
    pub enabled: bool,

    /// Command that reads Go source on stdin and writes it formatted to stdout.
    pub command: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: DEFAULT_FORMAT_COMMAND.to_string(),
        }
    }
}

/// Root of `enumgen.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EnumgenConfig {
    #[serde(default)]
    pub generate: GenerateConfig,
    #[serde(default)]
    pub format: FormatConfig,
}

impl EnumgenConfig {
    /// Load the configuration.
    ///
    /// An explicit path must exist. Otherwise `enumgen.toml` is searched for
    /// from the current directory upwards, and defaults are used when none is
    /// found.
    pub fn load(explicit: Option<&Path>) -> Result<EnumgenConfig> {
        if let Some(path) = explicit {
            info!("Loading configuration from {:?}", path);
            return Self::from_file(path);
        }

        let current_dir = env::current_dir()?;
        match Self::find_config_file(&current_dir) {
            Some(path) => {
                info!("Found configuration file at: {:?}", path);
                Self::from_file(&path)
            }
            None => {
                debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                Ok(Self::default())
            }
        }
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: &Path) -> Result<EnumgenConfig> {
        let contents = fs::read_to_string(path).map_err(|e| {
            error!("Failed to read configuration file {:?}: {}", path, e);
            EnumgenError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        debug!("Configuration file size: {} bytes", contents.len());

        Self::parse(&contents)
    }

    /// Parse configuration text and apply environment variable substitution.
    pub fn parse(contents: &str) -> Result<EnumgenConfig> {
        let mut config: EnumgenConfig = toml::from_str(contents).map_err(|e| {
            error!("Failed to parse TOML configuration: {}", e);
            EnumgenError::from(e)
        })?;

        if let Some(output) = &config.generate.output {
            config.generate.output = Some(Self::substitute_env_vars(output)?);
        }
        config.format.command = Self::substitute_env_vars(&config.format.command)?;

        debug!(
            "Configuration: types={:?}, output={:?}, format enabled={}",
            config.generate.types, config.generate.output, config.format.enabled
        );
        Ok(config)
    }

    /// Searches for `enumgen.toml` starting from `start` and traversing up to
    /// the root.
    pub fn find_config_file(start: &Path) -> Option<PathBuf> {
        debug!("Starting config file search from: {:?}", start);

        for path in start.ancestors() {
            let config_path = path.join(CONFIG_FILE_NAME);
            trace!("Checking for config at: {:?}", config_path);
            if config_path.is_file() {
                return Some(config_path);
            }
        }

        None
    }

    /// Substitute environment variables in config strings
    /// Supports ${VAR_NAME:-default} syntax
    pub fn substitute_env_vars(value: &str) -> Result<String> {
        trace!("Substituting environment variables in: {}", value);
        let re = ENV_VAR_PATTERN.as_ref().map_err(|e| EnumgenError::from(e.clone()))?;
        let mut result = value.to_string();

        for cap in re.captures_iter(value) {
            let var_name = &cap[1];
            let default_value = cap.get(2).map(|m| m.as_str());

            let replacement = match env::var(var_name) {
                Ok(val) => {
                    debug!("Resolved environment variable: {}", var_name);
                    val
                }
                Err(_) => match default_value {
                    Some(default) => {
                        warn!(
                            "Environment variable {} not set, using default: {}",
                            var_name, default
                        );
                        default.to_string()
                    }
                    None => {
                        error!(
                            "Environment variable {} not set and no default provided",
                            var_name
                        );
                        return Err(EnumgenError::EnvVarNotSet(var_name.to_string()));
                    }
                },
            };

            result = result.replace(&cap[0], &replacement);
        }

        Ok(result)
    }

    /// Commented template written by `enumgen init`.
    pub fn template() -> &'static str {
        r#"# enumgen configuration

[generate]
# Types to generate when no --type is given
types = []

# Output file; defaults to <snake_case first type>_enum.go in the package
# directory. ${VAR} and ${VAR:-default} are substituted.
# output = "${ENUMGEN_OUTPUT:-day_enum.go}"

output_suffix = "_enum.go"

# Read _test.go files as well
include_tests = false

[format]
# Pipe generated code through a gofmt-compatible command
enabled = true
command = "gofmt"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EnumgenConfig::default();
        assert!(config.generate.types.is_empty());
        assert_eq!(config.generate.output, None);
        assert_eq!(config.generate.output_suffix, "_enum.go");
        assert!(!config.generate.include_tests);
        assert!(config.format.enabled);
        assert_eq!(config.format.command, "gofmt");
    }

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(EnumgenConfig::parse("").unwrap(), EnumgenConfig::default());
    }

    #[test]
    fn test_parse_partial_sections() {
        let config = EnumgenConfig::parse(
            r#"
            [generate]
            types = ["Day", "Month"]

            [format]
            enabled = false
        "#,
        )
        .unwrap();

        assert_eq!(config.generate.types, vec!["Day", "Month"]);
        assert_eq!(config.generate.output_suffix, "_enum.go");
        assert!(!config.format.enabled);
        assert_eq!(config.format.command, "gofmt");
    }

    #[test]
    fn test_parse_rejects_unknown_types() {
        let err = EnumgenConfig::parse("[generate]\ntypes = 3\n").unwrap_err();
        assert!(matches!(err, EnumgenError::Toml(_)));
    }

    #[test]
    fn test_template_parses() {
        let config = EnumgenConfig::parse(EnumgenConfig::template()).unwrap();
        assert_eq!(config, EnumgenConfig::default());
    }

    #[test]
    fn test_output_substitution() {
        temp_env::with_var("ENUMGEN_TEST_OUT_DIR", Some("gen"), || {
            let config = EnumgenConfig::parse(
                "[generate]\noutput = \"${ENUMGEN_TEST_OUT_DIR}/${ENUMGEN_TEST_UNSET_NAME:-day}_enum.go\"\n",
            )
            .unwrap();
            assert_eq!(config.generate.output.as_deref(), Some("gen/day_enum.go"));
        });
    }

    // ==================== substitute_env_vars Tests ====================

    #[test]
    fn test_substitute_env_vars_basic() {
        temp_env::with_var("ENUMGEN_TEST_VAR_BASIC", Some("hello"), || {
            let result = EnumgenConfig::substitute_env_vars("${ENUMGEN_TEST_VAR_BASIC}").unwrap();
            assert_eq!(result, "hello");
        });
    }

    #[test]
    fn test_substitute_env_vars_default() {
        temp_env::with_var_unset("ENUMGEN_TEST_VAR_DEFAULT", || {
            let result =
                EnumgenConfig::substitute_env_vars("${ENUMGEN_TEST_VAR_DEFAULT:-fallback}")
                    .unwrap();
            assert_eq!(result, "fallback");
        });
    }

    #[test]
    fn test_substitute_env_vars_missing_returns_error() {
        temp_env::with_var_unset("ENUMGEN_TEST_DEFINITELY_NOT_SET", || {
            let err =
                EnumgenConfig::substitute_env_vars("${ENUMGEN_TEST_DEFINITELY_NOT_SET}").unwrap_err();
            assert!(matches!(err, EnumgenError::EnvVarNotSet(ref name) if name == "ENUMGEN_TEST_DEFINITELY_NOT_SET"));
        });
    }

    #[test]
    fn test_substitute_env_vars_preserves_non_matching_braces() {
        let result = EnumgenConfig::substitute_env_vars("{not_a_var}").unwrap();
        assert_eq!(result, "{not_a_var}");
    }

    // ==================== find_config_file Tests ====================

    #[test]
    fn test_find_config_file_in_ancestor() {
        let temp_dir = TempDir::new().unwrap();
        let grandchild = temp_dir.path().join("child").join("grandchild");
        fs::create_dir_all(&grandchild).unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "# test config").unwrap();

        let found = EnumgenConfig::find_config_file(&grandchild).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_find_config_file_prefers_nearest() {
        let temp_dir = TempDir::new().unwrap();
        let child = temp_dir.path().join("child");
        fs::create_dir_all(&child).unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "").unwrap();
        fs::write(child.join(CONFIG_FILE_NAME), "").unwrap();

        let found = EnumgenConfig::find_config_file(&child).unwrap();
        assert_eq!(found, child.join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.toml");
        let err = EnumgenConfig::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, EnumgenError::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[generate]\ninclude_tests = true\n").unwrap();

        let config = EnumgenConfig::from_file(&path).unwrap();
        assert!(config.generate.include_tests);
    }
}

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

pub const DEFAULT_PARAMETER_PREFIX: &str = "@";
pub const DEFAULT_IDENTITY_QUERY: &str = "SELECT LAST_INSERT_ID() id";

/// SQL dialect settings shared by every statement a builder renders
#[derive(Clone, Debug, PartialEq, Validate, Serialize, Deserialize)]
pub struct DialectConfig {
    /// Placeholder prefix for bound parameters (`@p0`)
    #[validate(length(min = 1, max = 4, message = "Parameter prefix must be 1-4 characters"))]
    #[serde(default = "default_parameter_prefix")]
    pub parameter_prefix: String,

    /// Query returning the id generated by the last insert on the same connection
    #[validate(custom(function = "validate_identity_query"))]
    #[serde(default = "default_identity_query")]
    pub identity_query: String,

    /// Log every rendered statement at debug level
    #[serde(default)]
    pub log_statements: bool,
}

fn default_parameter_prefix() -> String {
    DEFAULT_PARAMETER_PREFIX.to_string()
}

fn default_identity_query() -> String {
    DEFAULT_IDENTITY_QUERY.to_string()
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            parameter_prefix: default_parameter_prefix(),
            identity_query: default_identity_query(),
            log_statements: false,
        }
    }
}

impl DialectConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            parameter_prefix: env::var("SQLCRAFT_PARAMETER_PREFIX")
                .unwrap_or_else(|_| default_parameter_prefix()),
            identity_query: env::var("SQLCRAFT_IDENTITY_QUERY")
                .unwrap_or_else(|_| default_identity_query()),
            log_statements: parse_env_var("SQLCRAFT_LOG_STATEMENTS", "false")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply command line overrides on top of a loaded configuration
    pub fn apply_cli(mut self, cli: CliConfig) -> Result<Self, ConfigError> {
        if let Some(prefix) = cli.parameter_prefix {
            self.parameter_prefix = prefix;
        }
        self.log_statements |= cli.log_statements;

        self.validate()?;
        Ok(self)
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub parameter_prefix: Option<String>,
    pub log_statements: bool,
}

fn validate_identity_query(query: &str) -> Result<(), ValidationError> {
    let is_select = query
        .trim_start()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("select"));
    if is_select {
        Ok(())
    } else {
        let mut error = ValidationError::new("identity_query");
        error.message = Some("Identity query must be a SELECT statement".into());
        Err(error)
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}

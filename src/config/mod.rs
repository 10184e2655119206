// ABOUTME: Configuration loading for db-bootstrap
// ABOUTME: Connection parameters, report settings and the named statement catalog

pub mod properties;

pub use properties::Properties;

use std::fmt;
use thiserror::Error;

use crate::db::ExtractionStrategy;
use crate::resources::{ResourceError, ResourceLoader};

/// Connection properties resource
pub const APPLICATION_PATH: &str = "application.properties";

/// Statement definitions resource
pub const QUERIES_PATH: &str = "sql/queries.properties";

/// Statement run by the report when none is configured
pub const DEFAULT_STATEMENT: &str = "Person.selectAll";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("missing configuration key: {0}")]
    MissingKey(String),
    #[error("unknown extraction strategy: {0}")]
    UnknownStrategy(String),
    #[error("invalid log level for {key}: {value}")]
    InvalidLevel { key: String, value: String },
}

/// Database connection parameters.
///
/// Missing keys are kept as `None`; nothing here checks that the values
/// make sense, the connection attempt does.
#[derive(Clone, Default, PartialEq)]
pub struct ConnectionParams {
    pub url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl ConnectionParams {
    pub fn from_properties(props: &Properties) -> Self {
        let lookup = |name: &str| {
            props
                .get(&format!("db.{}", name))
                .or_else(|| props.get(&format!("jdbc.{}", name)))
                .map(str::to_string)
        };

        Self {
            url: lookup("url"),
            user: lookup("user"),
            password: lookup("password"),
        }
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Which statement the report runs
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    pub statement: String,
}

impl ReportSettings {
    pub fn from_properties(props: &Properties) -> Self {
        Self {
            statement: props
                .get("report.statement")
                .filter(|name| !name.is_empty())
                .unwrap_or(DEFAULT_STATEMENT)
                .to_string(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            statement: DEFAULT_STATEMENT.to_string(),
        }
    }
}

/// Everything read from the application properties resource
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub connection: ConnectionParams,
    pub report: ReportSettings,
}

impl AppConfig {
    pub fn from_properties(props: &Properties) -> Self {
        Self {
            connection: ConnectionParams::from_properties(props),
            report: ReportSettings::from_properties(props),
        }
    }

    /// Load the application properties resource
    pub fn load(loader: &ResourceLoader) -> Result<Self, ConfigError> {
        let props = loader.load_properties(APPLICATION_PATH)?;
        Ok(Self::from_properties(&props))
    }
}

/// A named query together with how to extract and print its rows
#[derive(Debug, Clone, PartialEq)]
pub struct StatementDefinition {
    pub name: String,
    pub statement: String,
    pub strategy: Vec<ExtractionStrategy>,
    pub format: String,
}

/// Statement definitions keyed by logical name (`Person.selectAll`)
#[derive(Debug, Clone, Default)]
pub struct StatementCatalog {
    props: Properties,
}

impl StatementCatalog {
    pub fn from_properties(props: Properties) -> Self {
        Self { props }
    }

    /// Load the statement definitions resource
    pub fn load(loader: &ResourceLoader) -> Result<Self, ConfigError> {
        Ok(Self::from_properties(loader.load_properties(QUERIES_PATH)?))
    }

    /// Logical names of every statement that has SQL text
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .props
            .keys()
            .filter_map(|key| key.strip_suffix(".statement"))
            .collect();
        names.sort_unstable();
        names
    }

    /// Build the definition for `name` from its `.statement`, `.strategy`
    /// and `.format` keys
    pub fn definition(&self, name: &str) -> Result<StatementDefinition, ConfigError> {
        let statement = self.require(name, "statement")?;
        let strategy = parse_strategies(self.require(name, "strategy")?)?;
        let format = self.require(name, "format")?;

        Ok(StatementDefinition {
            name: name.to_string(),
            statement: statement.to_string(),
            strategy,
            format: format.to_string(),
        })
    }

    fn require(&self, name: &str, attribute: &str) -> Result<&str, ConfigError> {
        let key = format!("{}.{}", name, attribute);
        self.props.get(&key).ok_or(ConfigError::MissingKey(key))
    }
}

/// Parse a comma-separated list of strategy tags such as `INT,STRING`
pub fn parse_strategies(list: &str) -> Result<Vec<ExtractionStrategy>, ConfigError> {
    list.split(',')
        .map(|tag| tag.trim().parse())
        .collect()
}

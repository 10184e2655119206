// ABOUTME: Process-wide logging setup from the logging properties resource
// ABOUTME: Maps ".level" style entries onto a tracing-subscriber EnvFilter

use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, Properties};
use crate::resources::ResourceLoader;

/// Logging configuration resource
pub const LOGGING_PATH: &str = "logging.properties";

const DEFAULT_FILTER: &str = "info";

/// Translate a level name into a filter level. Accepts the usual Rust
/// names as well as the SEVERE/WARNING/FINE family.
pub fn level_name(value: &str) -> Option<&'static str> {
    let level = match value.trim().to_ascii_uppercase().as_str() {
        "OFF" => "off",
        "ERROR" | "SEVERE" => "error",
        "WARN" | "WARNING" => "warn",
        "INFO" => "info",
        "DEBUG" | "CONFIG" | "FINE" => "debug",
        "TRACE" | "FINER" | "FINEST" | "ALL" => "trace",
        _ => return None,
    };
    Some(level)
}

/// Build filter directives from logging properties.
///
/// `.level` (or `level`) sets the default; `<target>.level` sets the level for
/// one target, with `.` in the target name read as `::`. Other keys are
/// ignored.
pub fn filter_directives(props: &Properties) -> Result<String, ConfigError> {
    let mut default = None;
    let mut targets = Vec::new();

    for key in props.keys() {
        let target = match key.strip_suffix("level") {
            Some("") | Some(".") => None,
            Some(prefix) => match prefix.strip_suffix('.') {
                Some(name) => Some(name),
                None => continue,
            },
            None => continue,
        };

        let value = props.get(key).unwrap_or_default();
        let level = level_name(value).ok_or_else(|| ConfigError::InvalidLevel {
            key: key.to_string(),
            value: value.to_string(),
        })?;

        match target {
            None => default = Some(level),
            Some(name) => targets.push(format!("{}={}", name.replace('.', "::"), level)),
        }
    }

    targets.sort();
    let mut directives = vec![default.unwrap_or(DEFAULT_FILTER).to_string()];
    directives.extend(targets);
    Ok(directives.join(","))
}

/// Install the global subscriber using the logging resource. `RUST_LOG`
/// takes precedence over the file when set.
pub fn init(loader: &ResourceLoader) -> Result<(), ConfigError> {
    let directives = match std::env::var("RUST_LOG") {
        Ok(env) => env,
        Err(_) => filter_directives(&loader.load_properties(LOGGING_PATH)?)?,
    };

    let filter = EnvFilter::try_new(&directives).map_err(|_| ConfigError::InvalidLevel {
        key: "filter".to_string(),
        value: directives.clone(),
    })?;
    install(filter);
    Ok(())
}

/// Configure logging, falling back to the default filter when the logging
/// resource is missing or invalid
pub fn init_or_default(loader: &ResourceLoader) {
    if let Err(e) = init(loader) {
        install(EnvFilter::new(DEFAULT_FILTER));
        log::warn!("using default logging configuration: {}", e);
    }
}

fn install(filter: EnvFilter) {
    // Fails only if a subscriber is already installed, which is fine
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names() {
        assert_eq!(level_name("INFO"), Some("info"));
        assert_eq!(level_name("warning"), Some("warn"));
        assert_eq!(level_name("SEVERE"), Some("error"));
        assert_eq!(level_name("FINEST"), Some("trace"));
        assert_eq!(level_name("loud"), None);
    }

    #[test]
    fn test_filter_directives() {
        let props = Properties::parse(
            "handlers=console\n.level=WARNING\ndb_bootstrap_lib.db.level=FINE\nrusqlite.level=off\n",
        );
        assert_eq!(
            filter_directives(&props).unwrap(),
            "warn,db_bootstrap_lib::db=debug,rusqlite=off"
        );
    }

    #[test]
    fn test_filter_default_level() {
        assert_eq!(filter_directives(&Properties::default()).unwrap(), "info");
    }

    #[test]
    fn test_invalid_level() {
        let props = Properties::parse(".level=LOUD\n");
        assert!(matches!(
            filter_directives(&props),
            Err(ConfigError::InvalidLevel { key, .. }) if key == ".level"
        ));
    }
}

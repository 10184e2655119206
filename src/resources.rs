// ABOUTME: Resource lookup for bundled configuration and SQL scripts
// ABOUTME: Resolves logical resource paths under a resource root directory

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::Properties;

/// Environment variable that overrides the resource root
pub const RESOURCES_ENV: &str = "DB_BOOTSTRAP_RESOURCES";

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("could not load the resource file: {0}")]
    NotFound(String),
    #[error("failed to read resource {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Loads named resources relative to a root directory
#[derive(Debug, Clone)]
pub struct ResourceLoader {
    root: PathBuf,
}

impl ResourceLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find the resource root, checking the override variable first and then
    /// the usual install locations
    pub fn discover() -> Self {
        if let Ok(dir) = std::env::var(RESOURCES_ENV) {
            return Self::new(dir);
        }

        let mut candidates = vec![PathBuf::from("resources")];

        if let Ok(exe) = std::env::current_exe() {
            if let Some(exe_dir) = exe.parent() {
                candidates.push(exe_dir.join("resources"));
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("db-bootstrap").join("resources"));
        }

        let root = candidates
            .into_iter()
            .find(|dir| dir.is_dir())
            .unwrap_or_else(|| PathBuf::from("resources"));

        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open a resource as a byte stream
    pub fn load(&self, path: &str) -> Result<impl Read, ResourceError> {
        let full = self.root.join(path);
        if !full.is_file() {
            return Err(ResourceError::NotFound(path.to_string()));
        }

        File::open(&full).map_err(|source| ResourceError::Io {
            path: path.to_string(),
            source,
        })
    }

    /// Read a resource as UTF-8 text with all lines joined together.
    ///
    /// Line terminators are dropped, not replaced, so a multi-line script
    /// comes back as one logical line.
    pub fn read_as_text(&self, path: &str) -> Result<String, ResourceError> {
        let reader = BufReader::new(self.load(path)?);

        let mut text = String::new();
        for line in reader.lines() {
            let line = line.map_err(|source| ResourceError::Io {
                path: path.to_string(),
                source,
            })?;
            text.push_str(&line);
        }
        Ok(text)
    }

    /// Read and parse a properties resource
    pub fn load_properties(&self, path: &str) -> Result<Properties, ResourceError> {
        let mut contents = String::new();
        self.load(path)?
            .read_to_string(&mut contents)
            .map_err(|source| ResourceError::Io {
                path: path.to_string(),
                source,
            })?;
        Ok(Properties::parse(&contents))
    }
}

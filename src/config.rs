//! Configuration manager for registra.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Instance name.
    #[serde(default)]
    pub name: String,
    /// Listening port from the configuration file.
    /// The `PORT` environment variable takes precedence.
    port: Option<u16>,
    #[serde(skip)]
    path: PathBuf,
}

impl Configuration {
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Reads the `config.yaml` file from the specified path or the
    /// default location.
    pub fn read(self) -> Arc<Self> {
        let file_path = if self.path.is_file() {
            &self.path
        } else {
            &Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        };

        match File::open(file_path) {
            Ok(file) => match serde_yaml::from_reader::<_, Configuration>(file) {
                Ok(config) => Arc::new(config),
                Err(err) => Arc::new(self.error(err)),
            },
            Err(err) => Arc::new(self.error(err)),
        }
    }

    /// Listening port: `PORT` variable first, then the file, then 8080.
    pub fn port(&self) -> u16 {
        self.resolve_port(std::env::var("PORT").ok().and_then(|port| port.parse().ok()))
    }

    fn resolve_port(&self, env_port: Option<u16>) -> u16 {
        env_port.or(self.port).unwrap_or(DEFAULT_PORT)
    }

    /// Return a default configuration as fallback.
    fn error(&self, err: impl std::error::Error) -> Self {
        tracing::error!(error = %err, "`config.yaml` file not found");
        Self::default()
    }
}

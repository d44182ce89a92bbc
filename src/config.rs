use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};

/// Configuration for the HuddleBooks server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Address to bind the HTTP server to
    pub host: String,
    /// Port to bind the HTTP server to
    pub port: u16,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

/// Command line arguments for the application
#[derive(Parser, Debug)]
#[clap(name = "huddlebooks", about = "Association financial oversight server")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Bind address
    #[clap(long, env = "HUDDLEBOOKS_HOST")]
    pub host: Option<String>,

    /// Bind port
    #[clap(long, env = "HUDDLEBOOKS_PORT")]
    pub port: Option<u16>,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            host: update.host.unwrap_or(self.host),
            port: update.port.unwrap_or(self.port),
        }
    }

    /// The socket address to serve on
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// Returns the base (default) configuration
pub fn base_config(config_path: Option<PathBuf>) -> Config {
    let database_url = config_path.map_or("huddlebooks.db".to_string(), |path| {
        path.join("huddlebooks.db").to_string_lossy().to_string()
    });

    Config {
        database_url,
        host: "127.0.0.1".to_string(),
        port: 3000,
    }
}

/// Loads configuration from a TOML file
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, String> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    match fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<ConfigUpdate>(&content) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", config_path);
                Ok(config)
            }
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                Err(format!("Failed to parse config file: {}", e))
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            Err(format!("Failed to read config file: {}", e))
        }
    }
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url,
        host: args.host,
        port: args.port,
    }
}

/// Gets the complete configuration by combining defaults with values from
/// the config file, environment variables, and command line arguments, in
/// order of increasing precedence
pub fn get_config(args: CliArgs) -> Config {
    let mut config_path = match ProjectDirs::from("com", "huddlebooks", "huddlebooks") {
        Some(proj_dirs) => Some(PathBuf::from(proj_dirs.config_dir())),
        None => {
            warn!("Could not determine XDG config directory, skipping config file");
            None
        }
    };

    config_path = config_path.and_then(|path| {
        if !path.exists() {
            info!("Config path not found at {:?}, using defaults", path);
            None
        } else {
            Some(path)
        }
    });

    let base = base_config(config_path.clone());

    let config = base
        .apply_update(config_from_file(config_path.map(|p| p.join("config.toml"))).unwrap_or_default())
        .apply_update(config_from_args(args));

    info!(
        "Final configuration: database_url={}, bind={}:{}",
        config.database_url, config.host, config.port
    );

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::{TempDir, tempdir};

    fn create_test_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let config_path = dir.path().join("config.toml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        config_path
    }

    #[test]
    fn test_apply_update_with_all_values() {
        let config = base_config(None);
        let update = ConfigUpdate {
            database_url: Some("updated.db".to_string()),
            host: Some("0.0.0.0".to_string()),
            port: Some(8080),
        };

        let updated = config.apply_update(update);

        assert_eq!(updated.database_url, "updated.db");
        assert_eq!(updated.host, "0.0.0.0");
        assert_eq!(updated.port, 8080);
    }

    #[test]
    fn test_apply_update_with_partial_values() {
        let config = base_config(None);
        let update = ConfigUpdate {
            database_url: Some("updated.db".to_string()),
            ..Default::default()
        };

        let updated = config.apply_update(update);

        assert_eq!(updated.database_url, "updated.db");
        assert_eq!(updated.host, "127.0.0.1"); // Unchanged
        assert_eq!(updated.port, 3000); // Unchanged
    }

    #[test]
    fn test_config_from_file_parses_toml() {
        let dir = tempdir().unwrap();
        let path = create_test_config_file(&dir, "database_url = \"from_file.db\"\nport = 4000\n");

        let update = config_from_file(Some(path)).unwrap();
        assert_eq!(update.database_url, Some("from_file.db".to_string()));
        assert_eq!(update.port, Some(4000));
        assert_eq!(update.host, None);
    }

    #[test]
    fn test_config_from_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.toml");

        let update = config_from_file(Some(path)).unwrap();
        assert!(update.database_url.is_none());
    }

    #[test]
    fn test_config_from_invalid_file_errors() {
        let dir = tempdir().unwrap();
        let path = create_test_config_file(&dir, "not valid toml [[[");

        assert!(config_from_file(Some(path)).is_err());
    }

    #[test]
    fn test_bind_addr() {
        let config = base_config(None);
        assert_eq!(config.bind_addr().unwrap().port(), 3000);
    }
}

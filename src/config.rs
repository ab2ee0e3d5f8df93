use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_local_path")]
    pub local_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Public base URL used to build share links and signed blob links
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upload size ceiling in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// HMAC secret for signed blob links; generated and persisted when unset
    #[serde(default)]
    pub link_secret: String,
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    1408
}

fn default_db_path() -> String {
    "data/filedrop.db".to_string()
}

fn default_local_path() -> String {
    "data/blobs".to_string()
}

fn default_base_url() -> String {
    "http://localhost:1408".to_string()
}

fn default_max_file_size() -> u64 {
    50 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            local_path: default_local_path(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_file_size: default_max_file_size(),
            link_secret: String::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            storage: StorageConfig::default(),
            app: AppConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_env_overrides();
        config.ensure_directories()?;
        config.ensure_link_secret()?;
        Ok(config)
    }

    /// Load configuration from config.toml
    fn load_from_file() -> anyhow::Result<Self> {
        let config_paths = ["config.toml", "data/config.toml"];

        for path in config_paths {
            if Path::new(path).exists() {
                let content = fs::read_to_string(path)?;
                let config: Config = toml::from_str(&content)?;
                tracing::info!("Loaded configuration from {}", path);
                return Ok(config);
            }
        }

        tracing::info!("No configuration file found, using defaults");
        Ok(Config::default())
    }

    /// Apply environment variable overrides
    /// Format: FD_CONF_<SECTION>_<KEY>
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("FD_CONF_SERVER_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = env::var("FD_CONF_SERVER_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }

        if let Ok(val) = env::var("FD_CONF_DATABASE_PATH") {
            self.database.path = val;
        }

        if let Ok(val) = env::var("FD_CONF_STORAGE_LOCAL_PATH") {
            self.storage.local_path = val;
        }

        if let Ok(val) = env::var("FD_CONF_APP_BASE_URL") {
            if !val.trim().is_empty() {
                self.app.base_url = val;
            }
        }
        if let Ok(val) = env::var("FD_CONF_APP_MAX_FILE_SIZE") {
            if let Ok(size) = val.parse() {
                self.app.max_file_size = size;
            }
        }
        if let Ok(val) = env::var("FD_CONF_APP_LINK_SECRET") {
            if !val.trim().is_empty() {
                self.app.link_secret = val;
            }
        }
    }

    /// Ensure the link-signing secret is set and persisted across restarts
    fn ensure_link_secret(&mut self) -> anyhow::Result<()> {
        if self.app.link_secret.is_empty() {
            let secret_path = Path::new("data/.link_secret");

            if secret_path.exists() {
                let secret = fs::read_to_string(secret_path)?;
                self.app.link_secret = secret.trim().to_string();
                tracing::info!("Loaded persisted link secret from data/.link_secret");
            } else {
                let secret = uuid::Uuid::new_v4().to_string();

                if let Some(parent) = secret_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::write(secret_path, &secret)?;
                self.app.link_secret = secret;
                tracing::info!("Generated and persisted new link secret to data/.link_secret");
            }
        }
        Ok(())
    }

    /// Ensure required directories exist
    fn ensure_directories(&self) -> anyhow::Result<()> {
        if let Some(parent) = Path::new(&self.database.path).parent() {
            fs::create_dir_all(parent)?;
        }

        fs::create_dir_all(&self.storage.local_path)?;

        Ok(())
    }
}

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8000, worker_threads: Some(4) }
    }
}

/// Location of the flat-file record documents.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: String,
    #[serde(default = "default_products_file")]
    pub products_file: String,
    #[serde(default = "default_orders_file")]
    pub orders_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            products_file: default_products_file(),
            orders_file: default_orders_file(),
        }
    }
}

fn default_data_dir() -> String { "data".into() }
fn default_products_file() -> String { "products.json".into() }
fn default_orders_file() -> String { "orders.json".into() }

/// SMTP relay settings for order notifications. Credentials are normally
/// supplied via `EMAIL_*` environment variables rather than the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub pass: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self { host: String::new(), port: default_smtp_port(), user: String::new(), pass: String::new() }
    }
}

fn default_smtp_port() -> u16 { 465 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.data.normalize_from_env();
        self.data.validate()?;
        self.email.normalize_from_env();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be non-zero"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DataConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(dir) = std::env::var("WEBSHOP_DATA_DIR") {
            if !dir.trim().is_empty() {
                self.dir = dir;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.dir.trim().is_empty() {
            return Err(anyhow!("data.dir is empty; provide it in config.toml or WEBSHOP_DATA_DIR"));
        }
        if self.products_file.trim().is_empty() || self.orders_file.trim().is_empty() {
            return Err(anyhow!("data.products_file and data.orders_file must be non-empty"));
        }
        Ok(())
    }

    pub fn products_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.products_file)
    }

    pub fn orders_path(&self) -> PathBuf {
        Path::new(&self.dir).join(&self.orders_file)
    }
}

impl EmailConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("EMAIL_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("EMAIL_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Ok(user) = std::env::var("EMAIL_USER") {
            self.user = user;
        }
        if let Ok(pass) = std::env::var("EMAIL_PASS") {
            self.pass = pass;
        }
    }

    /// Whether enough is configured to build an SMTP transport.
    pub fn smtp_configured(&self) -> bool {
        !self.host.trim().is_empty() && !self.user.trim().is_empty() && !self.pass.trim().is_empty()
    }
}

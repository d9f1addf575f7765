//! Application configuration module / 应用配置模块
//!
//! Manages application configuration loaded from config.json
//! Creates default config file on first run / 首次运行时创建默认配置文件

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Result, SearchError};

/// Global configuration instance / 全局配置实例
static CONFIG: OnceCell<Arc<RwLock<AppConfig>>> = OnceCell::new();

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration / 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration / 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Search configuration / 搜索配置
    #[serde(default)]
    pub search: SearchConfig,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address / 服务器监听地址
    pub host: String,
    /// Server port / 服务器端口
    pub port: u16,
}

/// Database configuration / 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Data directory path / 数据目录路径
    pub data_dir: String,
    /// Database file path (relative to data_dir) / 数据库文件路径
    pub db_file: String,
}

/// Search configuration / 搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default page size for news lists / 默认分页大小
    pub page_size: usize,
    /// Page size for search results, falls back to page_size / 搜索分页大小
    #[serde(default)]
    pub search_page_size: Option<usize>,
    /// Try to use the FTS5 index (LIKE fallback otherwise) / 是否启用全文索引
    pub fts_enabled: bool,
    /// Maximum number of cached search sessions / 最大搜索会话数
    pub session_capacity: u64,
    /// Search session lifetime in seconds / 搜索会话有效期（秒）
    pub session_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8180,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            db_file: "news.db".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            search_page_size: None,
            fts_enabled: true,
            session_capacity: 1024,
            session_ttl_secs: 3600,
        }
    }
}

impl SearchConfig {
    /// Effective search page size / 实际搜索分页大小
    pub fn search_page_size(&self) -> usize {
        self.search_page_size.unwrap_or(self.page_size)
    }
}

impl AppConfig {
    /// Get the full database URL / 获取完整的数据库URL
    ///
    /// `DB_PATH` overrides the configured file / 环境变量 DB_PATH 优先
    pub fn get_database_url(&self) -> String {
        let db_path = match std::env::var("DB_PATH") {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => Path::new(&self.database.data_dir).join(&self.database.db_file),
        };
        format!("sqlite:{}?mode=rwc", db_path.to_string_lossy())
    }

    /// Get the full data directory path / 获取完整的数据目录路径
    pub fn get_data_dir(&self) -> PathBuf {
        PathBuf::from(&self.database.data_dir)
    }

    /// Get the server bind address / 获取服务器绑定地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Get the config file path / 获取配置文件路径
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config() -> Result<AppConfig> {
    load_config_from(&get_config_path())
}

fn load_config_from(config_path: &Path) -> Result<AppConfig> {
    if config_path.exists() {
        // Load existing config / 加载现有配置
        let content = std::fs::read_to_string(config_path)
            .map_err(|e| SearchError::Config(format!("Failed to read config file: {}", e)))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| SearchError::Config(format!("Failed to parse config file: {}", e)))?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        // Create default config / 创建默认配置
        let config = AppConfig::default();
        save_config_to(&config, config_path)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

fn save_config_to(config: &AppConfig, config_path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| SearchError::Config(format!("Failed to serialize config: {}", e)))?;

    std::fs::write(config_path, content)
        .map_err(|e| SearchError::Config(format!("Failed to write config file: {}", e)))?;

    Ok(())
}

/// Initialize global configuration / 初始化全局配置
pub fn init_config() -> Result<()> {
    let config = load_config()?;

    CONFIG
        .set(Arc::new(RwLock::new(config)))
        .map_err(|_| SearchError::Config("Config already initialized".to_string()))?;

    Ok(())
}

/// Get a read-only snapshot of current config / 获取当前配置的只读快照
///
/// Falls back to defaults before `init_config` has run / 未初始化时返回默认配置
pub fn config() -> AppConfig {
    CONFIG
        .get()
        .map(|config| config.read().clone())
        .unwrap_or_default()
}

// ==========================================
// 用量计费系统 - 服务配置
// ==========================================
// 来源: 环境变量（可由 .env 文件提供）
// ==========================================

use crate::config::error::ConfigError;
use std::collections::HashMap;
use std::str::FromStr;

/// 配置键
pub mod config_keys {
    pub const BIND_ADDR: &str = "BILLING_BIND_ADDR";
    pub const PORT: &str = "PORT";
    pub const MAX_UPLOAD_MB: &str = "BILLING_MAX_UPLOAD_MB";
    pub const LOG_FORMAT: &str = "BILLING_LOG_FORMAT";
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("期望 text/json，实际 {}", other)),
        }
    }
}

/// 服务配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    /// 单次上传请求体上限（字节）
    pub max_upload_bytes: usize,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8023,
            max_upload_bytes: 50 * 1024 * 1024,
            log_format: LogFormat::Text,
        }
    }
}

impl ServerConfig {
    /// 从进程环境变量读取（调用方负责先加载 .env）
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&std::env::vars().collect())
    }

    /// 从键值表读取，缺省项使用默认值
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = vars.get(config_keys::BIND_ADDR) {
            config.bind_addr = addr.trim().to_string();
        }
        if let Some(port) = parse_var::<u16>(vars, config_keys::PORT)? {
            config.port = port;
        }
        if let Some(mb) = parse_var::<usize>(vars, config_keys::MAX_UPLOAD_MB)? {
            config.max_upload_bytes =
                mb.checked_mul(1024 * 1024)
                    .ok_or_else(|| ConfigError::InvalidValue {
                        key: config_keys::MAX_UPLOAD_MB.to_string(),
                        value: mb.to_string(),
                        message: "超出可表示的字节数".to_string(),
                    })?;
        }
        if let Some(format) = parse_var::<LogFormat>(vars, config_keys::LOG_FORMAT)? {
            config.log_format = format;
        }

        Ok(config)
    }

    /// 监听地址
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_var<T>(vars: &HashMap<String, String>, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match vars.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.clone(),
                message: e.to_string(),
            }),
    }
}

use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::occupancy::TierThresholds;

/// Default duplicate-scan window (ms)
pub const DEFAULT_DEBOUNCE_WINDOW_MS: u64 = 1_200;
/// Default "currently open" lookback (ms): 10 minutes
pub const DEFAULT_RECENCY_WINDOW_MS: u64 = 10 * 60 * 1000;
/// Default venue offset from UTC (US Central, no DST)
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -5;

/// Upper bound for both windows: one week
const MAX_WINDOW_MS: u64 = 7 * 24 * 60 * 60 * 1000;

const DB_FILE_NAME: &str = "kiosk.redb";

/// Which [`VenueStore`](crate::store::VenueStore) backend to open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redb" => Ok(Self::Redb),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown store backend: {0}")]
    UnknownBackend(String),

    #[error("UTC offset {0} is outside -23..=23 hours")]
    OffsetOutOfRange(i32),

    #[error("{name} must be between {min} and {max} ms, got {value}")]
    WindowOutOfRange {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("display hours must satisfy first <= last <= 23, got {first}..={last}")]
    DisplayHours { first: u8, last: u8 },

    #[error("tier thresholds must satisfy 0 < elevated < high < critical, got {0:?}")]
    Thresholds(TierThresholds),
}

/// 引擎配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (redb 文件, 日志) |
/// | STORE_BACKEND | redb | `redb` 或 `memory` |
/// | DEBOUNCE_WINDOW_MS | 1200 | 重复扫码忽略窗口 |
/// | RECENCY_WINDOW_MS | 600000 | "当前在店" 回看窗口 |
/// | UTC_OFFSET_HOURS | -5 | 固定时区偏移 |
/// | STORE_LOCK_TIMEOUT_MS | 2000 | 内存存储锁超时 |
/// | DISPLAY_FIRST_HOUR | 11 | 看板小时表起始 |
/// | DISPLAY_LAST_HOUR | 21 | 看板小时表结束 |
/// | TIER_ELEVATED_AT / TIER_HIGH_AT / TIER_CRITICAL_AT | 1 / 12 / 20 | 颜色阈值 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (unset) | 日志目录，设置后按天滚动写文件 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/kiosk DEBOUNCE_WINDOW_MS=600000 cargo run -- status
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    pub store_backend: StoreBackend,
    /// Scans closer than this to the previous visit are duplicates
    pub debounce_window_ms: u64,
    /// Visits newer than `now - recency_window_ms` count as open
    pub recency_window_ms: u64,
    pub utc_offset_hours: i32,
    pub store_lock_timeout_ms: u64,
    pub display_first_hour: u8,
    pub display_last_hour: u8,
    pub thresholds: TierThresholds,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// Built-in defaults, ignoring the environment
    pub fn defaults() -> Self {
        Self {
            work_dir: "./data".into(),
            store_backend: StoreBackend::Redb,
            debounce_window_ms: DEFAULT_DEBOUNCE_WINDOW_MS,
            recency_window_ms: DEFAULT_RECENCY_WINDOW_MS,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            store_lock_timeout_ms: 2_000,
            display_first_hour: 11,
            display_last_hour: 21,
            thresholds: TierThresholds::default(),
            log_level: "info".into(),
            log_dir: None,
        }
    }

    /// 从环境变量加载配置
    ///
    /// 未设置或无法解析的变量使用默认值；范围检查由 [`Config::validate`] 完成。
    pub fn from_env() -> Self {
        let defaults = Self::defaults();
        let default_thresholds = defaults.thresholds;
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or(defaults.work_dir),
            store_backend: env_or("STORE_BACKEND", defaults.store_backend),
            debounce_window_ms: env_or("DEBOUNCE_WINDOW_MS", defaults.debounce_window_ms),
            recency_window_ms: env_or("RECENCY_WINDOW_MS", defaults.recency_window_ms),
            utc_offset_hours: env_or("UTC_OFFSET_HOURS", defaults.utc_offset_hours),
            store_lock_timeout_ms: env_or("STORE_LOCK_TIMEOUT_MS", defaults.store_lock_timeout_ms),
            display_first_hour: env_or("DISPLAY_FIRST_HOUR", defaults.display_first_hour),
            display_last_hour: env_or("DISPLAY_LAST_HOUR", defaults.display_last_hour),
            thresholds: TierThresholds {
                elevated: env_or("TIER_ELEVATED_AT", default_thresholds.elevated),
                high: env_or("TIER_HIGH_AT", default_thresholds.high),
                critical: env_or("TIER_CRITICAL_AT", default_thresholds.critical),
            },
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
        }
    }

    /// In-memory configuration, used by tests and demos
    pub fn in_memory() -> Self {
        Self {
            store_backend: StoreBackend::Memory,
            ..Self::defaults()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-23..=23).contains(&self.utc_offset_hours) {
            return Err(ConfigError::OffsetOutOfRange(self.utc_offset_hours));
        }
        check_window("DEBOUNCE_WINDOW_MS", self.debounce_window_ms, 0)?;
        check_window("RECENCY_WINDOW_MS", self.recency_window_ms, 1)?;
        if self.display_first_hour > self.display_last_hour || self.display_last_hour > 23 {
            return Err(ConfigError::DisplayHours {
                first: self.display_first_hour,
                last: self.display_last_hour,
            });
        }
        if !self.thresholds.is_ordered() {
            return Err(ConfigError::Thresholds(self.thresholds));
        }
        Ok(())
    }

    /// redb database file inside the work dir
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(DB_FILE_NAME)
    }

    pub fn debounce_window_millis(&self) -> i64 {
        self.debounce_window_ms.min(MAX_WINDOW_MS) as i64
    }

    pub fn recency_window_millis(&self) -> i64 {
        self.recency_window_ms.min(MAX_WINDOW_MS) as i64
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    parse_or(key, std::env::var(key).ok().as_deref(), default)
}

/// 解析失败时记录警告并使用默认值
fn parse_or<T: FromStr>(key: &str, raw: Option<&str>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = raw, "Unparseable environment value, using default");
            default
        }
    }
}

fn check_window(name: &'static str, value: u64, min: u64) -> Result<(), ConfigError> {
    if value < min || value > MAX_WINDOW_MS {
        return Err(ConfigError::WindowOutOfRange {
            name,
            value,
            min,
            max: MAX_WINDOW_MS,
        });
    }
    Ok(())
}

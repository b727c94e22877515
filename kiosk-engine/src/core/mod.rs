//! 核心模块 - 配置、错误和引擎装配
//!
//! # 模块结构
//!
//! - [`Config`] - 引擎配置
//! - [`Engine`] - 组件装配
//! - [`EngineError`] - 引擎错误

pub mod config;
pub mod engine;
pub mod error;

pub use config::{Config, ConfigError, StoreBackend};
pub use engine::Engine;
pub use error::{EngineError, EngineResult};

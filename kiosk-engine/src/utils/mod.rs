//! 工具模块 - 日志、输入校验、读重试

pub mod logger;
pub mod retry;
pub mod validation;

//! Kiosk Engine - 单店客流与排队看板引擎
//!
//! # 架构概述
//!
//! - **扫码记录** (`ledger`): 去重后的到店记录，按本地小时分桶
//! - **排队名单** (`waitlist`): 按加入顺序排列的等位队伍
//! - **看板** (`occupancy`): 当前在店人数、小时分布和颜色等级
//! - **存储** (`store`): redb 或内存后端
//!
//! # 模块结构
//!
//! ```text
//! kiosk-engine/src/
//! ├── core/          # 配置、错误、引擎装配
//! ├── store/         # VenueStore 及其后端
//! ├── occupancy/     # 快照聚合、等级分类
//! ├── utils/         # 日志、校验、读重试
//! ├── clock.rs       # 时钟与固定时区
//! ├── ledger.rs      # 扫码记录
//! └── waitlist.rs    # 排队名单
//! ```

pub mod clock;
pub mod core;
pub mod ledger;
pub mod occupancy;
pub mod store;
pub mod utils;
pub mod waitlist;

// Re-export 公共类型
pub use clock::{Clock, ManualClock, SystemClock, VenueTime};
pub use core::{Config, Engine, EngineError, EngineResult, StoreBackend};
pub use ledger::VisitLedger;
pub use occupancy::{OccupancyAggregator, StatusClassifier, TierThresholds};
pub use store::{MemoryStore, RedbStore, StoreError, VenueStore};
pub use waitlist::Waitlist;

pub use utils::logger::init_logger_with_file;

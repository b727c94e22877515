use shared::models::KioskStatus;
use std::sync::Arc;
use std::time::Duration;

use super::config::{Config, ConfigError, StoreBackend};
use super::error::EngineResult;
use crate::clock::{Clock, SystemClock, VenueTime};
use crate::ledger::VisitLedger;
use crate::occupancy::{OccupancyAggregator, StatusClassifier};
use crate::store::{MemoryStore, RedbStore, StoreError, VenueStore};
use crate::waitlist::Waitlist;

/// 引擎 - 持有所有组件的共享引用
///
/// 所有组件共享同一个 [`VenueStore`] 和 [`Clock`]；克隆只复制 Arc。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | ledger | VisitLedger | 扫码记录 (去重) |
/// | waitlist | Waitlist | 排队名单 |
/// | aggregator | OccupancyAggregator | 看板快照 |
/// | classifier | StatusClassifier | 人数 → 颜色等级 |
#[derive(Clone)]
pub struct Engine {
    config: Config,
    clock: Arc<dyn Clock>,
    venue_time: VenueTime,
    ledger: VisitLedger,
    waitlist: Waitlist,
    aggregator: OccupancyAggregator,
    classifier: StatusClassifier,
}

impl Engine {
    /// Validate `config` and open the configured store backend
    pub fn open(config: Config) -> EngineResult<Self> {
        config.validate()?;

        let store: Arc<dyn VenueStore> = match config.store_backend {
            StoreBackend::Redb => {
                std::fs::create_dir_all(&config.work_dir).map_err(StoreError::from)?;
                let path = config.database_path();
                tracing::info!(path = %path.display(), "Opening redb venue store");
                Arc::new(RedbStore::open(path)?)
            }
            StoreBackend::Memory => {
                tracing::info!("Using in-memory venue store");
                Arc::new(MemoryStore::with_lock_timeout(Duration::from_millis(
                    config.store_lock_timeout_ms,
                )))
            }
        };

        Self::with_store(config, store, Arc::new(SystemClock))
    }

    /// Wire the components around an already opened store and clock
    pub fn with_store(
        config: Config,
        store: Arc<dyn VenueStore>,
        clock: Arc<dyn Clock>,
    ) -> EngineResult<Self> {
        config.validate()?;
        let venue_time = VenueTime::new(config.utc_offset_hours)
            .ok_or(ConfigError::OffsetOutOfRange(config.utc_offset_hours))?;
        let classifier = StatusClassifier::new(config.thresholds);

        let ledger = VisitLedger::new(
            store.clone(),
            clock.clone(),
            venue_time,
            config.debounce_window_millis(),
        );
        let waitlist = Waitlist::new(store.clone(), clock.clone());
        let aggregator = OccupancyAggregator::new(
            store,
            config.recency_window_millis(),
            classifier,
            config.display_first_hour..=config.display_last_hour,
        );

        tracing::debug!(
            debounce_window_ms = config.debounce_window_ms,
            recency_window_ms = config.recency_window_ms,
            utc_offset_hours = config.utc_offset_hours,
            "Engine ready"
        );

        Ok(Self {
            config,
            clock,
            venue_time,
            ledger,
            waitlist,
            aggregator,
            classifier,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ledger(&self) -> &VisitLedger {
        &self.ledger
    }

    pub fn waitlist(&self) -> &Waitlist {
        &self.waitlist
    }

    pub fn aggregator(&self) -> &OccupancyAggregator {
        &self.aggregator
    }

    pub fn classifier(&self) -> &StatusClassifier {
        &self.classifier
    }

    pub fn venue_time(&self) -> VenueTime {
        self.venue_time
    }

    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Kiosk status as of the engine clock
    pub fn kiosk_status(&self) -> EngineResult<KioskStatus> {
        self.aggregator.kiosk_status(self.clock.now_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::core::EngineError;

    #[test]
    fn test_open_rejects_invalid_config() {
        let config = Config {
            recency_window_ms: 0,
            ..Config::in_memory()
        };
        assert!(matches!(Engine::open(config), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_open_redb_creates_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let work_dir = dir.path().join("nested").join("data");
        let config = Config {
            work_dir: work_dir.to_string_lossy().into_owned(),
            ..Config::defaults()
        };

        let engine = Engine::open(config).unwrap();
        assert!(engine.config().database_path().exists());
        assert_eq!(engine.ledger().total_visits().unwrap(), 0);
    }

    #[test]
    fn test_components_share_store() {
        let clock = Arc::new(ManualClock::new(0));
        let engine = Engine::with_store(
            Config::in_memory(),
            Arc::new(MemoryStore::new()),
            clock.clone(),
        )
        .unwrap();

        engine.ledger().record_scan_now(None).unwrap();
        let status = engine.kiosk_status().unwrap();
        assert_eq!(status.snapshot.open_count, 1);
        assert_eq!(status.generated_at, 0);
    }
}

use anyhow::Context;
use kiosk_engine::{Config, Engine, init_logger_with_file};

const USAGE: &str = "usage: kiosk-engine [status | scan [source]]";

fn main() -> anyhow::Result<()> {
    // 1. 加载 .env 和配置
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. 日志
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    tracing::info!(
        backend = ?config.store_backend,
        work_dir = %config.work_dir,
        "Kiosk engine starting"
    );

    // 3. 打开存储、装配组件
    let engine = Engine::open(config).context("failed to open kiosk engine")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("status") => {
            let status = engine.kiosk_status()?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Some("scan") => {
            let source = args.get(1).map(String::as_str);
            let outcome = engine.ledger().record_scan_now(source)?;
            if let Some(visit) = outcome.visit() {
                let local_time = engine
                    .venue_time()
                    .format_local_time(visit.timestamp_millis)
                    .unwrap_or_default();
                tracing::info!(local_time = %local_time, "Scan recorded");
            }
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Some(other) => {
            anyhow::bail!("unknown command '{other}'\n{USAGE}");
        }
    }

    Ok(())
}

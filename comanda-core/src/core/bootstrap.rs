//! Environment bootstrap
//!
//! 设置运行环境: 加载 .env, 确保工作目录存在, 初始化日志。
//! The outer binary calls this once before `Engine::start`.

use super::config::Config;
use crate::utils::logger;

/// Load `.env`, create the work directory and initialize logging.
/// Returns the resolved configuration.
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    if config.is_production() {
        // 生产环境: 日志滚动写入 <WORK_DIR>/logs
        let log_dir = format!("{}/logs", config.work_dir);
        std::fs::create_dir_all(&log_dir)?;
        logger::init_logger_with_file(Some(&config.log_level), Some(&log_dir));
    } else {
        logger::init_logger_with_file(Some(&config.log_level), None);
    }

    Ok(config)
}

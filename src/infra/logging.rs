use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::{Path, PathBuf};

pub const LOG_FILE_NAME: &str = "gdn.log";
pub const LOG_LEVEL_ENV: &str = "GDN_LOG";

// The TUI owns stdout, so logs go to a file next to the DB.
pub fn init_file_logger(data_dir: &Path) -> Option<PathBuf> {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or(LevelFilter::Info);
    if level == LevelFilter::Off {
        return None;
    }

    let log_path = data_dir.join(LOG_FILE_NAME);
    let log_file = File::create(&log_path).ok()?;
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    WriteLogger::init(level, config, log_file).ok()?;
    Some(log_path)
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

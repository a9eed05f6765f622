use std::path::PathBuf;

use anyhow::Result;
use fern::colors::{Color, ColoredLevelConfig};

/// File logger for the whole app. Everything goes to one log file; the
/// terminal itself belongs to the TUI.
pub fn init_logger(path: PathBuf) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let levels = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Cyan)
        .debug(Color::BrightBlack)
        .trace(Color::BrightBlack);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            out.finish(format_args!(
                "{} [{}] {}: {}",
                stamp,
                levels.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(fern::log_file(path)?)
        .apply()?;

    Ok(())
}

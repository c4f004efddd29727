//! Logger backend initialization for the `article-html` binary.
//!
//! Records always go to the terminal (stderr for warnings and errors) and
//! optionally to a log file as well.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Destination for log output.
pub enum LogDestination {
    /// Write to the terminal only.
    Terminal,
    /// Write to the terminal and to the given file.
    Both(PathBuf),
}

impl LogDestination {
    pub fn from_option(log_file: Option<PathBuf>) -> Self {
        match log_file {
            Some(path) => LogDestination::Both(path),
            None => LogDestination::Terminal,
        }
    }
}

/// Initialize the logger with the specified destination and level.
///
/// A log file that cannot be created is reported on stderr and skipped; the
/// terminal logger is always installed.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let LogDestination::Both(path) = destination {
        if let Some(file_logger) = create_file_logger(&path, level, config) {
            loggers.push(file_logger);
        }
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}

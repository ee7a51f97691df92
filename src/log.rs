//! Logging setup, adapted from the teacher's `log4rs`-based `init_log`.

use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config as Log4rsConfig, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::filter::threshold::ThresholdFilter;

use crate::error::{to_error, GameError};

/// Initializes the `log` facade with a file appender at `file_path`,
/// filtered to `level`. Call once at process startup before constructing
/// a `Runtime`.
pub fn init_log(level: LevelFilter, file_path: &str) -> Result<(), GameError> {
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {l} {t} {m}{n}",
        )))
        .build(file_path)
        .map_err(to_error)?;

    let config = Log4rsConfig::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("logfile", Box::new(logfile)),
        )
        .build(Root::builder().appender("logfile").build(level))
        .map_err(to_error)?;

    log4rs::init_config(config).map_err(to_error)?;
    Ok(())
}

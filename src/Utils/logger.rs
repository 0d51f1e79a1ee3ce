//! Terminal logger bootstrap.
use log::LevelFilter;
use simplelog::*;

/// Starts a terminal logger writing to stderr, so stdout carries nothing but
/// the result line. A logger that is already installed is kept.
pub fn init_logger(level: LevelFilter) {
    let logger_instance = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )]);
    if logger_instance.is_err() {
        log::debug!("logger already initialised");
    }
}

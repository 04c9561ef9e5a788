use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle};

/// Environment variable checked before `RUST_LOG`
pub const LOG_ENV: &str = "TASKBOARD_LOG";

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "warn,taskboard=debug";

/// Start logging to stderr. Keep the handle alive for the life of the process.
pub fn init_logging(verbose: bool) -> Result<LoggerHandle, FlexiLoggerError> {
    let filter = choose_filter(
        verbose,
        std::env::var(LOG_ENV).ok(),
        std::env::var("RUST_LOG").ok(),
    );

    let handle = Logger::try_with_str(&filter)?.log_to_stderr().start()?;
    log::debug!("logger initialized filter={}", filter);
    Ok(handle)
}

/// `--verbose` wins, then TASKBOARD_LOG, then RUST_LOG, then warn
fn choose_filter(verbose: bool, board_env: Option<String>, rust_log: Option<String>) -> String {
    if verbose {
        return VERBOSE_FILTER.to_string();
    }
    board_env
        .filter(|value| !value.trim().is_empty())
        .or_else(|| rust_log.filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

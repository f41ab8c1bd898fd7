//! Subscriber setup shared by every command

use clemens_config::LoggingConfig;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use crate::cli::LogLevel;

const CRATES: [&str; 4] = [
    "clemens_cli",
    "clemens_config",
    "clemens_parser",
    "clemens_export",
];

/// Level from `--log-level`, then `--verbose`, then the config file
pub fn resolve_level(flag: Option<LogLevel>, verbose: bool, config: &LoggingConfig) -> LevelFilter {
    if let Some(level) = flag {
        return level.into();
    }
    if verbose {
        return LevelFilter::DEBUG;
    }
    config.level.parse().unwrap_or(LevelFilter::WARN)
}

/// `crate=level` directives for the workspace crates
pub fn filter_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    CRATES
        .iter()
        .map(|krate| format!("{}={}", krate, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber; logs go to stderr so stdout stays parseable
pub fn init(flag: Option<LogLevel>, verbose: bool, config: &LoggingConfig) {
    let level = resolve_level(flag, verbose, config);
    // a second init (tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter_directives(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logging(level: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_string(),
        }
    }

    #[test]
    fn test_flag_wins() {
        let level = resolve_level(Some(LogLevel::Trace), true, &logging("error"));
        assert_eq!(level, LevelFilter::TRACE);
    }

    #[test]
    fn test_verbose_over_config() {
        assert_eq!(resolve_level(None, true, &logging("error")), LevelFilter::DEBUG);
    }

    #[test]
    fn test_config_level_and_fallback() {
        assert_eq!(resolve_level(None, false, &logging("info")), LevelFilter::INFO);
        assert_eq!(resolve_level(None, false, &logging("loud")), LevelFilter::WARN);
    }

    #[test]
    fn test_directives() {
        let directives = filter_directives(LevelFilter::INFO);
        assert!(directives.starts_with("clemens_cli=info,"));
        assert!(directives.contains("clemens_export=info"));
    }
}

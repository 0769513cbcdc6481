//! Config handling

use std::num::NonZeroUsize;
use std::time::Duration;

use tracing::log::LevelFilter;
use url::Url;

use crate::cli::CliOptions;

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("rustls", LevelFilter::Info)
            .with_module_level("hyper_util", LevelFilter::Info)
            .with_module_level("reqwest", LevelFilter::Info)
            .with_module_level("tower_sessions", LevelFilter::Warn)
            .with_module_level("h2", LevelFilter::Info);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Validated runtime settings for the studio.
#[derive(Clone, Debug)]
pub struct StudioConfig {
    /// Image endpoint the encoded prompt is appended to.
    pub api_base_url: Url,
    /// Timeout for each image request.
    pub fetch_timeout: Duration,
    /// Length of the fixed progress schedule.
    pub progress_duration: Duration,
    /// Per-visitor history cap, `None` keeps everything.
    pub history_retain: Option<NonZeroUsize>,
    /// Inactivity before a visitor's session and studio are dropped.
    pub session_idle: Duration,
}

impl TryFrom<&CliOptions> for StudioConfig {
    type Error = url::ParseError;

    fn try_from(cli: &CliOptions) -> Result<Self, Self::Error> {
        Ok(Self {
            api_base_url: Url::parse(&cli.api_base_url)?,
            fetch_timeout: Duration::from_secs(cli.fetch_timeout_secs.get()),
            progress_duration: Duration::from_millis(cli.progress_ms),
            history_retain: cli.history_retain,
            session_idle: Duration::from_secs(cli.session_idle_minutes.max(1).saturating_mul(60)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_API_BASE_URL;
    use clap::Parser;

    #[test]
    fn defaults_match_the_public_endpoint() {
        let cli = CliOptions::parse_from(["beauty-studio"]);
        let config = StudioConfig::try_from(&cli).expect("valid config");
        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_BASE_URL);
        assert_eq!(config.fetch_timeout, Duration::from_secs(15));
        assert_eq!(config.progress_duration, Duration::from_millis(5000));
        assert!(config.history_retain.is_none());
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let cli = CliOptions::parse_from(["beauty-studio", "--api-base-url", "not a url"]);
        assert!(StudioConfig::try_from(&cli).is_err());
    }

    #[test]
    fn zero_fetch_timeout_is_refused() {
        let result =
            CliOptions::try_parse_from(["beauty-studio", "--fetch-timeout-secs", "0"]);
        assert!(result.is_err());

        let cli = CliOptions::parse_from(["beauty-studio", "--fetch-timeout-secs", "3"]);
        let config = StudioConfig::try_from(&cli).expect("valid config");
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
    }

    #[test]
    fn huge_idle_timeout_saturates() {
        let max = u64::MAX.to_string();
        let cli = CliOptions::parse_from(["beauty-studio", "--session-idle-minutes", &max]);
        let config = StudioConfig::try_from(&cli).expect("valid config");
        assert_eq!(config.session_idle, Duration::from_secs(u64::MAX));

        let cli = CliOptions::parse_from(["beauty-studio", "--session-idle-minutes", "0"]);
        let config = StudioConfig::try_from(&cli).expect("valid config");
        assert_eq!(config.session_idle, Duration::from_secs(60));
    }

    #[test]
    fn retention_is_parsed() {
        let cli = CliOptions::parse_from(["beauty-studio", "--history-retain", "25"]);
        let config = StudioConfig::try_from(&cli).expect("valid config");
        assert_eq!(config.history_retain, NonZeroUsize::new(25));
    }
}

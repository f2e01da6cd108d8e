//! Countdown construction parameters and CLI argument handling

use std::{fmt, sync::Arc, time::Duration};
use clap::Parser;

/// Callback fired when a countdown reaches zero
pub type ExpireCallback = Arc<dyn Fn() + Send + Sync>;

/// Parameters a countdown controller is built from
#[derive(Clone)]
pub struct CountdownConfig {
    /// Countdown length; sub-second parts are dropped
    pub duration: Duration,
    pub always_show_hours: bool,
    pub on_expire: Option<ExpireCallback>,
}

impl CountdownConfig {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            always_show_hours: false,
            on_expire: None,
        }
    }

    pub fn from_secs(seconds: u64) -> Self {
        Self::new(Duration::from_secs(seconds))
    }

    pub fn always_show_hours(mut self, always_show_hours: bool) -> Self {
        self.always_show_hours = always_show_hours;
        self
    }

    pub fn on_expire<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_expire = Some(Arc::new(callback));
        self
    }

    /// Countdown length in whole seconds
    pub fn total_seconds(&self) -> u64 {
        self.duration.as_secs()
    }
}

impl fmt::Debug for CountdownConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownConfig")
            .field("duration", &self.duration)
            .field("always_show_hours", &self.always_show_hours)
            .field("on_expire", &self.on_expire.is_some())
            .finish()
    }
}

/// CLI argument parsing structure for the demo label
#[derive(Parser, Debug)]
#[command(name = "countdown-label")]
#[command(about = "A terminal countdown label that survives suspend and resume")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Countdown duration in seconds
    #[arg(short, long, default_value = "60")]
    pub duration: u64,

    /// Always render the hour field
    #[arg(long)]
    pub always_show_hours: bool,

    /// Print every state change as a JSON line instead of the label text
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Build countdown parameters from the CLI flags
    pub fn countdown(&self) -> CountdownConfig {
        CountdownConfig::from_secs(self.duration).always_show_hours(self.always_show_hours)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn truncates_sub_second_duration() {
        let config = CountdownConfig::new(Duration::from_millis(2_900));
        assert_eq!(config.total_seconds(), 2);
    }

    #[test]
    fn defaults_hide_hours_without_callback() {
        let config = CountdownConfig::from_secs(30);
        assert!(!config.always_show_hours);
        assert!(config.on_expire.is_none());
    }

    #[test]
    fn cli_flags_map_to_countdown_config() {
        let cli = Config::try_parse_from(["countdown-label", "-d", "5400", "--always-show-hours"])
            .expect("valid args");
        let countdown = cli.countdown();
        assert_eq!(countdown.total_seconds(), 5400);
        assert!(countdown.always_show_hours);
        assert_eq!(cli.log_level(), "info");
    }

    #[test]
    fn verbose_switches_log_level() {
        let cli = Config::try_parse_from(["countdown-label", "--verbose"]).expect("valid args");
        assert_eq!(cli.duration, 60);
        assert_eq!(cli.log_level(), "debug");
    }
}

//! Command line flags

use std::time::Duration;

use clap::Parser;

use crate::config::GameConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "terminal-racer", version, about = "Dodge falling obstacles on a scrolling track")]
pub struct Cli {
    /// Let the AI drive instead of the keyboard
    #[arg(long)]
    pub ai: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Show tick timing and log at debug level
    #[arg(long)]
    pub debug: bool,

    /// Seed for a reproducible session
    #[arg(long)]
    pub seed: Option<u64>,

    /// Session length in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub duration: Option<u64>,
}

impl Cli {
    /// Apply flags on top of a config loaded from the environment
    pub fn apply(&self, mut config: GameConfig) -> GameConfig {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(secs) = self.duration {
            config.game_duration = Duration::from_secs(secs);
        }
        config.debug_overlay = self.debug;
        config
    }

    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "terminal_racer=debug"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["terminal-racer"]).unwrap();
        assert!(!cli.ai);
        assert!(!cli.no_color);
        assert!(!cli.debug);
        assert_eq!(cli.apply(GameConfig::default()), GameConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "terminal-racer",
            "--ai",
            "--debug",
            "--seed",
            "99",
            "--duration",
            "30",
        ])
        .unwrap();

        let env = GameConfig {
            seed: Some(1),
            ..GameConfig::default()
        };
        let config = cli.apply(env);

        assert!(cli.ai);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.game_duration, Duration::from_secs(30));
        assert!(config.debug_overlay);
        assert_eq!(cli.log_filter(), "terminal_racer=debug");
    }

    #[test]
    fn test_rejects_zero_duration() {
        assert!(Cli::try_parse_from(["terminal-racer", "--duration", "0"]).is_err());
    }
}

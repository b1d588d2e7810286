use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const DEFAULT_TAXI_WS_URL: &str = "ws://127.0.0.1:8080/ws";
const DEFAULT_CLIENT_WS_URL: &str = "ws://127.0.0.1:8080/ws-clients";
const DEFAULT_CONFIG_FILE: &str = "fleet_viewer.conf";
const DEFAULT_LOG_DIR: &str = "./logs";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REDRAW_INTERVAL_MS: u64 = 100;

#[derive(Parser, Deserialize, Serialize, Debug, Clone, Default)]
#[clap(about = "Live taxi fleet stream viewer", version)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[clap(long, env = "FLEET_TAXI_WS_URL", help = "Taxi channel WebSocket URL.")]
    pub taxi_ws_url: Option<String>,

    #[clap(long, env = "FLEET_CLIENT_WS_URL", help = "Client request channel WebSocket URL.")]
    pub client_ws_url: Option<String>,

    #[clap(long, env = "FLEET_CONFIG_PATH", help = "Path to the JSON configuration file.")]
    pub config_path: Option<PathBuf>,

    #[clap(long, env = "FLEET_LOG_DIR", help = "Directory for log files.")]
    pub log_dir: Option<PathBuf>,

    #[clap(long, env = "FLEET_LOG_LEVEL", help = "Logging level (trace, debug, info, warn, error).")]
    pub log_level: Option<String>,

    #[clap(long, env = "FLEET_REDRAW_INTERVAL_MS", help = "Redraw poll interval in milliseconds.")]
    pub redraw_interval_ms: Option<u64>,

    #[clap(long, env = "FLEET_TARGET_RATE", help = "If set, ask the streamer for this target message rate on startup.")]
    pub target_rate: Option<i64>,
}

impl Config {
    // Merge two Config structs, where 'other' overrides 'self' for Some values.
    fn merge(self, other: Config) -> Config {
        Config {
            taxi_ws_url: other.taxi_ws_url.or(self.taxi_ws_url),
            client_ws_url: other.client_ws_url.or(self.client_ws_url),
            config_path: other.config_path.or(self.config_path),
            log_dir: other.log_dir.or(self.log_dir),
            log_level: other.log_level.or(self.log_level),
            redraw_interval_ms: other.redraw_interval_ms.or(self.redraw_interval_ms),
            target_rate: other.target_rate.or(self.target_rate),
        }
    }

    pub fn taxi_ws_url(&self) -> String {
        self.taxi_ws_url
            .clone()
            .unwrap_or_else(|| DEFAULT_TAXI_WS_URL.to_string())
    }

    pub fn client_ws_url(&self) -> String {
        self.client_ws_url
            .clone()
            .unwrap_or_else(|| DEFAULT_CLIENT_WS_URL.to_string())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR))
    }

    pub fn log_level(&self) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }

    pub fn redraw_interval_ms(&self) -> u64 {
        self.redraw_interval_ms.unwrap_or(DEFAULT_REDRAW_INTERVAL_MS)
    }

    pub fn target_rate(&self) -> Option<i64> {
        self.target_rate
    }
}

/// Resolution order, lowest to highest: compiled-in defaults, JSON config
/// file, environment variables / CLI arguments.
pub fn load_config() -> Config {
    let cli_args = Config::parse();
    load_with_cli(cli_args)
}

fn load_with_cli(cli_args: Config) -> Config {
    let mut config = Config::default();

    let config_file_path = cli_args
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    if config_file_path.exists() {
        match fs::read_to_string(&config_file_path) {
            Ok(config_str) => match serde_json::from_str::<Config>(&config_str) {
                Ok(file_config) => config = config.merge(file_config),
                Err(e) => log::warn!(
                    "Failed to parse config file {}: {}. Falling back to other sources.",
                    config_file_path.display(),
                    e
                ),
            },
            Err(e) => log::warn!(
                "Failed to read config file {}: {}. Falling back to other sources.",
                config_file_path.display(),
                e
            ),
        }
    }

    config.merge(cli_args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn cli_values_override_file_values() {
        let mut file = tempfile::Builder::new().suffix(".conf").tempfile().unwrap();
        write!(
            file,
            r#"{{"taxiWsUrl": "ws://filehost:8080/ws", "logLevel": "debug"}}"#
        )
        .unwrap();

        let cli = Config {
            taxi_ws_url: Some("ws://clihost:8080/ws".to_string()),
            config_path: Some(file.path().to_path_buf()),
            ..Config::default()
        };

        let config = load_with_cli(cli);
        assert_eq!(config.taxi_ws_url(), "ws://clihost:8080/ws");
        // File value survives where the CLI said nothing.
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn defaults_apply_when_nothing_else_is_given() {
        let cli = Config {
            config_path: Some(PathBuf::from("/nonexistent/fleet_viewer.conf")),
            ..Config::default()
        };
        let config = load_with_cli(cli);
        assert_eq!(config.taxi_ws_url(), DEFAULT_TAXI_WS_URL);
        assert_eq!(config.client_ws_url(), DEFAULT_CLIENT_WS_URL);
        assert_eq!(config.redraw_interval_ms(), DEFAULT_REDRAW_INTERVAL_MS);
        assert_eq!(config.target_rate(), None);
    }

    #[test]
    fn unreadable_config_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json at all").unwrap();

        let cli = Config {
            config_path: Some(file.path().to_path_buf()),
            ..Config::default()
        };
        let config = load_with_cli(cli);
        assert_eq!(config.log_level(), DEFAULT_LOG_LEVEL);
    }
}

use serde::{Deserialize, Serialize};

/// Main configuration structure for chained-songs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Chain store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Host player configuration
    #[serde(default)]
    pub player: PlayerConfig,

    /// Enforcement timing configuration
    #[serde(default)]
    pub enforcement: EnforcementConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chain store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreConfig {
    /// Path to the JSON file holding every container's chains
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String {
    ".chained-songs/chains.json".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Host player configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlayerConfig {
    /// Path to the JSON player state (shuffle flag, context, upcoming queue)
    #[serde(default = "default_state_path")]
    pub state_path: String,
}

fn default_state_path() -> String {
    ".chained-songs/player.json".to_string()
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
        }
    }
}

/// Enforcement timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EnforcementConfig {
    /// Wait after each insert before trusting the uid read back (milliseconds)
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Wait after a track change before enforcing (milliseconds)
    #[serde(default = "default_trigger_delay_ms")]
    pub trigger_delay_ms: u64,

    /// Poll interval while waiting for the host queue to become available (milliseconds)
    #[serde(default = "default_ready_poll_ms")]
    pub ready_poll_ms: u64,
}

const fn default_settle_delay_ms() -> u64 {
    100
}

const fn default_trigger_delay_ms() -> u64 {
    300
}

const fn default_ready_poll_ms() -> u64 {
    300
}

impl Default for EnforcementConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            trigger_delay_ms: default_trigger_delay_ms(),
            ready_poll_ms: default_ready_poll_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stdout only when unset)
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Also write logs to the console when a log directory is set
    #[serde(default = "default_true")]
    pub enable_stdout: bool,

    /// Log file rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

const fn default_true() -> bool {
    true
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            enable_stdout: true,
            rotation: default_rotation(),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Primary host process name (iikoFront front-office client)
pub const DEFAULT_HOST_PROCESS: &str = "iikoFront.Net";

/// Alternate host process name, tried when the primary is not running
pub const FALLBACK_HOST_PROCESS: &str = "iikoFront";

/// Helper configuration from `FrontDialogs.yaml`
///
/// Every field has a default, so a partial file (or no file at all) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HelperConfig {
    #[serde(default)]
    pub host: HostSettings,

    #[serde(default)]
    pub ui_thread: UiThreadSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSettings {
    /// Process names tried in order; exactly one running instance must match
    #[serde(default = "default_process_names")]
    pub process_names: Vec<String>,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            process_names: default_process_names(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiThreadSettings {
    #[serde(default = "default_thread_name")]
    pub thread_name: String,

    /// Longest idle sleep of the UI loop between message pumps. The loop normally wakes as soon
    /// as a window message or a command arrives; this only bounds a missed wake-up.
    #[serde(default = "default_pump_interval_ms")]
    pub pump_interval_ms: u64,
}

impl Default for UiThreadSettings {
    fn default() -> Self {
        Self {
            thread_name: default_thread_name(),
            pump_interval_ms: default_pump_interval_ms(),
        }
    }
}

impl UiThreadSettings {
    pub fn pump_interval(&self) -> Duration {
        // Zero would spin the loop
        Duration::from_millis(self.pump_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,

    #[serde(default)]
    pub debug_mode: bool,

    #[serde(default)]
    pub console_output: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            log_prefix: default_log_prefix(),
            debug_mode: false,
            console_output: false,
        }
    }
}

fn default_process_names() -> Vec<String> {
    vec![
        DEFAULT_HOST_PROCESS.to_string(),
        FALLBACK_HOST_PROCESS.to_string(),
    ]
}

fn default_thread_name() -> String {
    "front-dialogs-ui".to_string()
}

fn default_pump_interval_ms() -> u64 {
    1000
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_prefix() -> String {
    "front-dialogs".to_string()
}

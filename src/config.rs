use std::path::PathBuf;

use tracing::trace;

/// Sampler configuration
///
/// Fields omitted from the config file fall back to environment variables
/// and then to built-in defaults; command line flags override everything.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Destination path for the durable log
    #[serde(default = "crate::util::get_log_path")]
    pub log: PathBuf,

    /// Sampling interval in seconds
    #[serde(default = "crate::util::get_interval")]
    pub interval: u64,

    /// ANSI color on the console timestamp
    #[serde(default = "default_color")]
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log: crate::util::get_log_path(),
            interval: crate::util::get_interval(),
            color: default_color(),
        }
    }
}

fn default_color() -> bool {
    true
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}

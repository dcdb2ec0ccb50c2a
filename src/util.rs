use std::path::PathBuf;

const SAMPLER_INTERVAL: &str = "GPU_SAMPLER_INTERVAL";

const DEFAULT_INTERVAL: u64 = 5;

pub fn get_interval() -> u64 {
    let interval_from_env = std::env::var(SAMPLER_INTERVAL);
    interval_from_env.map_or(DEFAULT_INTERVAL, |res| {
        res.parse().unwrap_or(DEFAULT_INTERVAL)
    })
}

const SAMPLER_LOG: &str = "GPU_SAMPLER_LOG";

const DEFAULT_LOG_PATH: &str = "gpu_telemetry.log";

pub fn get_log_path() -> PathBuf {
    let path_from_env = std::env::var(SAMPLER_LOG);
    path_from_env.map_or(PathBuf::from(DEFAULT_LOG_PATH), PathBuf::from)
}

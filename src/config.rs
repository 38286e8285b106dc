use serde::Deserialize;
use std::time::Duration;

/// Fixed cadence of the background poller and the watch client.
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// External thermal probe executable.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_probe_command")]
    pub command: String,
    #[serde(default = "default_probe_args")]
    pub args: Vec<String>,
    /// Upper bound for one probe run; 0 waits indefinitely.
    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_probe_command() -> String {
    "vcgencmd".into()
}

fn default_probe_args() -> Vec<String> {
    vec!["measure_temp".into()]
}

fn default_probe_timeout_ms() -> u64 {
    5000
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            command: default_probe_command(),
            args: default_probe_args(),
            timeout_ms: default_probe_timeout_ms(),
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

/// What a thermal probe failure does to the whole sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermalPolicy {
    /// Any probe failure fails the sample; gathered CPU/memory data is dropped.
    #[default]
    Strict,
    /// Probe failures yield a snapshot without a temperature.
    Partial,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpuUsageMode {
    /// Average utilization since boot from a single counter read.
    #[default]
    SinceBoot,
    /// Utilization between two consecutive samples.
    Interval,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    #[serde(default)]
    pub thermal_policy: ThermalPolicy,
    #[serde(default)]
    pub cpu_usage: CpuUsageMode,
    /// procfs mount point (e.g. "/host/proc" inside a container).
    #[serde(default = "default_proc_path")]
    pub proc_path: String,
}

fn default_proc_path() -> String {
    "/proc".into()
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            thermal_policy: ThermalPolicy::default(),
            cpu_usage: CpuUsageMode::default(),
            proc_path: default_proc_path(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &str) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            !self.probe.command.trim().is_empty(),
            "probe.command must be non-empty"
        );
        anyhow::ensure!(
            !self.sampling.proc_path.is_empty(),
            "sampling.proc_path must be non-empty"
        );
        Ok(())
    }
}

/// Watch client settings, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchConfig {
    pub url: String,
    pub request_timeout: Duration,
}

impl WatchConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map instead of the process env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let url =
            lookup("PIVITALS_URL").unwrap_or_else(|| "http://127.0.0.1:3000/api/system".into());
        anyhow::ensure!(
            url.starts_with("http://"),
            "PIVITALS_URL must be an http:// URL, got {}",
            url
        );
        let timeout_ms = match lookup("PIVITALS_TIMEOUT_MS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("PIVITALS_TIMEOUT_MS {:?}: {}", v, e))?,
            None => 10_000,
        };
        anyhow::ensure!(
            timeout_ms > 0,
            "PIVITALS_TIMEOUT_MS must be > 0, got {}",
            timeout_ms
        );
        Ok(Self {
            url,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

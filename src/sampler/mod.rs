// Sampler: host counters + thermal probe -> one Snapshot or a typed failure

mod derive;
mod host;
mod linux;
mod thermal;

pub use derive::{
    bytes_to_gib, core_usage, normalize_memory, round_to, usage_between, usage_since_boot,
};
pub use host::{HostSource, SystemHost};
pub use thermal::{CommandProbe, ThermalSource, parse_probe_output};

use crate::config::{CpuUsageMode, ThermalPolicy};
use crate::error::SamplingError;
use crate::models::{CpuTimes, HostIdentity, MemoryStats, Snapshot};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplerOptions {
    pub thermal_policy: ThermalPolicy,
    pub cpu_usage: CpuUsageMode,
}

pub struct Sampler {
    host: Arc<dyn HostSource>,
    thermal: Arc<dyn ThermalSource>,
    options: SamplerOptions,
    /// Last raw counters, kept only in interval mode.
    previous: Mutex<Option<Vec<CpuTimes>>>,
}

/// What one blocking host read produces.
struct HostReading {
    cores: Vec<CpuTimes>,
    memory: MemoryStats,
    identity: HostIdentity,
}

impl Sampler {
    pub fn new(
        host: Arc<dyn HostSource>,
        thermal: Arc<dyn ThermalSource>,
        options: SamplerOptions,
    ) -> Self {
        Self {
            host,
            thermal,
            options,
            previous: Mutex::new(None),
        }
    }

    pub fn options(&self) -> SamplerOptions {
        self.options
    }

    /// Take one observation. CPU and memory are read first, then the probe runs;
    /// under the strict policy a probe failure discards everything gathered.
    pub async fn sample(&self) -> Result<Snapshot, SamplingError> {
        let host = self.host.clone();
        let reading = tokio::task::spawn_blocking(move || -> Result<HostReading, SamplingError> {
            Ok(HostReading {
                cores: host.cpu_times()?,
                memory: host.memory()?,
                identity: host.identity(),
            })
        })
        .await
        .map_err(|e| SamplingError::host("cpu", format!("host read task join: {}", e)))??;

        let cpu_usage = self.derive_usage(&reading.cores)?;
        let memory_usage = normalize_memory(&reading.memory);

        let cpu_temp = match self.thermal.read_celsius().await {
            Ok(celsius) => Some(celsius),
            Err(e) => match self.options.thermal_policy {
                ThermalPolicy::Strict => return Err(e),
                ThermalPolicy::Partial => {
                    tracing::warn!(
                        error = %e,
                        stage = e.stage(),
                        operation = "read_celsius",
                        "thermal probe failed; returning snapshot without temperature"
                    );
                    None
                }
            },
        };

        if self.options.cpu_usage == CpuUsageMode::Interval {
            self.advance_baseline(reading.cores)?;
        }
        Ok(Snapshot {
            host: reading.identity,
            cpu_temp,
            cpu_usage,
            memory_usage,
        })
    }

    /// A sibling sampler over the same host and probe with its own interval
    /// baseline.
    pub fn fork(&self) -> Sampler {
        Sampler::new(self.host.clone(), self.thermal.clone(), self.options)
    }

    fn derive_usage(&self, cores: &[CpuTimes]) -> Result<Vec<f64>, SamplingError> {
        match self.options.cpu_usage {
            CpuUsageMode::SinceBoot => usage_since_boot(cores),
            CpuUsageMode::Interval => usage_between(self.lock_previous()?.as_deref(), cores),
        }
    }

    /// Only a returned snapshot moves the baseline.
    fn advance_baseline(&self, cores: Vec<CpuTimes>) -> Result<(), SamplingError> {
        *self.lock_previous()? = Some(cores);
        Ok(())
    }

    fn lock_previous(&self) -> Result<MutexGuard<'_, Option<Vec<CpuTimes>>>, SamplingError> {
        self.previous.lock().map_err(|e| {
            SamplingError::host("cpu", format!("previous sample lock poisoned: {}", e))
        })
    }
}

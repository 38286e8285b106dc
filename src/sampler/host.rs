// Host counters via /proc/stat and sysinfo

use super::linux;
use crate::error::SamplingError;
use crate::models::{CpuTimes, HostIdentity, MemoryStats};
use std::sync::Mutex;
use sysinfo::System;
use tracing::instrument;

/// Synchronous reads of ambient host state. Implementations may block.
pub trait HostSource: Send + Sync {
    /// Accumulated per-core counters, ordered by core index.
    fn cpu_times(&self) -> Result<Vec<CpuTimes>, SamplingError>;
    fn memory(&self) -> Result<MemoryStats, SamplingError>;
    /// Never fails; unknown fields are empty strings.
    fn identity(&self) -> HostIdentity;
}

/// The real host: procfs for CPU ticks, sysinfo for memory and hostname.
pub struct SystemHost {
    sys: Mutex<System>,
    proc_path: String,
}

impl SystemHost {
    pub fn new(proc_path: impl Into<String>) -> Self {
        Self {
            sys: Mutex::new(System::new()),
            proc_path: proc_path.into(),
        }
    }
}

impl Default for SystemHost {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl HostSource for SystemHost {
    #[instrument(skip(self), fields(source = "procfs", operation = "cpu_times"))]
    fn cpu_times(&self) -> Result<Vec<CpuTimes>, SamplingError> {
        linux::read_cpu_times(&self.proc_path).map_err(|e| SamplingError::host("cpu", e))
    }

    #[instrument(skip(self), fields(source = "sysinfo", operation = "memory"))]
    fn memory(&self) -> Result<MemoryStats, SamplingError> {
        let mut sys = self.sys.lock().map_err(|e| {
            SamplingError::host("memory", format!("sysinfo lock poisoned: {}", e))
        })?;
        sys.refresh_memory();
        // "available" (reclaimable cache included) is what the kernel considers free for use.
        Ok(MemoryStats {
            total_bytes: sys.total_memory(),
            free_bytes: sys.available_memory(),
        })
    }

    fn identity(&self) -> HostIdentity {
        HostIdentity {
            hostname: System::host_name().unwrap_or_default(),
            platform: std::env::consts::OS.into(),
            arch: std::env::consts::ARCH.into(),
        }
    }
}

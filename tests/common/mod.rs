// Shared test helpers: scripted host, probe and snapshot sources

#![allow(dead_code)]

use async_trait::async_trait;
use pivitals::error::{PollError, SamplingError};
use pivitals::models::*;
use pivitals::poller::SnapshotSource;
use pivitals::sampler::{HostSource, Sampler, SamplerOptions, ThermalSource};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const GIB: u64 = 1 << 30;

pub fn core(idle: u64, user: u64) -> CpuTimes {
    CpuTimes {
        idle,
        user,
        ..Default::default()
    }
}

/// Host whose counters can be swapped between samples.
pub struct FakeHost {
    pub cores: Mutex<Vec<CpuTimes>>,
    pub memory: MemoryStats,
    pub memory_reads: AtomicUsize,
}

impl FakeHost {
    pub fn new(cores: Vec<CpuTimes>, total_bytes: u64, free_bytes: u64) -> Self {
        Self {
            cores: Mutex::new(cores),
            memory: MemoryStats {
                total_bytes,
                free_bytes,
            },
            memory_reads: AtomicUsize::new(0),
        }
    }

    /// Two cores at 30% / 10%, 8 GiB total with 2 GiB free.
    pub fn reference() -> Self {
        Self::new(vec![core(700, 300), core(900, 100)], 8 * GIB, 2 * GIB)
    }

    pub fn set_cores(&self, cores: Vec<CpuTimes>) {
        *self.cores.lock().unwrap() = cores;
    }
}

impl HostSource for FakeHost {
    fn cpu_times(&self) -> Result<Vec<CpuTimes>, SamplingError> {
        Ok(self.cores.lock().unwrap().clone())
    }

    fn memory(&self) -> Result<MemoryStats, SamplingError> {
        self.memory_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.memory)
    }

    fn identity(&self) -> HostIdentity {
        HostIdentity {
            hostname: "raspberrypi".into(),
            platform: "linux".into(),
            arch: "aarch64".into(),
        }
    }
}

/// Probe returning a settable result and counting calls.
pub struct FakeProbe {
    result: Mutex<Result<f64, SamplingError>>,
    pub calls: AtomicUsize,
}

impl FakeProbe {
    pub fn reading(celsius: f64) -> Self {
        Self {
            result: Mutex::new(Ok(celsius)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: SamplingError) -> Self {
        Self {
            result: Mutex::new(Err(err)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, result: Result<f64, SamplingError>) {
        *self.result.lock().unwrap() = result;
    }
}

#[async_trait]
impl ThermalSource for FakeProbe {
    async fn read_celsius(&self) -> Result<f64, SamplingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.lock().unwrap().clone()
    }
}

pub fn sampler(host: FakeHost, probe: FakeProbe, options: SamplerOptions) -> Sampler {
    Sampler::new(Arc::new(host), Arc::new(probe), options)
}

pub fn reference_snapshot() -> Snapshot {
    Snapshot {
        host: HostIdentity {
            hostname: "raspberrypi".into(),
            platform: "linux".into(),
            arch: "aarch64".into(),
        },
        cpu_temp: Some(55.0),
        cpu_usage: vec![30.0, 10.0],
        memory_usage: MemoryUsage {
            total: 8.0,
            used: 6.0,
            free: 2.0,
        },
    }
}

/// Snapshot source that replays scripted outcomes, then repeats the last one.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<Snapshot, PollError>>>,
    last: Mutex<Option<Result<Snapshot, PollError>>>,
    pub calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<Snapshot, PollError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SnapshotSource for ScriptedSource {
    async fn fetch(&self) -> Result<Snapshot, PollError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(next) = next {
            *last = Some(next);
        }
        last.clone()
            .unwrap_or_else(|| Err(PollError::Transport("empty script".into())))
    }
}

pub fn snapshot_with_usage(usage: Vec<f64>) -> Snapshot {
    Snapshot {
        cpu_usage: usage,
        ..reference_snapshot()
    }
}

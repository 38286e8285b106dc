// Domain models: raw host counters and the aggregated snapshot

mod host;
mod snapshot;

pub use host::{BYTES_PER_GIB, CpuTimes, HostIdentity, MemoryStats};
pub use snapshot::{MemoryUsage, PollView, Snapshot};

// Typed failures for sampling and polling

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SamplingError {
    /// Probe executable missing, not runnable, or exited non-zero.
    #[error("thermal probe unavailable: {0}")]
    ProbeUnavailable(String),
    #[error("thermal probe output not understood: {output:?}")]
    ProbeParse { output: String },
    #[error("thermal probe did not finish within {0:?}")]
    ProbeTimeout(Duration),
    /// A core reported zero accumulated time, so its utilization is undefined.
    #[error("cpu{core} reported zero total time")]
    ComputationFault { core: usize },
    #[error("host counters unavailable ({stage}): {message}")]
    HostCounters {
        stage: &'static str,
        message: String,
    },
}

impl SamplingError {
    /// Pipeline stage that failed: "thermal", "cpu" or "memory".
    pub fn stage(&self) -> &'static str {
        match self {
            SamplingError::ProbeUnavailable(_)
            | SamplingError::ProbeParse { .. }
            | SamplingError::ProbeTimeout(_) => "thermal",
            SamplingError::ComputationFault { .. } => "cpu",
            SamplingError::HostCounters { stage, .. } => *stage,
        }
    }

    pub(crate) fn host(stage: &'static str, message: impl std::fmt::Display) -> Self {
        SamplingError::HostCounters {
            stage,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PollError {
    #[error(transparent)]
    Sampling(#[from] SamplingError),
    /// Endpoint unreachable, non-success status, or undecodable body.
    #[error("transport failure: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("poller is already running")]
    AlreadyRunning,
    #[error("poller has been stopped")]
    Stopped,
}

// Snapshot wire model (JSON camelCase, per-core usage as one-decimal text)

use serde::{Deserialize, Serialize};

use super::HostIdentity;

/// Memory occupancy in GiB, two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub total: f64,
    pub used: f64,
    pub free: f64,
}

/// One aggregated, immutable telemetry reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(flatten)]
    pub host: HostIdentity,
    /// Degrees Celsius. `None` only when the sampler runs with the partial thermal policy.
    pub cpu_temp: Option<f64>,
    /// Per-core utilization in percent, ordered by core index.
    #[serde(with = "percent_text")]
    pub cpu_usage: Vec<f64>,
    pub memory_usage: MemoryUsage,
}

/// What a display renders: the last good snapshot and the latest error, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollView {
    pub snapshot: Option<Snapshot>,
    pub error: Option<String>,
}

impl PollView {
    pub fn is_loading(&self) -> bool {
        self.snapshot.is_none() && self.error.is_none()
    }
}

/// Percentages travel as strings with exactly one decimal ("30.0").
mod percent_text {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[f64], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(values.iter().map(|v| format!("{:.1}", v)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
        let raw = Vec::<String>::deserialize(d)?;
        raw.iter()
            .map(|s| {
                s.trim()
                    .parse::<f64>()
                    .map_err(|e| D::Error::custom(format!("cpu usage {:?}: {}", s, e)))
            })
            .collect()
    }
}

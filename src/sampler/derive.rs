// Pure derivations: counters -> percentages, bytes -> GiB

use crate::error::SamplingError;
use crate::models::{BYTES_PER_GIB, CpuTimes, MemoryStats, MemoryUsage};

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// `100 - 100 * idle / total`, one decimal. Not clamped: anomalous counters
/// may yield values outside [0, 100].
pub fn core_usage(core: usize, times: &CpuTimes) -> Result<f64, SamplingError> {
    let total = times.total();
    if total == 0 {
        return Err(SamplingError::ComputationFault { core });
    }
    let usage = 100.0 - (100.0 * times.idle as f64) / total as f64;
    Ok(round_to(usage, 1))
}

/// Since-boot utilization for every core.
pub fn usage_since_boot(cores: &[CpuTimes]) -> Result<Vec<f64>, SamplingError> {
    cores
        .iter()
        .enumerate()
        .map(|(core, times)| core_usage(core, times))
        .collect()
}

/// Utilization between `previous` and `current`. Falls back to the since-boot
/// figure when there is no comparable previous sample or a core's counters
/// did not advance.
pub fn usage_between(
    previous: Option<&[CpuTimes]>,
    current: &[CpuTimes],
) -> Result<Vec<f64>, SamplingError> {
    let Some(previous) = previous.filter(|p| p.len() == current.len()) else {
        return usage_since_boot(current);
    };
    current
        .iter()
        .zip(previous)
        .enumerate()
        .map(|(core, (now, before))| {
            let delta = now.since(before);
            if delta.total() == 0 {
                core_usage(core, now)
            } else {
                core_usage(core, &delta)
            }
        })
        .collect()
}

pub fn bytes_to_gib(bytes: u64) -> f64 {
    round_to(bytes as f64 / BYTES_PER_GIB, 2)
}

pub fn normalize_memory(stats: &MemoryStats) -> MemoryUsage {
    MemoryUsage {
        total: bytes_to_gib(stats.total_bytes),
        used: bytes_to_gib(stats.used_bytes()),
        free: bytes_to_gib(stats.free_bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(idle: u64, user: u64) -> CpuTimes {
        CpuTimes {
            idle,
            user,
            ..Default::default()
        }
    }

    #[test]
    fn test_round_to_keeps_requested_precision() {
        assert_eq!(round_to(33.333_333, 1), 33.3);
        assert_eq!(round_to(2.675_1, 2), 2.68);
    }

    #[test]
    fn test_interval_usage_uses_counter_deltas() {
        let before = [times(700, 300)];
        let after = [times(750, 350)];
        assert_eq!(usage_between(Some(&before), &after).unwrap(), vec![50.0]);
    }

    #[test]
    fn test_interval_usage_falls_back_without_comparable_previous() {
        let after = [times(700, 300), times(900, 100)];
        assert_eq!(usage_between(None, &after).unwrap(), vec![30.0, 10.0]);
        let before = [times(1, 1)];
        assert_eq!(
            usage_between(Some(&before), &after).unwrap(),
            vec![30.0, 10.0]
        );
    }

    #[test]
    fn test_interval_usage_falls_back_when_counters_did_not_advance() {
        let same = [times(700, 300)];
        assert_eq!(usage_between(Some(&same), &same).unwrap(), vec![30.0]);
    }

    #[test]
    fn test_free_larger_than_total_saturates_used() {
        let usage = normalize_memory(&MemoryStats {
            total_bytes: 1 << 30,
            free_bytes: 2 << 30,
        });
        assert_eq!(usage.used, 0.0);
    }
}

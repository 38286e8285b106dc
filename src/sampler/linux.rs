// Linux-specific helpers: per-core tick counters from /proc/stat.

use crate::models::CpuTimes;

/// Parse the `cpuN` lines of /proc/stat, in file order (= core index order).
/// The aggregate `cpu` line is skipped; fields missing on old kernels read as 0.
pub(super) fn parse_proc_stat(content: &str) -> Result<Vec<CpuTimes>, String> {
    let mut cores = Vec::new();
    for line in content.lines() {
        let mut fields = line.split_whitespace();
        let Some(label) = fields.next() else {
            continue;
        };
        let Some(index) = label.strip_prefix("cpu") else {
            continue;
        };
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        let values = fields
            .map(|f| f.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("{}: {}", label, e))?;
        if values.len() < 4 {
            return Err(format!("{}: expected at least 4 counters, got {}", label, values.len()));
        }
        let at = |i: usize| values.get(i).copied().unwrap_or(0);
        cores.push(CpuTimes {
            user: at(0),
            nice: at(1),
            system: at(2),
            idle: at(3),
            iowait: at(4),
            irq: at(5),
            softirq: at(6),
            steal: at(7),
        });
    }
    if cores.is_empty() {
        return Err("no per-core cpu lines".into());
    }
    Ok(cores)
}

/// Read per-core counters from `<proc_path>/stat`.
pub(super) fn read_cpu_times(proc_path: &str) -> Result<Vec<CpuTimes>, String> {
    #[cfg(target_os = "linux")]
    {
        let path = format!("{}/stat", proc_path.trim_end_matches('/'));
        let content = std::fs::read_to_string(&path).map_err(|e| format!("{}: {}", path, e))?;
        parse_proc_stat(&content)
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = proc_path;
        Err(format!(
            "per-core tick counters are not available on {}",
            std::env::consts::OS
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROC_STAT: &str = "\
cpu  2255 34 2290 22625563 6290 127 456 0 0 0
cpu0 1132 34 1441 11311718 3675 127 438 0 0 0
cpu1 1123 0 849 11313845 2614 0 18 0 0 0
intr 114930548 113199788 3 0 5 263 0 4 [... lots more numbers ...]
ctxt 1990473
btime 1062191376
";

    #[test]
    fn test_parses_each_core_in_order() {
        let cores = parse_proc_stat(PROC_STAT).unwrap();
        assert_eq!(cores.len(), 2);
        assert_eq!(cores[0].user, 1132);
        assert_eq!(cores[0].idle, 11311718);
        assert_eq!(cores[0].softirq, 438);
        assert_eq!(cores[1].system, 849);
        assert_eq!(cores[1].iowait, 2614);
    }

    #[test]
    fn test_short_lines_fill_missing_buckets_with_zero() {
        let cores = parse_proc_stat("cpu 1 2 3 4\ncpu0 1 2 3 4\n").unwrap();
        assert_eq!(cores[0].steal, 0);
        assert_eq!(cores[0].total(), 10);
    }

    #[test]
    fn test_rejects_input_without_core_lines() {
        assert!(parse_proc_stat("cpu 1 2 3 4\nctxt 5\n").is_err());
        assert!(parse_proc_stat("").is_err());
    }

    #[test]
    fn test_rejects_non_numeric_counters() {
        let err = parse_proc_stat("cpu0 1 2 x 4\n").unwrap_err();
        assert!(err.starts_with("cpu0"));
    }
}

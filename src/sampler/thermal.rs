// Thermal reading from an external probe executable (vcgencmd by default)

use crate::error::SamplingError;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Source of a single CPU temperature in degrees Celsius.
#[async_trait]
pub trait ThermalSource: Send + Sync {
    async fn read_celsius(&self) -> Result<f64, SamplingError>;
}

/// Runs `program args...` and parses a `temp=<float>'C` line from stdout.
#[derive(Debug, Clone)]
pub struct CommandProbe {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandProbe {
    /// `timeout = None` waits for the probe indefinitely.
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }
}

#[async_trait]
impl ThermalSource for CommandProbe {
    async fn read_celsius(&self) -> Result<f64, SamplingError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let run = cmd.output();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run)
                .await
                .map_err(|_| SamplingError::ProbeTimeout(limit))?,
            None => run.await,
        }
        .map_err(|e| SamplingError::ProbeUnavailable(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(SamplingError::ProbeUnavailable(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }
        parse_probe_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Extract the number from `temp=42.5'C`. Surrounding whitespace is ignored.
pub fn parse_probe_output(stdout: &str) -> Result<f64, SamplingError> {
    let line = stdout.trim();
    line.strip_prefix("temp=")
        .and_then(|rest| rest.strip_suffix("'C"))
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or_else(|| SamplingError::ProbeParse {
            output: line.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_vcgencmd_line() {
        assert_eq!(parse_probe_output("temp=42.5'C\n").unwrap(), 42.5);
        assert_eq!(parse_probe_output("temp=-3.0'C").unwrap(), -3.0);
    }

    #[test]
    fn test_rejects_garbage_and_partial_matches() {
        for bad in ["garbage", "", "temp=abc'C", "temp=42.5", "42.5'C", "temp=NaN'C", "temp=inf'C"] {
            let err = parse_probe_output(bad).unwrap_err();
            assert_eq!(err.stage(), "thermal", "input {:?}", bad);
            assert!(matches!(err, SamplingError::ProbeParse { .. }));
        }
    }
}

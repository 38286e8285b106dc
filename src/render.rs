// Plain-text rendering of a PollView for the watch client

use crate::models::PollView;
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

fn bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// Render the loading state, the last good snapshot, and the current error (if any).
pub fn render_view(view: &PollView) -> String {
    let mut out = String::new();
    if let Some(error) = &view.error {
        let _ = writeln!(out, "error: {}", error);
    }
    let Some(snapshot) = &view.snapshot else {
        if view.error.is_none() {
            out.push_str("Loading...\n");
        }
        return out;
    };

    let temp = snapshot
        .cpu_temp
        .map(|t| format!("{:.1}°C", t))
        .unwrap_or_else(|| "n/a".into());
    let _ = writeln!(out, "Hostname:        {}", snapshot.host.hostname);
    let _ = writeln!(out, "Platform:        {}", snapshot.host.platform);
    let _ = writeln!(out, "Architecture:    {}", snapshot.host.arch);
    let _ = writeln!(out, "CPU Temperature: {}", temp);
    out.push_str("CPU Usage\n");
    for (core, usage) in snapshot.cpu_usage.iter().enumerate() {
        let _ = writeln!(out, "  Core {:<3} {} {:>5.1}%", core, bar(*usage), usage);
    }
    let mem = &snapshot.memory_usage;
    let mem_percent = if mem.total > 0.0 {
        mem.used / mem.total * 100.0
    } else {
        0.0
    };
    let _ = writeln!(
        out,
        "Memory    {} {:.2} / {:.2} GB",
        bar(mem_percent),
        mem.used,
        mem.total
    );
    out
}

//! Rendering of the final session report.

use crate::histogram::bucket_bounds;
use crate::session::SessionReport;


const STARS_MAX: usize = 40;

pub fn render_text(report: &SessionReport) -> String {
    let hist = &report.histogram;
    let mut out = format!(
        "Readahead unused/total pages: {}/{}\n",
        hist.unused, hist.total
    );
    out.push_str(&render_log2_hist(&hist.slots, hist.unit));
    out
}

pub fn render_json(report: &SessionReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Classic power-of-two histogram: one row per slot up to the highest
/// non-empty one, with bars scaled to the largest count. Empty input renders
/// nothing.
pub fn render_log2_hist(slots: &[u64], unit: &str) -> String {
    let Some(idx_max) = slots.iter().rposition(|v| *v > 0) else {
        return String::new();
    };
    let val_max = slots.iter().copied().max().unwrap_or(0);

    let (pad, label_width, width, stars) = if idx_max <= 32 {
        (5, 19, 10, STARS_MAX)
    } else {
        (15, 29, 20, STARS_MAX / 2)
    };

    let mut out = format!("{:pad$}{:<label_width$} : count    distribution\n", "", unit);
    for (i, val) in slots.iter().enumerate().take(idx_max + 1) {
        let (low, high) = bucket_bounds(i);
        out.push_str(&format!(
            "{low:>width$} -> {high:<width$} : {val:<8} |{}|\n",
            bar(*val, val_max, stars)
        ));
    }
    out
}

fn bar(val: u64, val_max: u64, width: usize) -> String {
    let filled = (val.min(val_max) * width as u64 / val_max.max(1)) as usize;
    let mut s = "*".repeat(filled);
    s.push_str(&" ".repeat(width - filled));
    if val > val_max {
        s.push('+');
    }
    s
}

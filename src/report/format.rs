//! Formatted terminal output.
//!
//! Formatting lives here so the curve code stays free of presentation.

use crate::domain::Series;
use crate::report::RunSummary;

/// Format the full run summary: bias selection, grid, then one row per
/// visible series.
pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("=== pcurves - payoff curves ===\n");
    out.push_str(&format!("Bias mode: {}\n", summary.bias_mode.as_str()));
    out.push_str(&format!(
        "Effective biases: b1={:.4} b2={:.4}\n",
        summary.effective_b1, summary.effective_b2
    ));
    out.push_str(&format!(
        "Grid: n={} | x=[{:.3}, {:.3}]\n",
        summary.points,
        summary.x_range.lo(),
        summary.x_range.hi()
    ));
    out.push('\n');

    out.push_str(
        format!(
            "{:<22} {:>7} {:>14} {:>14}  {}\n",
            "series", "defined", "min", "max", "roots"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:-<22} {:-<7} {:-<14} {:-<14}  {:-<5}\n", "", "", "", "", "").trim_end(),
    );
    out.push('\n');

    for row in &summary.rows {
        let (lo, hi) = match row.range {
            Some((lo, hi)) => (format!("{lo:.4}"), format!("{hi:.4}")),
            None => ("-".to_string(), "-".to_string()),
        };
        out.push_str(
            format!(
                "{:<22} {:>7} {:>14} {:>14}  {}\n",
                row.series.name(),
                row.defined,
                lo,
                hi,
                fmt_roots(&row.roots)
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// One line per root, for scripting.
pub fn format_roots(series: Series, roots: &[f64]) -> String {
    let mut out = format!("# {series}: {} root(s)\n", roots.len());
    for r in roots {
        out.push_str(&format!("{r:.6}\n"));
    }
    out
}

/// Every series name with the toggle that controls it.
pub fn format_series_list() -> String {
    let mut out = String::new();
    for s in Series::ALL {
        out.push_str(&format!("{:<22} {}\n", s.name(), s.toggle().key()));
    }
    out
}

fn fmt_roots(roots: &[f64]) -> String {
    if roots.is_empty() {
        return "-".to_string();
    }
    let parts: Vec<String> = roots.iter().map(|x| format!("{x:.4}")).collect();
    parts.join(", ")
}

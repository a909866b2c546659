//! Chart data for the attribution bar chart (positive = favors approval)

use serde::Serialize;

use super::sign::ApprovalAttribution;
use crate::logic::features::{FEATURE_COUNT, FEATURE_LABELS, FEATURE_LAYOUT};

pub const CHART_TITLE: &str = "Impact on Approval (Positive = Increases Approval Probability)";

pub const APPROVAL_COLOR: &str = "#1f77b4";
pub const REJECTION_COLOR: &str = "#d62728";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub feature: &'static str,
    pub label: &'static str,
    pub value: f64,
    pub color: &'static str,
}

/// One bar per feature, layout order
pub fn chart_bars(attribution: &ApprovalAttribution) -> Vec<ChartBar> {
    (0..FEATURE_COUNT)
        .map(|i| {
            let value = attribution.values()[i];
            ChartBar {
                feature: FEATURE_LAYOUT[i],
                label: FEATURE_LABELS[i],
                value,
                color: if value > 0.0 { APPROVAL_COLOR } else { REJECTION_COLOR },
            }
        })
        .collect()
}

/// Horizontal text rendering, `+` bars favor approval and `-` bars rejection
pub fn render_text(bars: &[ChartBar], width: usize) -> String {
    let label_width = bars.iter().map(|b| b.label.len()).max().unwrap_or(0);
    let max_abs = bars.iter().map(|b| b.value.abs()).fold(0.0_f64, f64::max);

    let mut out = format!("{}\n", CHART_TITLE);
    for bar in bars {
        let len = if max_abs > 0.0 {
            ((bar.value.abs() / max_abs) * width as f64).round() as usize
        } else {
            0
        };
        let glyph = if bar.value > 0.0 { "+" } else { "-" };
        out.push_str(&format!(
            "{:<lw$} | {:<w$} {:+.4}\n",
            bar.label,
            glyph.repeat(len),
            bar.value,
            lw = label_width,
            w = width
        ));
    }
    out
}

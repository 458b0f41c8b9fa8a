//! Chart data preparation for the code composition donut.

use serde::{Deserialize, Serialize};

use crate::domain::LanguageBreakdown;

/// Maximum number of slices drawn in the composition chart.
pub const CHART_SLICE_LIMIT: usize = 5;

/// Slice colours, assigned by slice index.
pub const CHART_PALETTE: [&str; 5] = ["#8b5cf6", "#06b6d4", "#10b981", "#f59e0b", "#ec4899"];

/// One slice of the composition chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSlice {
    /// Language name.
    pub name: String,
    /// Byte size of the language.
    pub value: u64,
}

impl ChartSlice {
    /// Tooltip label, rounded to whole kilobytes with halves rounded up.
    pub fn kilobytes_label(&self) -> String {
        format!("{} KB", (self.value as f64 / 1024.0).round() as u64)
    }
}

/// Return the largest languages, biggest first, capped at [`CHART_SLICE_LIMIT`].
///
/// Equal sizes keep the order of the breakdown. Absent input yields no slices.
pub fn top_languages(breakdown: Option<&LanguageBreakdown>) -> Vec<ChartSlice> {
    let Some(breakdown) = breakdown else {
        return Vec::new();
    };
    let mut slices: Vec<ChartSlice> = breakdown
        .iter()
        .map(|(name, value)| ChartSlice {
            name: name.clone(),
            value: *value,
        })
        .collect();
    slices.sort_by(|a, b| b.value.cmp(&a.value));
    slices.truncate(CHART_SLICE_LIMIT);
    slices
}

/// Colour for the slice at `index`.
pub fn slice_color(index: usize) -> &'static str {
    CHART_PALETTE[index % CHART_PALETTE.len()]
}

/// Percentage share of each slice relative to the charted total.
pub fn slice_shares(slices: &[ChartSlice]) -> Vec<f64> {
    let total: u64 = slices.iter().map(|slice| slice.value).sum();
    if total == 0 {
        return vec![0.0; slices.len()];
    }
    slices
        .iter()
        .map(|slice| slice.value as f64 / total as f64 * 100.0)
        .collect()
}

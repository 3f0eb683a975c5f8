//! Boundary to the charting collaborator.
//!
//! Everything a renderer needs is carried by [`ChartData`] and
//! [`ChartOptions`]; how pixels get drawn is the renderer's business.

use crate::data::OriginSummary;
use crate::format::{format_compact, percent_of_total};
use crate::selection::{ActiveDataset, DisplayUnit, AMERICAS_COLOR, OTHER_COLOR};
use serde::Serialize;

/// Parallel label/value/color arrays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

impl ChartData {
    pub fn from_dataset(dataset: &ActiveDataset) -> Self {
        Self {
            labels: dataset.labels(),
            values: dataset.values(),
            colors: dataset.colors(),
        }
    }

    /// Origin shares, one segment per region
    pub fn from_origins(origins: &OriginSummary) -> Self {
        Self {
            labels: origins.regions.iter().map(|r| r.region.clone()).collect(),
            values: origins.regions.iter().map(|r| r.share).collect(),
            colors: origins
                .regions
                .iter()
                .map(|r| if r.americas { AMERICAS_COLOR } else { OTHER_COLOR }.to_string())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Each value scaled so the largest spans `extent`
    pub fn scaled(&self, extent: f64) -> Vec<f64> {
        let max = self.max_value();
        if max <= 0.0 {
            return vec![0.0; self.values.len()];
        }
        self.values.iter().map(|v| v / max * extent).collect()
    }

    /// (offset, width) of each segment when stacked into `extent`
    pub fn stacked(&self, extent: f64) -> Vec<(f64, f64)> {
        let sum: f64 = self.values.iter().sum();
        if sum <= 0.0 {
            return vec![(0.0, 0.0); self.values.len()];
        }

        let mut offset = 0.0;
        self.values
            .iter()
            .map(|v| {
                let width = v / sum * extent;
                let segment = (offset, width);
                offset += width;
                segment
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Ranked bars, one per country
    Bar,
    /// Single stacked bar of shares
    Proportion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Presentation options handed to the renderer alongside the data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub kind: ChartKind,
    pub orientation: Orientation,
    /// Unit the values are expressed in
    pub unit: DisplayUnit,
    /// Denominator used by the tooltip formatter
    pub total: u64,
    pub title: String,
}

impl ChartOptions {
    pub fn bar(dataset: &ActiveDataset, title: &str) -> Self {
        Self {
            kind: ChartKind::Bar,
            orientation: Orientation::Horizontal,
            unit: dataset.unit,
            total: dataset.total,
            title: title.to_string(),
        }
    }

    pub fn proportion(origins: &OriginSummary, title: &str) -> Self {
        Self {
            kind: ChartKind::Proportion,
            orientation: Orientation::Horizontal,
            unit: DisplayUnit::Percent,
            total: origins.total_foreign_born,
            title: title.to_string(),
        }
    }

    /// Hover text for one data point.
    ///
    /// Counts read `Mexico: 93.5K (42.3%)`, percentages read
    /// `Mexico: 42.3% (93.5K)`.
    pub fn tooltip(&self, label: &str, value: f64) -> String {
        match self.unit {
            DisplayUnit::Count => {
                let count = value.round().max(0.0) as u64;
                match percent_of_total(count, self.total) {
                    Ok(pct) => format!("{label}: {} ({pct}%)", format_compact(count)),
                    Err(_) => format!("{label}: {}", format_compact(count)),
                }
            }
            DisplayUnit::Percent => {
                let count = (value / 100.0 * self.total as f64).round().max(0.0) as u64;
                format!("{label}: {value:.1}% ({})", format_compact(count))
            }
        }
    }

    /// Axis tick / value label for one data point
    pub fn value_label(&self, value: f64) -> String {
        match self.unit {
            DisplayUnit::Count => format_compact(value.round().max(0.0) as u64),
            DisplayUnit::Percent => format!("{value:.1}%"),
        }
    }
}

/// A charting collaborator: pure function from data and options to output
pub trait ChartRenderer {
    type Output;

    fn render(&self, data: &ChartData, options: &ChartOptions) -> Self::Output;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::selection::Selection;
    use pretty_assertions::assert_eq;

    fn berkeley(unit: DisplayUnit) -> ActiveDataset {
        let registry = Registry::builtin();
        let mut selection = Selection::new(&registry);
        selection.set_display_unit(unit);
        selection.active_dataset(&registry).unwrap()
    }

    #[test]
    fn test_from_dataset_keeps_arrays_parallel() {
        let data = ChartData::from_dataset(&berkeley(DisplayUnit::Count));
        assert_eq!(data.len(), 9);
        assert_eq!(data.values.len(), 9);
        assert_eq!(data.colors.len(), 9);
        assert_eq!(data.labels[8], "Non-Americas");
        assert_eq!(data.colors[8], OTHER_COLOR);
    }

    #[test]
    fn test_max_value_follows_unit() {
        assert_eq!(ChartData::from_dataset(&berkeley(DisplayUnit::Count)).max_value(), 93_468.0);
        let percent = ChartData::from_dataset(&berkeley(DisplayUnit::Percent)).max_value();
        assert!((percent - 42.3).abs() < 0.05);
    }

    #[test]
    fn test_count_tooltip() {
        let dataset = berkeley(DisplayUnit::Count);
        let options = ChartOptions::bar(&dataset, "Arrests");
        assert_eq!(options.tooltip("Mexico", 93_468.0), "Mexico: 93.5K (42.3%)");
        assert_eq!(options.value_label(220_931.0), "221K");
    }

    #[test]
    fn test_percent_tooltip() {
        let dataset = berkeley(DisplayUnit::Percent);
        let options = ChartOptions::bar(&dataset, "Arrests");
        let mexico = dataset.rows[0].value;
        assert_eq!(options.tooltip("Mexico", mexico), "Mexico: 42.3% (93.5K)");
        assert_eq!(options.value_label(mexico), "42.3%");
    }

    #[test]
    fn test_tooltip_with_zero_total() {
        let options = ChartOptions {
            kind: ChartKind::Bar,
            orientation: Orientation::Horizontal,
            unit: DisplayUnit::Count,
            total: 0,
            title: String::new(),
        };
        assert_eq!(options.tooltip("Nowhere", 0.0), "Nowhere: 0");
    }

    #[test]
    fn test_proportion_chart() {
        let registry = Registry::builtin();
        let data = ChartData::from_origins(registry.origins());
        let options = ChartOptions::proportion(registry.origins(), "Origins");
        assert_eq!(data.len(), 9);
        assert_eq!(options.kind, ChartKind::Proportion);
        assert_eq!(options.tooltip("Mexico", 22.9), "Mexico: 22.9% (12M)");
    }

    #[test]
    fn test_scaled() {
        let data = ChartData {
            labels: vec!["a".into(), "b".into()],
            values: vec![50.0, 25.0],
            colors: vec![OTHER_COLOR.into(), OTHER_COLOR.into()],
        };
        assert_eq!(data.scaled(200.0), vec![200.0, 100.0]);
    }

    #[test]
    fn test_stacked_fills_extent() {
        let registry = Registry::builtin();
        let data = ChartData::from_origins(registry.origins());
        let segments = data.stacked(1000.0);

        assert_eq!(segments[0].0, 0.0);
        let (last_offset, last_width) = segments[segments.len() - 1];
        assert!((last_offset + last_width - 1000.0).abs() < 1e-6);
        for pair in segments.windows(2) {
            assert!((pair[0].0 + pair[0].1 - pair[1].0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_data_scales_to_zero() {
        let data = ChartData {
            labels: Vec::new(),
            values: Vec::new(),
            colors: Vec::new(),
        };
        assert!(data.is_empty());
        assert!(data.scaled(100.0).is_empty());
        assert!(data.stacked(100.0).is_empty());
    }
}

//! Chart renderers for the terminal and for Chart.js

use americas_core::{ChartData, ChartKind, ChartOptions, ChartRenderer, Orientation};
use serde_json::{json, Value};

/// Draws charts as rows of block characters
pub struct TextRenderer {
    /// Width of the longest bar, in characters
    pub width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { width: 40 }
    }
}

impl ChartRenderer for TextRenderer {
    type Output = String;

    fn render(&self, data: &ChartData, options: &ChartOptions) -> String {
        let mut lines = Vec::new();
        if !options.title.is_empty() {
            lines.push(options.title.clone());
        }

        let label_width = data.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        match options.kind {
            ChartKind::Bar => {
                let lengths = data.scaled(self.width as f64);
                for ((label, value), length) in data.labels.iter().zip(&data.values).zip(lengths) {
                    let bar = "█".repeat(length.round() as usize);
                    lines.push(format!(
                        "{label:<label_width$}  {bar:<width$}  {}",
                        options.value_label(*value),
                        width = self.width
                    ));
                }
            }
            ChartKind::Proportion => {
                for ((label, value), (_, segment)) in data
                    .labels
                    .iter()
                    .zip(&data.values)
                    .zip(data.stacked(self.width as f64))
                {
                    let bar = "▒".repeat(segment.round() as usize);
                    lines.push(format!(
                        "{label:<label_width$}  {bar:<width$}  {}",
                        options.tooltip(label, *value),
                        width = self.width
                    ));
                }
            }
        }

        lines.join("\n")
    }
}

/// Produces a Chart.js configuration object
#[derive(Default)]
pub struct ChartJsRenderer;

impl ChartRenderer for ChartJsRenderer {
    type Output = Value;

    fn render(&self, data: &ChartData, options: &ChartOptions) -> Value {
        let tooltips: Vec<String> = data
            .labels
            .iter()
            .zip(&data.values)
            .map(|(label, value)| options.tooltip(label, *value))
            .collect();
        let index_axis = match options.orientation {
            Orientation::Horizontal => "y",
            Orientation::Vertical => "x",
        };

        match options.kind {
            ChartKind::Bar => json!({
                "type": "bar",
                "data": {
                    "labels": data.labels,
                    "datasets": [{
                        "label": options.title,
                        "data": data.values,
                        "backgroundColor": data.colors,
                        "tooltips": tooltips,
                    }],
                },
                "options": {
                    "indexAxis": index_axis,
                    "plugins": { "legend": { "display": false } },
                },
            }),
            ChartKind::Proportion => {
                let datasets: Vec<Value> = data
                    .labels
                    .iter()
                    .zip(&data.values)
                    .zip(&data.colors)
                    .zip(&tooltips)
                    .map(|(((label, value), color), tooltip)| {
                        json!({
                            "label": label,
                            "data": [value],
                            "backgroundColor": color,
                            "tooltips": [tooltip],
                        })
                    })
                    .collect();

                json!({
                    "type": "bar",
                    "data": {
                        "labels": [options.title],
                        "datasets": datasets,
                    },
                    "options": {
                        "indexAxis": index_axis,
                        "scales": {
                            "x": { "stacked": true, "max": 100 },
                            "y": { "stacked": true },
                        },
                    },
                })
            }
        }
    }
}

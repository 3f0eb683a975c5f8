//! View-models for the dashboard components.
//!
//! Each function here is a pure projection of the registry and the current
//! selection; front ends only turn the result into markup.

use crate::chart::{ChartData, ChartOptions};
use crate::data::FiscalYear;
use crate::error::Result;
use crate::format::{format_compact, format_grouped, percent};
use crate::registry::Registry;
use crate::selection::{
    ActiveDataset, Callout, DataSource, DisplayUnit, Selection, Transition, AMERICAS_COLOR,
    OTHER_COLOR,
};
use serde::Serialize;

/// One figure in the stat strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatItem {
    pub value: String,
    pub label: String,
}

/// Headline figures shown above the charts
pub fn stat_strip(registry: &Registry) -> Result<Vec<StatItem>> {
    let range = registry.berkeley_range().label();
    Ok(vec![
        StatItem {
            value: format_compact(registry.total_foreign_born()),
            label: "foreign-born residents".to_string(),
        },
        StatItem {
            value: format!("{}%", registry.americas_population_share()?),
            label: "born in the Americas".to_string(),
        },
        StatItem {
            value: format_compact(registry.berkeley_total()),
            label: format!("ICE arrests, {range}"),
        },
        StatItem {
            value: format!("{}%", registry.berkeley_americas_share()?),
            label: "of those arrests were of people from the Americas".to_string(),
        },
    ])
}

/// A bar in the ranked bar chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarRow {
    pub label: String,
    pub value_label: String,
    pub tooltip: String,
    /// Bar length relative to the longest bar, 0..=1
    pub fraction: f64,
    pub color: String,
}

pub fn bar_rows(dataset: &ActiveDataset) -> Vec<BarRow> {
    let data = ChartData::from_dataset(dataset);
    let options = ChartOptions::bar(dataset, "");
    let fractions = data.scaled(1.0);

    data.labels
        .into_iter()
        .zip(data.values)
        .zip(data.colors)
        .zip(fractions)
        .map(|(((label, value), color), fraction)| BarRow {
            value_label: options.value_label(value),
            tooltip: options.tooltip(&label, value),
            label,
            fraction,
            color,
        })
        .collect()
}

/// A segment of the proportion chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub label: String,
    pub share: f64,
    pub tooltip: String,
    /// Start and width as fractions of the full bar
    pub offset: f64,
    pub width: f64,
    pub color: String,
}

pub fn proportion_segments(registry: &Registry) -> Vec<Segment> {
    let origins = registry.origins();
    let data = ChartData::from_origins(origins);
    let options = ChartOptions::proportion(origins, "");
    let stacked = data.stacked(1.0);

    data.labels
        .into_iter()
        .zip(data.values)
        .zip(data.colors)
        .zip(stacked)
        .map(|(((label, share), color), (offset, width))| Segment {
            tooltip: options.tooltip(&label, share),
            label,
            share,
            offset,
            width,
            color,
        })
        .collect()
}

/// One of the population-vs-arrests comparison bars
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonBar {
    pub label: String,
    pub percent: f64,
    pub display: String,
    pub color: String,
}

/// Americas share of the foreign-born population next to the Americas share
/// of arrests in the active source
pub fn comparison_bars(registry: &Registry, selection: &Selection) -> Result<Vec<ComparisonBar>> {
    let population = percent(
        registry.americas_population() as f64,
        registry.total_foreign_born() as f64,
    )?;
    let callout = selection.americas_callout(registry)?;
    let arrests = percent(callout.americas as f64, callout.total as f64)?;

    let arrests_label = match (selection.data_source(), selection.fiscal_year()) {
        (DataSource::Ero, Some(fy)) => format!("Share of ICE arrests ({fy})"),
        _ => format!("Share of ICE arrests ({})", registry.berkeley_range().label()),
    };

    Ok(vec![
        ComparisonBar {
            label: "Share of foreign-born population".to_string(),
            percent: population,
            display: format!("{}%", registry.americas_population_share()?),
            color: OTHER_COLOR.to_string(),
        },
        ComparisonBar {
            label: arrests_label,
            percent: arrests,
            display: format!("{}%", callout.share),
            color: AMERICAS_COLOR.to_string(),
        },
    ])
}

/// "88,006 / 88,907 → 99.0% from the Americas"
pub fn callout_text(callout: &Callout) -> String {
    format!(
        "{} / {} → {}% from the Americas",
        format_grouped(callout.americas),
        format_grouped(callout.total),
        callout.share
    )
}

/// A labelled activatable control
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toggle {
    pub label: String,
    /// Derived from the selection, never stored
    pub active: bool,
    pub enabled: bool,
    pub transition: Transition,
}

pub fn source_toggles(selection: &Selection) -> Vec<Toggle> {
    DataSource::ALL
        .into_iter()
        .map(|source| Toggle {
            label: source.label().to_string(),
            active: selection.data_source() == source,
            enabled: true,
            transition: Transition::DataSource(source),
        })
        .collect()
}

pub fn unit_toggles(selection: &Selection) -> Vec<Toggle> {
    DisplayUnit::ALL
        .into_iter()
        .map(|unit| Toggle {
            label: unit.label().to_string(),
            active: selection.display_unit() == unit,
            enabled: true,
            transition: Transition::DisplayUnit(unit),
        })
        .collect()
}

/// Fiscal-year choices; only registry years are offered, and they are inert
/// while Berkeley is shown
pub fn fiscal_year_toggles(registry: &Registry, selection: &Selection) -> Vec<Toggle> {
    registry
        .fiscal_years()
        .rev()
        .map(|fy: FiscalYear| Toggle {
            label: fy.to_string(),
            active: selection.fiscal_year() == Some(fy),
            enabled: selection.fiscal_year_active(),
            transition: Transition::FiscalYear(fy),
        })
        .collect()
}

/// Source note under a chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    pub text: String,
    pub url: Option<String>,
}

pub const BERKELEY_URL: &str = "https://deportationdata.org/";
pub const ERO_URL: &str = "https://www.ice.gov/statistics";

/// Citation for the active arrest source
pub fn arrest_citation(registry: &Registry, selection: &Selection) -> Citation {
    match (selection.data_source(), selection.fiscal_year()) {
        (DataSource::Ero, Some(fy)) => Citation {
            text: format!("Source: ICE Enforcement and Removal Operations, {fy} administrative arrests by country of citizenship."),
            url: Some(ERO_URL.to_string()),
        },
        _ => Citation {
            text: format!(
                "Source: ICE arrests {}, obtained by FOIA request (Deportation Data Project, UC Berkeley).",
                registry.berkeley_range().label()
            ),
            url: Some(BERKELEY_URL.to_string()),
        },
    }
}

pub fn origin_citation(registry: &Registry) -> Citation {
    let origins = registry.origins();
    Citation {
        text: format!("Source: {}.", origins.source),
        url: Some(origins.source_url.clone()),
    }
}

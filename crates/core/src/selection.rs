//! Selection state: which arrest source, unit and fiscal year are on screen,
//! and the chart rows derived from it

use crate::data::{ArrestRecord, FiscalYear};
use crate::error::{Error, Result};
use crate::format::{americas_share_percent, percent};
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Bar color for countries in the Americas
pub const AMERICAS_COLOR: &str = "#d97706";
/// Bar color for everything else
pub const OTHER_COLOR: &str = "#64748b";

/// Arrest dataset backing the bar chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// FOIA release, one fixed date window
    #[default]
    Berkeley,
    /// Agency statistics keyed by fiscal year
    Ero,
}

impl DataSource {
    pub const ALL: [DataSource; 2] = [DataSource::Berkeley, DataSource::Ero];

    pub fn label(self) -> &'static str {
        match self {
            DataSource::Berkeley => "Berkeley FOIA",
            DataSource::Ero => "ICE ERO",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How bar values are expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    #[default]
    Count,
    Percent,
}

impl DisplayUnit {
    pub const ALL: [DisplayUnit; 2] = [DisplayUnit::Count, DisplayUnit::Percent];

    pub fn label(self) -> &'static str {
        match self {
            DisplayUnit::Count => "Count",
            DisplayUnit::Percent => "Percent",
        }
    }
}

impl fmt::Display for DisplayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single user action on one of the toggle controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    DataSource(DataSource),
    DisplayUnit(DisplayUnit),
    FiscalYear(FiscalYear),
}

/// The dashboard's only mutable state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    data_source: DataSource,
    display_unit: DisplayUnit,
    fiscal_year: Option<FiscalYear>,
}

impl Selection {
    /// Berkeley, counts, most recent fiscal year
    pub fn new(registry: &Registry) -> Self {
        Self {
            data_source: DataSource::default(),
            display_unit: DisplayUnit::default(),
            fiscal_year: registry.latest_fiscal_year(),
        }
    }

    pub fn data_source(&self) -> DataSource {
        self.data_source
    }

    pub fn display_unit(&self) -> DisplayUnit {
        self.display_unit
    }

    /// Stored fiscal year; kept while Berkeley is shown
    pub fn fiscal_year(&self) -> Option<FiscalYear> {
        self.fiscal_year
    }

    /// Whether the fiscal-year selector takes input
    pub fn fiscal_year_active(&self) -> bool {
        self.data_source == DataSource::Ero
    }

    pub fn set_data_source(&mut self, source: DataSource) {
        debug!("Data source: {} -> {}", self.data_source, source);
        self.data_source = source;
    }

    pub fn set_display_unit(&mut self, unit: DisplayUnit) {
        debug!("Display unit: {} -> {}", self.display_unit, unit);
        self.display_unit = unit;
    }

    /// Select a fiscal year. Only ERO has fiscal years, and only years the
    /// registry knows are accepted.
    pub fn set_fiscal_year(&mut self, registry: &Registry, fy: FiscalYear) -> Result<()> {
        if !self.fiscal_year_active() {
            return Err(Error::InvalidSelection(format!(
                "{fy} selected while showing {}",
                self.data_source
            )));
        }
        if !registry.contains_fiscal_year(fy) {
            return Err(Error::InvalidSelection(format!("{fy} is not in the registry")));
        }

        debug!("Fiscal year: {:?} -> {}", self.fiscal_year, fy);
        self.fiscal_year = Some(fy);
        Ok(())
    }

    /// Apply exactly one transition
    pub fn apply(&mut self, registry: &Registry, transition: Transition) -> Result<()> {
        match transition {
            Transition::DataSource(source) => self.set_data_source(source),
            Transition::DisplayUnit(unit) => self.set_display_unit(unit),
            Transition::FiscalYear(fy) => self.set_fiscal_year(registry, fy)?,
        }
        Ok(())
    }

    fn selected_bucket_year(&self) -> Result<FiscalYear> {
        self.fiscal_year
            .ok_or_else(|| Error::InvalidSelection("no fiscal year selected".to_string()))
    }

    /// Rows and total from the active source, before any unit transform
    fn resolve_source<'a>(&self, registry: &'a Registry) -> Result<(&'a [ArrestRecord], u64)> {
        match self.data_source {
            DataSource::Berkeley => Ok((registry.berkeley(), registry.berkeley_total())),
            DataSource::Ero => {
                let bucket = registry.bucket(self.selected_bucket_year()?)?;
                Ok((&bucket.top_countries, bucket.total_arrests))
            }
        }
    }

    /// Chart rows for the current selection.
    ///
    /// The source is resolved first, then every value goes through the same
    /// unit transform whichever source it came from.
    pub fn active_dataset(&self, registry: &Registry) -> Result<ActiveDataset> {
        let (records, total) = self.resolve_source(registry)?;

        let rows = records
            .iter()
            .map(|record| -> Result<DataRow> {
                let raw = record.arrests as f64;
                let value = match self.display_unit {
                    DisplayUnit::Count => raw,
                    DisplayUnit::Percent => percent(raw, total as f64)?,
                };
                Ok(DataRow {
                    label: record.country.clone(),
                    raw: record.arrests,
                    value,
                    americas: record.americas,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ActiveDataset {
            source: self.data_source,
            unit: self.display_unit,
            fiscal_year: match self.data_source {
                DataSource::Berkeley => None,
                DataSource::Ero => self.fiscal_year,
            },
            rows,
            total,
        })
    }

    /// Americas count, total and share for the active source
    pub fn americas_callout(&self, registry: &Registry) -> Result<Callout> {
        let (americas, total) = match self.data_source {
            DataSource::Berkeley => (registry.berkeley_americas(), registry.berkeley_total()),
            DataSource::Ero => {
                let bucket = registry.bucket(self.selected_bucket_year()?)?;
                (bucket.americas_arrests, bucket.total_arrests)
            }
        };

        Ok(Callout {
            americas,
            total,
            share: americas_share_percent(americas, total)?,
        })
    }
}

/// One bar of the active dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataRow {
    pub label: String,
    /// Arrest count before the unit transform
    pub raw: u64,
    /// Value in the active display unit
    pub value: f64,
    pub americas: bool,
}

/// Chart input derived from a [`Selection`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveDataset {
    pub source: DataSource,
    pub unit: DisplayUnit,
    /// Set for ERO only
    pub fiscal_year: Option<FiscalYear>,
    pub rows: Vec<DataRow>,
    /// Denominator for percentages
    pub total: u64,
}

impl ActiveDataset {
    pub fn labels(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.label.clone()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.value).collect()
    }

    pub fn colors(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| if r.americas { AMERICAS_COLOR } else { OTHER_COLOR }.to_string())
            .collect()
    }
}

/// "88,006 / 88,907 → 99.0% from the Americas"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Callout {
    pub americas: u64,
    pub total: u64,
    pub share: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> Registry {
        Registry::builtin()
    }

    #[test]
    fn test_default_selection() {
        let registry = registry();
        let selection = Selection::new(&registry);
        assert_eq!(selection.data_source(), DataSource::Berkeley);
        assert_eq!(selection.display_unit(), DisplayUnit::Count);
        assert_eq!(selection.fiscal_year(), Some(FiscalYear::new(2024)));
        assert!(!selection.fiscal_year_active());
    }

    #[test]
    fn test_default_dataset_is_berkeley_counts() {
        let registry = registry();
        let dataset = Selection::new(&registry).active_dataset(&registry).unwrap();

        assert_eq!(dataset.rows.len(), 9);
        assert_eq!(dataset.total, 220_931);
        assert_eq!(dataset.fiscal_year, None);
        let sum: f64 = dataset.values().iter().sum();
        assert_eq!(sum, 220_931.0);
        assert_eq!(dataset.labels()[0], "Mexico");
    }

    #[test]
    fn test_every_combination() {
        let registry = registry();
        let years: Vec<FiscalYear> = registry.fiscal_years().collect();
        let mut combinations = 0;

        for source in DataSource::ALL {
            for unit in DisplayUnit::ALL {
                for &fy in &years {
                    let mut selection = Selection::new(&registry);
                    selection.set_data_source(DataSource::Ero);
                    selection.set_fiscal_year(&registry, fy).unwrap();
                    selection.set_data_source(source);
                    selection.set_display_unit(unit);

                    let native = match source {
                        DataSource::Berkeley => registry.berkeley().len(),
                        DataSource::Ero => registry.bucket(fy).unwrap().top_countries.len(),
                    };
                    check_dataset(&selection, &registry, native);
                    combinations += 1;
                }
            }
        }

        assert_eq!(combinations, 20);
    }

    fn check_dataset(selection: &Selection, registry: &Registry, native_len: usize) {
        let dataset = selection.active_dataset(registry).unwrap();
        assert_eq!(dataset.rows.len(), native_len);
        assert_eq!(dataset.colors().len(), native_len);
        assert!(dataset.values().iter().all(|v| *v >= 0.0));

        match selection.display_unit() {
            DisplayUnit::Percent => {
                assert!(dataset.values().iter().all(|v| *v <= 100.0));
            }
            DisplayUnit::Count => {
                for row in &dataset.rows {
                    assert_eq!(row.value, row.raw as f64);
                }
            }
        }
    }

    #[test]
    fn test_percent_transform_matches_both_sources() {
        let registry = registry();
        let mut selection = Selection::new(&registry);
        selection.set_display_unit(DisplayUnit::Percent);

        let berkeley = selection.active_dataset(&registry).unwrap();
        let mexico = &berkeley.rows[0];
        assert!((mexico.value - 93_468.0 / 220_931.0 * 100.0).abs() < 1e-9);

        selection.set_data_source(DataSource::Ero);
        let ero = selection.active_dataset(&registry).unwrap();
        let mexico = &ero.rows[0];
        assert!((mexico.value - 41_213.0 / 88_907.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_ero_fy2024_percent_scenario() {
        let registry = registry();
        let mut selection = Selection::new(&registry);
        selection.set_data_source(DataSource::Ero);
        selection
            .set_fiscal_year(&registry, "FY2024".parse().unwrap())
            .unwrap();
        selection.set_display_unit(DisplayUnit::Percent);

        let dataset = selection.active_dataset(&registry).unwrap();
        assert_eq!(dataset.rows.len(), 9);
        assert_eq!(dataset.fiscal_year, Some(FiscalYear::new(2024)));
        let sum: f64 = dataset.values().iter().sum();
        assert!((sum - 100.0).abs() < 0.01, "sum was {sum}");

        let callout = selection.americas_callout(&registry).unwrap();
        assert_eq!(
            callout,
            Callout {
                americas: 88_006,
                total: 88_907,
                share: "99.0".to_string(),
            }
        );
    }

    #[test]
    fn test_berkeley_callout() {
        let registry = registry();
        let callout = Selection::new(&registry).americas_callout(&registry).unwrap();
        assert_eq!(callout.americas, 204_528);
        assert_eq!(callout.total, 220_931);
        assert_eq!(callout.share, "92.6");
    }

    #[test]
    fn test_set_data_source_is_idempotent() {
        let registry = registry();
        let mut once = Selection::new(&registry);
        once.set_data_source(DataSource::Berkeley);

        let mut twice = Selection::new(&registry);
        twice.set_data_source(DataSource::Berkeley);
        twice.set_data_source(DataSource::Berkeley);

        assert_eq!(once, twice);
        assert_eq!(
            once.active_dataset(&registry).unwrap(),
            twice.active_dataset(&registry).unwrap()
        );
    }

    #[test]
    fn test_fiscal_year_survives_source_round_trip() {
        let registry = registry();
        let fy2021 = FiscalYear::new(2021);
        let mut selection = Selection::new(&registry);

        selection.set_data_source(DataSource::Ero);
        selection.set_fiscal_year(&registry, fy2021).unwrap();
        selection.set_data_source(DataSource::Berkeley);
        assert_eq!(selection.fiscal_year(), Some(fy2021));
        selection.set_data_source(DataSource::Ero);

        assert_eq!(selection.fiscal_year(), Some(fy2021));
        let dataset = selection.active_dataset(&registry).unwrap();
        assert_eq!(dataset.total, 74_082);
    }

    #[test]
    fn test_display_unit_leaves_source_alone() {
        let registry = registry();
        let mut selection = Selection::new(&registry);
        selection.set_data_source(DataSource::Ero);
        selection.set_display_unit(DisplayUnit::Percent);
        assert_eq!(selection.data_source(), DataSource::Ero);
        assert_eq!(selection.fiscal_year(), Some(FiscalYear::new(2024)));
    }

    #[test]
    fn test_unknown_fiscal_year_rejected() {
        let registry = registry();
        let mut selection = Selection::new(&registry);
        selection.set_data_source(DataSource::Ero);

        let err = selection
            .set_fiscal_year(&registry, FiscalYear::new(2010))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSelection(_)));
        assert_eq!(selection.fiscal_year(), Some(FiscalYear::new(2024)));
    }

    #[test]
    fn test_fiscal_year_rejected_while_berkeley() {
        let registry = registry();
        let mut selection = Selection::new(&registry);

        let err = selection
            .set_fiscal_year(&registry, FiscalYear::new(2022))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSelection(_)));
        assert_eq!(selection.fiscal_year(), Some(FiscalYear::new(2024)));
    }

    #[test]
    fn test_colors_follow_americas_flag() {
        let registry = registry();
        let dataset = Selection::new(&registry).active_dataset(&registry).unwrap();
        let colors = dataset.colors();
        assert_eq!(colors[0], AMERICAS_COLOR);
        assert_eq!(colors[8], OTHER_COLOR);
    }

    #[test]
    fn test_apply_dispatches_one_transition() {
        let registry = registry();
        let mut selection = Selection::new(&registry);

        selection
            .apply(&registry, Transition::DataSource(DataSource::Ero))
            .unwrap();
        selection
            .apply(&registry, Transition::FiscalYear(FiscalYear::new(2022)))
            .unwrap();
        selection
            .apply(&registry, Transition::DisplayUnit(DisplayUnit::Percent))
            .unwrap();

        assert_eq!(selection.data_source(), DataSource::Ero);
        assert_eq!(selection.fiscal_year(), Some(FiscalYear::new(2022)));
        assert_eq!(selection.display_unit(), DisplayUnit::Percent);
        assert!(selection
            .apply(&registry, Transition::FiscalYear(FiscalYear::new(1990)))
            .is_err());
    }

    #[test]
    fn test_selection_serializes_lowercase() {
        let registry = registry();
        let json = serde_json::to_value(Selection::new(&registry)).unwrap();
        assert_eq!(json["data_source"], "berkeley");
        assert_eq!(json["display_unit"], "count");
        assert_eq!(json["fiscal_year"], "FY2024");
    }
}

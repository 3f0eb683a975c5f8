//! Built-in datasets: origin shares, the Berkeley FOIA arrests and the ERO
//! fiscal-year figures

use crate::data::{ArrestRecord, FiscalYear, FiscalYearBucket, OriginRecord, OriginSummary};
use crate::error::{Error, Result};
use crate::format::{americas_share_percent, percent_of_total};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Coverage window of the Berkeley FOIA release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// "Sep 2023 – Jul 2025"
    pub fn label(&self) -> String {
        format!("{} – {}", self.start.format("%b %Y"), self.end.format("%b %Y"))
    }
}

/// Read-only collection of every dataset the dashboard shows
#[derive(Debug, Clone)]
pub struct Registry {
    origins: OriginSummary,
    berkeley: Vec<ArrestRecord>,
    berkeley_range: DateRange,
    ero: BTreeMap<FiscalYear, FiscalYearBucket>,
    berkeley_total: u64,
    berkeley_americas: u64,
}

impl Registry {
    /// The process-wide registry, built on first use
    pub fn global() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(Registry::builtin)
    }

    /// Build the registry from the datasets compiled into the crate
    pub fn builtin() -> Self {
        let berkeley = berkeley_arrests();
        let berkeley_total = berkeley.iter().map(|r| r.arrests).sum();
        let berkeley_americas = berkeley
            .iter()
            .filter(|r| r.americas)
            .map(|r| r.arrests)
            .sum();

        let ero = ero_buckets()
            .into_iter()
            .map(|bucket| (bucket.fiscal_year, bucket))
            .collect();

        Self {
            origins: builtin_origins(),
            berkeley,
            berkeley_range: DateRange {
                start: NaiveDate::from_ymd_opt(2023, 9, 1).expect("valid start date"),
                end: NaiveDate::from_ymd_opt(2025, 7, 28).expect("valid end date"),
            },
            ero,
            berkeley_total,
            berkeley_americas,
        }
    }

    /// Same arrest data, origin section replaced by a loaded summary
    pub fn with_origins(mut self, origins: OriginSummary) -> Self {
        self.origins = origins;
        self
    }

    pub fn origins(&self) -> &OriginSummary {
        &self.origins
    }

    pub fn berkeley(&self) -> &[ArrestRecord] {
        &self.berkeley
    }

    pub fn berkeley_range(&self) -> DateRange {
        self.berkeley_range
    }

    /// Sum of every Berkeley record (220,931)
    pub fn berkeley_total(&self) -> u64 {
        self.berkeley_total
    }

    /// Sum of the Americas-flagged Berkeley records (204,528)
    pub fn berkeley_americas(&self) -> u64 {
        self.berkeley_americas
    }

    /// Americas share of Berkeley arrests, one decimal
    pub fn berkeley_americas_share(&self) -> Result<String> {
        percent_of_total(self.berkeley_americas, self.berkeley_total)
    }

    pub fn total_foreign_born(&self) -> u64 {
        self.origins.total_foreign_born
    }

    pub fn americas_population(&self) -> u64 {
        self.origins.americas_count()
    }

    /// Americas share of the foreign-born population, one decimal
    pub fn americas_population_share(&self) -> Result<String> {
        americas_share_percent(self.americas_population(), self.total_foreign_born())
    }

    /// Fiscal years in ascending order
    pub fn fiscal_years(&self) -> impl DoubleEndedIterator<Item = FiscalYear> + '_ {
        self.ero.keys().copied()
    }

    pub fn contains_fiscal_year(&self, fy: FiscalYear) -> bool {
        self.ero.contains_key(&fy)
    }

    pub fn latest_fiscal_year(&self) -> Option<FiscalYear> {
        self.ero.keys().next_back().copied()
    }

    /// Look up one fiscal year
    pub fn bucket(&self, fy: FiscalYear) -> Result<&FiscalYearBucket> {
        self.ero.get(&fy).ok_or_else(|| Error::NotFound(fy.to_string()))
    }

    /// Check the invariants every derived value relies on.
    ///
    /// Returns the list of violations; an empty list means the registry is
    /// safe to derive percentages from.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.berkeley_total == 0 {
            problems.push("Berkeley dataset has a zero total".to_string());
        }
        if self.origins.total_foreign_born == 0 {
            problems.push("origin dataset has a zero foreign-born total".to_string());
        }
        if self.ero.is_empty() {
            problems.push("no ERO fiscal years".to_string());
        }

        let share_sum: f64 = self.origins.regions.iter().map(|r| r.share).sum();
        if (share_sum - 100.0).abs() > 1.0 {
            problems.push(format!("origin shares sum to {share_sum:.1}, expected 100 ±1"));
        }

        for bucket in self.ero.values() {
            let fy = bucket.fiscal_year;
            if bucket.total_arrests == 0 {
                problems.push(format!("{fy} has a zero total"));
            }
            if bucket.americas_arrests > bucket.total_arrests {
                problems.push(format!(
                    "{fy} Americas arrests {} exceed total {}",
                    bucket.americas_arrests, bucket.total_arrests
                ));
            }
            if bucket.top_countries.is_empty() {
                problems.push(format!("{fy} lists no countries"));
            }
            // Top-country rows may leave part of the total unlisted
            if bucket.listed_arrests() != bucket.total_arrests {
                debug!(
                    "{fy} country rows sum to {}, total is {}",
                    bucket.listed_arrests(),
                    bucket.total_arrests
                );
            }
        }

        for problem in &problems {
            warn!("Registry invariant violated: {}", problem);
        }
        problems
    }
}

fn origin(region: &str, count: u64, share: f64, americas: bool) -> OriginRecord {
    OriginRecord {
        region: region.to_string(),
        count,
        share,
        americas,
    }
}

/// ACS 2024 1-year, table B05006
fn builtin_origins() -> OriginSummary {
    OriginSummary {
        source: "ACS 2024 1-Year Estimates, Table B05006".to_string(),
        source_url: "https://data.census.gov/table/ACSDT1Y2024.B05006".to_string(),
        total_foreign_born: 50_234_841,
        regions: vec![
            origin("Mexico", 11_503_779, 22.9, true),
            origin("Caribbean", 5_324_893, 10.6, true),
            origin("Central America (ex Mexico)", 4_470_901, 8.9, true),
            origin("South America", 4_722_075, 9.4, true),
            origin("Canada", 853_992, 1.7, true),
            origin("Asia (ex Western Asia)", 13_261_998, 26.4, false),
            origin("Europe", 4_973_249, 9.9, false),
            origin("Sub-Saharan Africa", 2_662_447, 5.3, false),
            origin("Middle East / N. Africa", 2_210_333, 4.4, false),
        ],
        americas_total_share: 53.5,
    }
}

fn berkeley_arrests() -> Vec<ArrestRecord> {
    vec![
        ArrestRecord::new("Mexico", 93_468, true),
        ArrestRecord::new("Guatemala", 32_015, true),
        ArrestRecord::new("Honduras", 27_380, true),
        ArrestRecord::new("Venezuela", 15_903, true),
        ArrestRecord::new("El Salvador", 11_244, true),
        ArrestRecord::new("Colombia", 9_871, true),
        ArrestRecord::new("Ecuador", 8_127, true),
        ArrestRecord::new("Other Americas", 6_520, true),
        ArrestRecord::new("Non-Americas", 16_403, false),
    ]
}

fn bucket(year: u16, total: u64, americas: u64, rows: &[(&str, u64, bool)]) -> FiscalYearBucket {
    FiscalYearBucket {
        fiscal_year: FiscalYear::new(year),
        total_arrests: total,
        americas_arrests: americas,
        top_countries: rows
            .iter()
            .map(|&(country, arrests, americas)| ArrestRecord::new(country, arrests, americas))
            .collect(),
    }
}

fn ero_buckets() -> Vec<FiscalYearBucket> {
    vec![
        bucket(
            2020,
            103_603,
            99_487,
            &[
                ("Mexico", 54_830, true),
                ("Guatemala", 15_774, true),
                ("Honduras", 11_368, true),
                ("El Salvador", 5_633, true),
                ("Dominican Republic", 2_409, true),
                ("Cuba", 1_542, true),
                ("Nicaragua", 1_197, true),
                ("Ecuador", 1_173, true),
                ("Other", 9_677, false),
            ],
        ),
        bucket(
            2021,
            74_082,
            71_530,
            &[
                ("Mexico", 38_914, true),
                ("Guatemala", 11_325, true),
                ("Honduras", 8_862, true),
                ("El Salvador", 4_417, true),
                ("Dominican Republic", 1_729, true),
                ("Nicaragua", 1_134, true),
                ("Cuba", 1_046, true),
                ("Ecuador", 998, true),
                ("Other", 5_657, false),
            ],
        ),
        bucket(
            2022,
            46_396,
            44_950,
            &[
                ("Mexico", 22_141, true),
                ("Guatemala", 8_012, true),
                ("Honduras", 6_475, true),
                ("El Salvador", 2_794, true),
                ("Dominican Republic", 1_310, true),
                ("Nicaragua", 1_188, true),
                ("Colombia", 903, true),
                ("Ecuador", 871, true),
                ("Other", 2_702, false),
            ],
        ),
        bucket(
            2023,
            73_822,
            71_934,
            &[
                ("Mexico", 34_582, true),
                ("Guatemala", 12_403, true),
                ("Honduras", 10_511, true),
                ("El Salvador", 4_380, true),
                ("Dominican Republic", 2_237, true),
                ("Colombia", 2_104, true),
                ("Nicaragua", 1_968, true),
                ("Venezuela", 1_502, true),
                ("Other", 4_135, false),
            ],
        ),
        bucket(
            2024,
            88_907,
            88_006,
            &[
                ("Mexico", 41_213, true),
                ("Guatemala", 14_108, true),
                ("Honduras", 12_377, true),
                ("El Salvador", 5_284, true),
                ("Venezuela", 3_902, true),
                ("Colombia", 3_117, true),
                ("Ecuador", 2_846, true),
                ("Dominican Republic", 2_005, true),
                ("Other", 4_055, false),
            ],
        ),
    ]
}

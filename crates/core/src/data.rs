//! Data structures for origin shares and arrest records

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

/// Share of the foreign-born population born in one region
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OriginRecord {
    /// Display name of the region
    pub region: String,
    /// Foreign-born residents born in the region
    pub count: u64,
    /// Percentage of the foreign-born total, one decimal
    pub share: f64,
    /// Whether the region lies in the Americas
    pub americas: bool,
}

/// The origin dataset as written by the census pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OriginSummary {
    /// Human readable source description
    pub source: String,
    /// Link to the source table
    pub source_url: String,
    /// Total foreign-born population
    pub total_foreign_born: u64,
    /// Regions in display order
    pub regions: Vec<OriginRecord>,
    /// Rounded sum of the Americas shares
    pub americas_total_share: f64,
}

impl OriginSummary {
    /// Load an origin summary from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        let summary: Self = serde_json::from_str(&content)?;
        Ok(summary)
    }

    /// Save the summary as indented JSON, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::FileWrite {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| Error::FileWrite {
            path: path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Foreign-born residents born in the Americas
    pub fn americas_count(&self) -> u64 {
        self.regions
            .iter()
            .filter(|r| r.americas)
            .map(|r| r.count)
            .sum()
    }
}

/// Arrests attributed to one country of citizenship
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArrestRecord {
    /// Country, or a residual bucket such as "Other"
    pub country: String,
    /// Number of arrests
    pub arrests: u64,
    /// Whether the country lies in the Americas
    pub americas: bool,
}

impl ArrestRecord {
    pub fn new(country: &str, arrests: u64, americas: bool) -> Self {
        Self {
            country: country.to_string(),
            arrests,
            americas,
        }
    }
}

/// A government fiscal year, labelled `FY2024` and friends
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FiscalYear(u16);

impl FiscalYear {
    pub const fn new(year: u16) -> Self {
        Self(year)
    }

    pub fn year(self) -> u16 {
        self.0
    }
}

fn fiscal_year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(?i)FY\s?(\d{4})$").expect("fiscal year pattern is valid"))
}

impl FromStr for FiscalYear {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let caps = fiscal_year_pattern()
            .captures(s)
            .ok_or_else(|| Error::Parse(format!("Invalid fiscal year label: {s}")))?;
        let year = caps[1]
            .parse::<u16>()
            .map_err(|e| Error::Parse(format!("Invalid fiscal year {s}: {e}")))?;
        Ok(Self(year))
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FY{}", self.0)
    }
}

impl TryFrom<String> for FiscalYear {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<FiscalYear> for String {
    fn from(fy: FiscalYear) -> Self {
        fy.to_string()
    }
}

/// ERO arrest figures for one fiscal year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FiscalYearBucket {
    pub fiscal_year: FiscalYear,
    /// All administrative arrests in the year
    pub total_arrests: u64,
    /// Arrests of citizens of countries in the Americas
    pub americas_arrests: u64,
    /// Ranked countries; the final "Other" row absorbs the remainder
    pub top_countries: Vec<ArrestRecord>,
}

impl FiscalYearBucket {
    /// Sum of the listed country rows
    pub fn listed_arrests(&self) -> u64 {
        self.top_countries.iter().map(|r| r.arrests).sum()
    }
}

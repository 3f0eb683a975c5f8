//! Derivation of the origin dataset from ACS table B05006
//! (place of birth of the foreign-born population)

use crate::data::{OriginRecord, OriginSummary};
use crate::error::{Error, Result};
use std::collections::HashMap;

pub const TOTAL: &str = "B05006_001E";
pub const EUROPE: &str = "B05006_002E";
pub const ASIA: &str = "B05006_047E";
pub const WESTERN_ASIA: &str = "B05006_079E";
pub const AFRICA: &str = "B05006_095E";
pub const NORTHERN_AFRICA: &str = "B05006_110E";
pub const OCEANIA: &str = "B05006_130E";
pub const AMERICAS: &str = "B05006_138E";
pub const CARIBBEAN: &str = "B05006_140E";
pub const CENTRAL_AMERICA: &str = "B05006_154E";
pub const MEXICO: &str = "B05006_160E";
pub const SOUTH_AMERICA: &str = "B05006_164E";
pub const NORTHERN_AMERICA: &str = "B05006_176E";
pub const CANADA: &str = "B05006_177E";

/// Variables requested from the Census API
pub const VARIABLES: [&str; 14] = [
    TOTAL,
    EUROPE,
    ASIA,
    WESTERN_ASIA,
    AFRICA,
    NORTHERN_AFRICA,
    OCEANIA,
    AMERICAS,
    CARIBBEAN,
    CENTRAL_AMERICA,
    MEXICO,
    SOUTH_AMERICA,
    NORTHERN_AMERICA,
    CANADA,
];

pub const API_BASE: &str = "https://api.census.gov/data/2024/acs/acs1";
pub const SOURCE: &str = "ACS 2024 1-Year Estimates, Table B05006";
pub const SOURCE_URL: &str = "https://data.census.gov/table/ACSDT1Y2024.B05006";

/// Query string selecting every variable for the whole country
pub fn query_params() -> Vec<(&'static str, String)> {
    vec![("get", VARIABLES.join(",")), ("for", "us:1".to_string())]
}

/// Turn the API's `[header, values]` rows into a variable map.
///
/// Columns that are not in [`VARIABLES`] (such as the trailing `us`
/// geography column) are skipped.
pub fn parse_api_response(rows: &[Vec<String>]) -> Result<HashMap<String, u64>> {
    let [header, values, ..] = rows else {
        return Err(Error::Parse(format!(
            "Expected a header row and a value row, got {} rows",
            rows.len()
        )));
    };

    let mut result = HashMap::new();
    for (name, value) in header.iter().zip(values) {
        if !VARIABLES.contains(&name.as_str()) {
            continue;
        }
        let parsed = value
            .trim()
            .parse::<u64>()
            .map_err(|e| Error::Parse(format!("{name}={value}: {e}")))?;
        result.insert(name.clone(), parsed);
    }

    if let Some(missing) = VARIABLES.iter().find(|v| !result.contains_key(**v)) {
        return Err(Error::Parse(format!("Missing variable {missing}")));
    }

    Ok(result)
}

fn get(raw: &HashMap<String, u64>, name: &str) -> Result<u64> {
    raw.get(name)
        .copied()
        .ok_or_else(|| Error::Census(format!("Missing variable {name}")))
}

fn difference(minuend: u64, subtrahend: u64, what: &str) -> Result<u64> {
    minuend.checked_sub(subtrahend).ok_or_else(|| {
        Error::Census(format!("{what} is negative ({minuend} - {subtrahend})"))
    })
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Derive the nine display regions and their shares.
///
/// Derived categories: Central America without Mexico, Sub-Saharan Africa
/// (Africa minus Northern Africa), Middle East / North Africa (Western Asia
/// plus Northern Africa) and Asia without Western Asia.
pub fn compute_regions(raw: &HashMap<String, u64>) -> Result<OriginSummary> {
    let total = get(raw, TOTAL)?;
    if total == 0 {
        return Err(Error::DivisionByZero);
    }

    let mexico = get(raw, MEXICO)?;
    let western_asia = get(raw, WESTERN_ASIA)?;
    let n_africa = get(raw, NORTHERN_AFRICA)?;

    let central_america_ex_mexico = difference(
        get(raw, CENTRAL_AMERICA)?,
        mexico,
        "Central America (ex Mexico)",
    )?;
    let sub_saharan_africa = difference(get(raw, AFRICA)?, n_africa, "Sub-Saharan Africa")?;
    let asia_ex_western_asia = difference(get(raw, ASIA)?, western_asia, "Asia (ex Western Asia)")?;
    let mena = western_asia + n_africa;

    let share = |count: u64| round1(count as f64 / total as f64 * 100.0);
    let region = |name: &str, count: u64, americas: bool| OriginRecord {
        region: name.to_string(),
        count,
        share: share(count),
        americas,
    };

    let regions = vec![
        region("Mexico", mexico, true),
        region("Caribbean", get(raw, CARIBBEAN)?, true),
        region("Central America (ex Mexico)", central_america_ex_mexico, true),
        region("South America", get(raw, SOUTH_AMERICA)?, true),
        region("Canada", get(raw, CANADA)?, true),
        region("Asia (ex Western Asia)", asia_ex_western_asia, false),
        region("Europe", get(raw, EUROPE)?, false),
        region("Sub-Saharan Africa", sub_saharan_africa, false),
        region("Middle East / N. Africa", mena, false),
    ];

    let americas_total_share = round1(regions.iter().filter(|r| r.americas).map(|r| r.share).sum());

    Ok(OriginSummary {
        source: SOURCE.to_string(),
        source_url: SOURCE_URL.to_string(),
        total_foreign_born: total,
        regions,
        americas_total_share,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw_data() -> HashMap<String, u64> {
        [
            (TOTAL, 50_234_841),
            (EUROPE, 4_876_543),
            (ASIA, 14_234_567),
            (WESTERN_ASIA, 1_234_567),
            (AFRICA, 2_987_654),
            (NORTHERN_AFRICA, 654_321),
            (OCEANIA, 321_456),
            (AMERICAS, 26_639_876),
            (CARIBBEAN, 5_280_123),
            (CENTRAL_AMERICA, 15_723_456),
            (MEXICO, 11_143_711),
            (SOUTH_AMERICA, 4_812_345),
            (NORTHERN_AMERICA, 780_241),
            (CANADA, 700_000),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    fn find<'a>(summary: &'a OriginSummary, name: &str) -> &'a OriginRecord {
        summary
            .regions
            .iter()
            .find(|r| r.region == name)
            .unwrap()
    }

    #[test]
    fn test_query_params() {
        let params = query_params();
        assert_eq!(params[0].0, "get");
        assert!(params[0].1.starts_with("B05006_001E,"));
        assert_eq!(params[0].1.split(',').count(), 14);
        assert_eq!(params[1], ("for", "us:1".to_string()));
        assert!(API_BASE.contains("2024/acs/acs1"));
    }

    #[test]
    fn test_parse_api_response() {
        let mut header: Vec<String> = VARIABLES.iter().map(|v| v.to_string()).collect();
        header.push("us".to_string());
        let mut values: Vec<String> = VARIABLES
            .iter()
            .map(|v| raw_data()[*v].to_string())
            .collect();
        values.push("1".to_string());

        let parsed = parse_api_response(&[header, values]).unwrap();
        assert_eq!(parsed.len(), 14);
        assert_eq!(parsed[TOTAL], 50_234_841);
        assert_eq!(parsed[MEXICO], 11_143_711);
    }

    #[test]
    fn test_parse_api_response_errors() {
        assert!(parse_api_response(&[]).is_err());

        let header = vec![TOTAL.to_string()];
        let values = vec!["not-a-number".to_string()];
        assert!(matches!(
            parse_api_response(&[header.clone(), values]),
            Err(Error::Parse(_))
        ));

        let err = parse_api_response(&[header, vec!["1".to_string()]]).unwrap_err();
        assert!(err.to_string().contains("Missing variable"));
    }

    #[test]
    fn test_compute_regions() {
        let summary = compute_regions(&raw_data()).unwrap();
        assert_eq!(summary.total_foreign_born, 50_234_841);
        assert_eq!(summary.regions.len(), 9);
        assert!(summary.source.contains("ACS 2024"));
        assert!(summary.source_url.contains("census.gov"));

        let mexico = find(&summary, "Mexico");
        assert_eq!(mexico.count, 11_143_711);
        assert_eq!(mexico.share, 22.2);
        assert!(mexico.americas);

        assert_eq!(find(&summary, "Central America (ex Mexico)").count, 4_579_745);
        assert_eq!(find(&summary, "Sub-Saharan Africa").count, 2_987_654 - 654_321);
        assert_eq!(find(&summary, "Middle East / N. Africa").count, 1_234_567 + 654_321);
        assert_eq!(find(&summary, "Asia (ex Western Asia)").count, 13_000_000);
        assert_eq!(find(&summary, "Canada").count, 700_000);
        assert!(!find(&summary, "Europe").americas);
    }

    #[test]
    fn test_americas_total_share_is_rounded_sum() {
        let summary = compute_regions(&raw_data()).unwrap();
        let sum: f64 = summary
            .regions
            .iter()
            .filter(|r| r.americas)
            .map(|r| r.share)
            .sum();
        assert_eq!(summary.americas_total_share, round1(sum));
    }

    #[test]
    fn test_negative_derived_region() {
        let mut raw = raw_data();
        raw.insert(CENTRAL_AMERICA.to_string(), 5_123_456);
        let err = compute_regions(&raw).unwrap_err();
        assert!(matches!(err, Error::Census(ref msg) if msg.contains("Central America")));
    }

    #[test]
    fn test_zero_total() {
        let mut raw = raw_data();
        raw.insert(TOTAL.to_string(), 0);
        assert!(matches!(compute_regions(&raw), Err(Error::DivisionByZero)));
    }
}

//! Validation of selection arguments and output paths

use crate::error::{Error, Result};
use americas_core::{DataSource, DisplayUnit, FiscalYear, Registry, Selection, Transition};
use std::path::Path;

/// Build a selection from command-line choices, replaying them as the same
/// transitions the dashboard toggles would issue
pub fn build_selection(
    registry: &Registry,
    source: DataSource,
    unit: DisplayUnit,
    fiscal_year: Option<&str>,
) -> Result<Selection> {
    let mut selection = Selection::new(registry);

    if let Some(label) = fiscal_year {
        if source != DataSource::Ero {
            return Err(Error::Validation(
                "--fiscal-year only applies to --source ero".to_string(),
            ));
        }

        let fy: FiscalYear = label.parse()?;
        if !registry.contains_fiscal_year(fy) {
            let available: Vec<String> = registry.fiscal_years().map(|y| y.to_string()).collect();
            return Err(Error::Validation(format!(
                "Unknown fiscal year {fy}; available: {}",
                available.join(", ")
            )));
        }

        selection.apply(registry, Transition::DataSource(DataSource::Ero))?;
        selection.apply(registry, Transition::FiscalYear(fy))?;
    }

    selection.apply(registry, Transition::DataSource(source))?;
    selection.apply(registry, Transition::DisplayUnit(unit))?;
    Ok(selection)
}

/// Check that an output path names a file with the expected extension
pub fn validate_output_file(path: &Path, extension: &str) -> Result<()> {
    if path.file_name().is_none() || path.is_dir() {
        return Err(Error::Validation(format!(
            "Output path '{}' must name a file",
            path.display()
        )));
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(extension) => Ok(()),
        _ => Err(Error::Validation(format!(
            "Output path '{}' must end in .{}",
            path.display(),
            extension
        ))),
    }
}

//! americas-immigration CLI - Summaries, chart exports and census refresh for
//! the Americas immigration dashboard

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::PathBuf;
use tracing::{debug, info, warn};

mod census;
mod error;
mod html;
mod render;
mod validation;

use americas_core::view;
use americas_core::{
    ChartData, ChartOptions, ChartRenderer, DataSource, DisplayUnit, OriginSummary, Registry,
};
use census::CensusClient;
use html::PageConfig;
use render::{ChartJsRenderer, TextRenderer};

/// americas-immigration: immigration origins and ICE arrests by country
#[derive(Parser, Debug)]
#[command(name = "americas-immigration")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Origin dataset written by `fetch-census` (defaults to the built-in one)
    #[arg(long, global = true, env = "AMERICAS_ORIGINS_FILE")]
    origins_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the dashboard for one selection as text
    Summary(SelectionArgs),
    /// Write chart data and options for one selection as JSON
    Export(ExportArgs),
    /// Render a static Chart.js page for one selection
    Html(HtmlArgs),
    /// Download ACS B05006 and write the origin dataset
    FetchCensus(FetchCensusArgs),
}

#[derive(Parser, Debug, Clone)]
struct SelectionArgs {
    #[arg(short, long, value_enum, default_value_t = SourceArg::Berkeley)]
    source: SourceArg,

    #[arg(short, long, value_enum, default_value_t = UnitArg::Count)]
    unit: UnitArg,

    /// Fiscal year label such as FY2024 (ERO only)
    #[arg(long)]
    fiscal_year: Option<String>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    #[arg(short, long, value_name = "FILE", default_value = "chart.json")]
    output: PathBuf,
}

#[derive(Parser, Debug)]
struct HtmlArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    #[arg(short, long, value_name = "FILE", default_value = "dist/index.html")]
    output: PathBuf,

    #[arg(long, default_value = "Immigration from the Americas")]
    title: String,
}

#[derive(Parser, Debug)]
struct FetchCensusArgs {
    #[arg(short, long, value_name = "FILE", default_value = "public/data.json")]
    output: PathBuf,

    #[arg(long, env = "CENSUS_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "CENSUS_API_KEY")]
    api_key: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum SourceArg {
    Berkeley,
    Ero,
}

impl From<SourceArg> for DataSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Berkeley => DataSource::Berkeley,
            SourceArg::Ero => DataSource::Ero,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum UnitArg {
    Count,
    Percent,
}

impl From<UnitArg> for DisplayUnit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Count => DisplayUnit::Count,
            UnitArg::Percent => DisplayUnit::Percent,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let origins_file = cli.origins_file.as_deref();
    match cli.command {
        Commands::Summary(args) => summary_command(&load_registry(origins_file)?, args),
        Commands::Export(args) => export_command(&load_registry(origins_file)?, args),
        Commands::Html(args) => html_command(&load_registry(origins_file)?, args),
        Commands::FetchCensus(args) => fetch_census_command(args),
    }
}

fn load_registry(origins_file: Option<&std::path::Path>) -> Result<Registry> {
    let registry = match origins_file {
        Some(path) => {
            info!("Loading origin dataset from {:?}", path);
            let origins = OriginSummary::load_from_file(path)
                .with_context(|| format!("Failed to load origin dataset: {:?}", path))?;
            Registry::builtin().with_origins(origins)
        }
        None => Registry::builtin(),
    };

    let problems = registry.validate();
    if !problems.is_empty() {
        anyhow::bail!("Dataset invariants violated: {}", problems.join("; "));
    }
    debug!(
        "Registry: {} Berkeley rows, {} fiscal years",
        registry.berkeley().len(),
        registry.fiscal_years().count()
    );

    Ok(registry)
}

fn selection_for(registry: &Registry, args: &SelectionArgs) -> Result<americas_core::Selection> {
    let selection = validation::build_selection(
        registry,
        args.source.into(),
        args.unit.into(),
        args.fiscal_year.as_deref(),
    )
    .with_context(|| "Invalid selection")?;
    debug!("Selection: {:?}", selection);
    Ok(selection)
}

fn summary_command(registry: &Registry, args: SelectionArgs) -> Result<()> {
    let selection = selection_for(registry, &args)?;
    let dataset = selection.active_dataset(registry)?;
    let renderer = TextRenderer::default();

    let stats = view::stat_strip(registry)?;
    for stat in &stats {
        println!("{:>8}  {}", stat.value, stat.label);
    }
    println!();

    let origins = registry.origins();
    println!(
        "{}",
        renderer.render(
            &ChartData::from_origins(origins),
            &ChartOptions::proportion(origins, "Foreign-born population by region of birth"),
        )
    );
    println!("{}", view::origin_citation(registry).text);
    println!();

    let title = match dataset.fiscal_year {
        Some(fy) => format!("ICE arrests by country, {fy} ({})", dataset.unit),
        None => format!(
            "ICE arrests by country, {} ({})",
            registry.berkeley_range().label(),
            dataset.unit
        ),
    };
    println!(
        "{}",
        renderer.render(
            &ChartData::from_dataset(&dataset),
            &ChartOptions::bar(&dataset, &title),
        )
    );
    println!("{}", view::callout_text(&selection.americas_callout(registry)?));
    println!("{}", view::arrest_citation(registry, &selection).text);
    println!();

    for bar in view::comparison_bars(registry, &selection)? {
        println!("{:>6}  {}", bar.display, bar.label);
    }

    Ok(())
}

fn export_command(registry: &Registry, args: ExportArgs) -> Result<()> {
    validation::validate_output_file(&args.output, "json")?;
    let selection = selection_for(registry, &args.selection)?;
    let dataset = selection.active_dataset(registry)?;

    let data = ChartData::from_dataset(&dataset);
    let options = ChartOptions::bar(&dataset, "ICE arrests by country");
    let export = json!({
        "selection": selection,
        "data": data,
        "options": options,
        "chartjs": ChartJsRenderer.render(&data, &options),
        "callout": selection.americas_callout(registry)?,
        "citation": view::arrest_citation(registry, &selection),
    });

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    std::fs::write(&args.output, serde_json::to_string_pretty(&export)?)
        .with_context(|| format!("Failed to write chart export: {:?}", args.output))?;

    info!("Wrote {} rows to {:?}", data.len(), args.output);
    Ok(())
}

fn html_command(registry: &Registry, args: HtmlArgs) -> Result<()> {
    validation::validate_output_file(&args.output, "html")?;
    let selection = selection_for(registry, &args.selection)?;

    let config = PageConfig { title: args.title };
    let page = html::generate_page(registry, &selection, &config)?;
    html::write_page(&page, &args.output)?;

    info!("Generated: {}", args.output.display());
    Ok(())
}

fn fetch_census_command(args: FetchCensusArgs) -> Result<()> {
    validation::validate_output_file(&args.output, "json")?;

    info!("Fetching ACS 2024 B05006 data from Census API");
    let client = CensusClient::new(args.api_url, args.api_key)?;
    let raw = client.fetch().with_context(|| "Failed to fetch census data")?;
    if let Some(total) = raw.get(americas_core::census::TOTAL) {
        info!("Total foreign-born: {}", americas_core::format_grouped(*total));
    }

    let summary = americas_core::census::compute_regions(&raw)
        .with_context(|| "Failed to derive regions")?;
    info!(
        "{} regions computed, Americas total share {}%",
        summary.regions.len(),
        summary.americas_total_share
    );

    let share_sum: f64 = summary.regions.iter().map(|r| r.share).sum();
    if (share_sum - 100.0).abs() > 1.0 {
        warn!("Region shares sum to {:.1}%", share_sum);
    }

    summary
        .save_to_file(&args.output)
        .with_context(|| "Failed to save origin dataset")?;
    info!("Wrote {}", args.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use americas_core::FiscalYear;
    use tempfile::TempDir;

    #[test]
    fn test_parse_summary_args() {
        let cli = Cli::try_parse_from([
            "americas-immigration",
            "summary",
            "--source",
            "ero",
            "--unit",
            "percent",
            "--fiscal-year",
            "FY2024",
        ])
        .unwrap();

        let Commands::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.source, SourceArg::Ero);
        assert_eq!(args.unit, UnitArg::Percent);
        assert_eq!(args.fiscal_year.as_deref(), Some("FY2024"));
    }

    #[test]
    fn test_selection_for_args() {
        let registry = Registry::builtin();
        let args = SelectionArgs {
            source: SourceArg::Ero,
            unit: UnitArg::Count,
            fiscal_year: Some("FY2021".to_string()),
        };
        let selection = selection_for(&registry, &args).unwrap();
        assert_eq!(selection.fiscal_year(), Some(FiscalYear::new(2021)));
    }

    #[test]
    fn test_export_command_writes_json() {
        let registry = Registry::builtin();
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out").join("chart.json");

        export_command(
            &registry,
            ExportArgs {
                selection: SelectionArgs {
                    source: SourceArg::Ero,
                    unit: UnitArg::Percent,
                    fiscal_year: Some("FY2024".to_string()),
                },
                output: output.clone(),
            },
        )
        .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["selection"]["data_source"], "ero");
        assert_eq!(written["data"]["labels"].as_array().unwrap().len(), 9);
        assert_eq!(written["callout"]["share"], "99.0");
        assert_eq!(written["options"]["unit"], "percent");
    }

    #[test]
    fn test_run_dispatches_each_command() {
        let dir = TempDir::new().unwrap();
        let chart = dir.path().join("chart.json");
        let page = dir.path().join("site").join("index.html");

        let cli = Cli::try_parse_from([
            "americas-immigration",
            "export",
            "--output",
            chart.to_str().unwrap(),
        ])
        .unwrap();
        run(cli).unwrap();
        assert!(chart.exists());

        let cli = Cli::try_parse_from([
            "americas-immigration",
            "html",
            "--source",
            "ero",
            "--output",
            page.to_str().unwrap(),
        ])
        .unwrap();
        run(cli).unwrap();
        assert!(std::fs::read_to_string(&page).unwrap().contains("FY2024"));

        let cli = Cli::try_parse_from([
            "americas-immigration",
            "--origins-file",
            dir.path().join("missing.json").to_str().unwrap(),
            "summary",
        ])
        .unwrap();
        assert!(run(cli).is_err());
    }

    #[test]
    fn test_load_registry_with_origins_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("origins.json");
        Registry::builtin().origins().save_to_file(&path).unwrap();

        let registry = load_registry(Some(path.as_path())).unwrap();
        assert_eq!(registry.total_foreign_born(), 50_234_841);
        assert!(load_registry(Some(dir.path().join("missing.json").as_path())).is_err());
    }
}

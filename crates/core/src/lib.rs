//! americas-core - Datasets and selection logic for the Americas immigration
//! dashboard
//!
//! This crate contains WASM-compatible code shared between the CLI and the
//! dashboard.
//!
//! # Features
//!
//! - Built-in origin shares, Berkeley FOIA arrests and ERO fiscal-year data
//! - Selection state (source, unit, fiscal year) and the chart rows it derives
//! - Compact number and percentage formatting
//! - Chart boundary types and view-models for every dashboard component
//! - ACS B05006 derivation for refreshing the origin dataset

pub mod census;
pub mod chart;
pub mod data;
pub mod embed;
pub mod error;
pub mod format;
pub mod registry;
pub mod reveal;
pub mod selection;
pub mod view;

pub use chart::{ChartData, ChartKind, ChartOptions, ChartRenderer, Orientation};
pub use data::{ArrestRecord, FiscalYear, FiscalYearBucket, OriginRecord, OriginSummary};
pub use embed::DisplayMode;
pub use error::{Error, Result};
pub use format::{americas_share_percent, format_compact, format_grouped, percent_of_total};
pub use registry::Registry;
pub use reveal::{RevealLatch, RevealState};
pub use selection::{ActiveDataset, Callout, DataRow, DataSource, DisplayUnit, Selection, Transition};

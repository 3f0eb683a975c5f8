//! Dioxus dashboard: immigration from the Americas and ICE arrests
//!
//! A pure Rust frontend that compiles to WebAssembly. All data is built in;
//! the only state is the [`Selection`] signal and the theme. Every control
//! issues one [`Transition`], and every chart is recomputed from the
//! selection on the next render.

use americas_core::view::{self, Citation, Toggle};
use americas_core::{
    ChartData, ChartKind, ChartOptions, ChartRenderer, DisplayMode, FiscalYear, Registry,
    RevealLatch, Selection, Transition,
};
use dioxus::prelude::*;

mod styles;

use styles::*;

/// Global theme context - true = dark mode
#[derive(Clone, Copy)]
struct ThemeCtx(Signal<bool>);

/// The one piece of interactive state
#[derive(Clone, Copy)]
struct SelectionCtx(Signal<Selection>);

const CHART_WIDTH: f64 = 640.0;
const LABEL_WIDTH: f64 = 150.0;
const VALUE_WIDTH: f64 = 64.0;
const ROW_HEIGHT: f64 = 30.0;
const BAR_HEIGHT: f64 = 20.0;
const PROPORTION_HEIGHT: f64 = 44.0;

fn main() {
    tracing_wasm::set_as_global_default();

    let problems = Registry::global().validate();
    tracing::info!("Registry loaded ({} problems)", problems.len());

    launch(App);
}

/// Framed pages and `?embed` URLs render without the page chrome
fn detect_display_mode() -> DisplayMode {
    let Some(window) = web_sys::window() else {
        return DisplayMode::Standalone;
    };

    let framed = match window.top() {
        Ok(Some(top)) => !js_sys::Object::is(&top, &window),
        Ok(None) => false,
        // Cross-origin parents refuse access
        Err(_) => true,
    };
    let query = window.location().search().unwrap_or_default();

    let mode = DisplayMode::detect(framed, &query);
    tracing::debug!("Display mode: {:?}", mode);
    mode
}

/// Apply a transition to the selection signal. Rejected transitions leave the
/// selection untouched.
fn dispatch(mut selection: Signal<Selection>, transition: Transition) {
    let mut next = *selection.read();
    match next.apply(Registry::global(), transition) {
        Ok(()) => selection.set(next),
        Err(e) => tracing::warn!("Ignored {:?}: {}", transition, e),
    }
}

#[component]
fn App() -> Element {
    let dark_mode = use_signal(|| false);
    use_context_provider(|| ThemeCtx(dark_mode));

    let selection = use_signal(|| Selection::new(Registry::global()));
    use_context_provider(|| SelectionCtx(selection));

    let mode = use_hook(detect_display_mode);

    let dark = *dark_mode.read();
    let embedded = mode.is_embedded();
    let registry = Registry::global();
    let current = *selection.read();

    rsx! {
        div { style: "{app_style(dark)}",
            if !embedded {
                Header {}
            }

            main { style: "{container_style(embedded)}",
                StatStrip {}

                section { style: "{section_style(dark, embedded)}",
                    h2 { style: "{section_title_style(dark)}", "Where immigrants in the U.S. were born" }
                    ProportionChart {}
                    SourceCitation { citation: view::origin_citation(registry) }
                }

                section { style: "{section_style(dark, embedded)}",
                    h2 { style: "{section_title_style(dark)}", "Who ICE arrests" }
                    div {
                        ToggleGroup { toggles: view::source_toggles(&current) }
                        ToggleGroup { toggles: view::unit_toggles(&current) }
                        FiscalYearSelect {}
                    }
                    BarChart {}
                    SourceCitation { citation: view::arrest_citation(registry, &current) }
                }

                section { style: "{section_style(dark, embedded)}",
                    h2 { style: "{section_title_style(dark)}", "Born in the Americas" }
                    ComparisonBars {}
                }
            }
        }
    }
}

#[component]
fn Header() -> Element {
    let ThemeCtx(mut dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    rsx! {
        header { style: "{header_style(dark)}",
            h1 { style: "{title_style(dark)}", "Immigration from the Americas" }
            button {
                style: "{toggle_btn_style(dark)}",
                onclick: move |_| {
                    let current = *dark_mode.read();
                    dark_mode.set(!current);
                },
                if dark { "☀ light" } else { "☾ dark" }
            }
        }
    }
}

#[component]
fn ErrorState(message: String) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    rsx! {
        div { style: "{muted_style(dark)}",
            strong { "Error: " }
            "{message}"
        }
    }
}

#[component]
fn StatStrip() -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    let stats = match view::stat_strip(Registry::global()) {
        Ok(stats) => stats,
        Err(e) => return rsx! { ErrorState { message: e.to_string() } },
    };

    rsx! {
        div { style: "{stat_strip_style(dark)}",
            for stat in stats {
                div { key: "{stat.label}", style: "{stat_card_style(dark)}",
                    div { style: "{stat_value_style(dark)}", "{stat.value}" }
                    div { style: "{stat_label_style(dark)}", "{stat.label}" }
                }
            }
        }
    }
}

/// Buttons for one group of mutually exclusive choices
#[component]
fn ToggleGroup(toggles: Vec<Toggle>) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let SelectionCtx(selection) = use_context::<SelectionCtx>();
    let dark = *dark_mode.read();

    rsx! {
        div { style: "{toggle_group_style(dark)}", role: "group",
            for toggle in toggles {
                button {
                    key: "{toggle.label}",
                    style: "{pill_style(dark, toggle.active, toggle.enabled)}",
                    disabled: !toggle.enabled,
                    "aria-pressed": "{toggle.active}",
                    onclick: move |_| dispatch(selection, toggle.transition),
                    "{toggle.label}"
                }
            }
        }
    }
}

/// Fiscal-year dropdown, inert while the Berkeley source is shown
#[component]
fn FiscalYearSelect() -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let SelectionCtx(selection) = use_context::<SelectionCtx>();
    let dark = *dark_mode.read();

    let current = *selection.read();
    let enabled = current.fiscal_year_active();
    let toggles = view::fiscal_year_toggles(Registry::global(), &current);

    rsx! {
        select {
            style: "{select_style(dark, enabled)}",
            disabled: !enabled,
            "aria-label": "Fiscal year",
            onchange: move |evt: FormEvent| {
                match evt.value().parse::<FiscalYear>() {
                    Ok(fy) => dispatch(selection, Transition::FiscalYear(fy)),
                    Err(e) => tracing::warn!("Bad fiscal year option: {}", e),
                }
            },
            for toggle in toggles {
                option {
                    key: "{toggle.label}",
                    value: "{toggle.label}",
                    selected: toggle.active,
                    "{toggle.label}"
                }
            }
        }
    }
}

/// Regions of birth as one stacked bar
#[component]
fn ProportionChart() -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();
    let hovered = use_signal(|| None::<usize>);

    let origins = Registry::global().origins();
    let segments = view::proportion_segments(Registry::global());
    let renderer = SvgRenderer { dark, hovered };
    let chart = renderer.render(
        &ChartData::from_origins(origins),
        &ChartOptions::proportion(origins, "Foreign-born population"),
    );
    let hover_tip = hovered
        .read()
        .and_then(|idx| segments.get(idx))
        .map(|segment| segment.tooltip.clone());

    rsx! {
        div { style: "{chart_card_style(dark)}",
            {chart}

            if let Some(tip) = hover_tip {
                div { style: "{hover_tooltip_style(dark)}", "{tip}" }
            }

            div { style: "{legend_style(dark)}",
                for segment in segments.iter() {
                    span { key: "{segment.label}",
                        span { style: "{swatch_style(&segment.color)}" }
                        "{segment.label} {segment.share:.1}%"
                    }
                }
            }
        }
    }
}

/// Arrests by country for the active source, unit and fiscal year
#[component]
fn BarChart() -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let SelectionCtx(selection) = use_context::<SelectionCtx>();
    let dark = *dark_mode.read();
    let hovered = use_signal(|| None::<usize>);

    let registry = Registry::global();
    let current = *selection.read();
    let (dataset, callout) = match current
        .active_dataset(registry)
        .and_then(|dataset| Ok((dataset, current.americas_callout(registry)?)))
    {
        Ok(pair) => pair,
        Err(e) => return rsx! { ErrorState { message: e.to_string() } },
    };

    let rows = view::bar_rows(&dataset);
    let renderer = SvgRenderer { dark, hovered };
    let chart = renderer.render(
        &ChartData::from_dataset(&dataset),
        &ChartOptions::bar(&dataset, "ICE arrests by country"),
    );
    let hover_tip = hovered
        .read()
        .and_then(|idx| rows.get(idx))
        .map(|row| row.tooltip.clone());

    rsx! {
        div { style: "{chart_card_style(dark)}",
            {chart}

            if let Some(tip) = hover_tip {
                div { style: "{hover_tooltip_style(dark)}", "{tip}" }
            }
        }
        p { style: "{callout_style(dark)}", "{view::callout_text(&callout)}" }
    }
}

/// Population share against arrest share; the fills grow the first time the
/// block scrolls into view
#[component]
fn ComparisonBars() -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let SelectionCtx(selection) = use_context::<SelectionCtx>();
    let dark = *dark_mode.read();
    let mut latch = use_signal(RevealLatch::new);

    let current = *selection.read();
    let bars = match view::comparison_bars(Registry::global(), &current) {
        Ok(bars) => bars,
        Err(e) => return rsx! { ErrorState { message: e.to_string() } },
    };
    let revealed = latch.read().is_revealed();

    rsx! {
        div {
            onvisible: move |evt| {
                let visible = evt.data().is_intersecting().unwrap_or(false);
                let mut next = *latch.read();
                if next.observe(visible) {
                    tracing::debug!("Comparison bars revealed");
                    latch.set(next);
                }
            },
            for bar in bars {
                div { key: "{bar.label}", style: "{compare_row_style(dark)}",
                    div { "{bar.label}: " strong { "{bar.display}" } }
                    div { style: "{compare_track_style(dark)}",
                        div { style: "{compare_fill_style(&bar.color, bar.percent, revealed)}" }
                    }
                }
            }
        }
    }
}

#[component]
fn SourceCitation(citation: Citation) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    rsx! {
        p { style: "{citation_style(dark)}",
            "{citation.text} "
            if let Some(url) = citation.url {
                a { href: "{url}", target: "_blank", rel: "noopener", style: "color: inherit;", "{url}" }
            }
        }
    }
}

// ============================================================================
// SVG rendering
// ============================================================================

/// Draws [`ChartData`] as inline SVG; hovering a bar or segment records its
/// index in `hovered`
struct SvgRenderer {
    dark: bool,
    hovered: Signal<Option<usize>>,
}

struct BarGeometry {
    label: String,
    value_label: String,
    color: String,
    y: f64,
    length: f64,
}

impl ChartRenderer for SvgRenderer {
    type Output = Element;

    fn render(&self, data: &ChartData, options: &ChartOptions) -> Element {
        match options.kind {
            ChartKind::Bar => self.bars(data, options),
            ChartKind::Proportion => self.proportion(data),
        }
    }
}

impl SvgRenderer {
    fn bars(&self, data: &ChartData, options: &ChartOptions) -> Element {
        let mut hovered = self.hovered;
        let grid_c = grid_color(self.dark);
        let axis_c = axis_color(self.dark);

        let extent = CHART_WIDTH - LABEL_WIDTH - VALUE_WIDTH;
        let height = ROW_HEIGHT * data.len().max(1) as f64;
        let bars: Vec<BarGeometry> = data
            .labels
            .iter()
            .zip(&data.values)
            .zip(&data.colors)
            .zip(data.scaled(extent))
            .enumerate()
            .map(|(idx, (((label, value), color), length))| BarGeometry {
                label: label.clone(),
                value_label: options.value_label(*value),
                color: color.clone(),
                y: idx as f64 * ROW_HEIGHT + (ROW_HEIGHT - BAR_HEIGHT) / 2.0,
                length,
            })
            .collect();

        rsx! {
            svg {
                style: "width: 100%; height: auto;",
                view_box: "0 0 {CHART_WIDTH} {height}",
                onmouseleave: move |_| hovered.set(None),

                for i in 0..5 {
                    line {
                        x1: "{LABEL_WIDTH + extent * (i as f64 / 4.0)}",
                        y1: "0",
                        x2: "{LABEL_WIDTH + extent * (i as f64 / 4.0)}",
                        y2: "{height}",
                        stroke: "{grid_c}",
                        "stroke-width": "1",
                    }
                }

                for (idx, bar) in bars.into_iter().enumerate() {
                    g { key: "{bar.label}",
                        text {
                            x: "{LABEL_WIDTH - 8.0}",
                            y: "{bar.y + BAR_HEIGHT * 0.7}",
                            fill: "{axis_c}",
                            "font-size": "12",
                            "text-anchor": "end",
                            "{bar.label}"
                        }
                        rect {
                            x: "{LABEL_WIDTH}",
                            y: "{bar.y}",
                            width: "{bar.length.max(1.0)}",
                            height: "{BAR_HEIGHT}",
                            rx: "2",
                            fill: "{bar.color}",
                            onmouseenter: move |_| hovered.set(Some(idx)),
                        }
                        text {
                            x: "{LABEL_WIDTH + bar.length + 6.0}",
                            y: "{bar.y + BAR_HEIGHT * 0.7}",
                            fill: "{axis_c}",
                            "font-size": "12",
                            "{bar.value_label}"
                        }
                    }
                }
            }
        }
    }

    fn proportion(&self, data: &ChartData) -> Element {
        let mut hovered = self.hovered;
        let segments: Vec<(f64, f64, String, f64)> = data
            .stacked(CHART_WIDTH)
            .into_iter()
            .zip(&data.colors)
            .zip(&data.values)
            .map(|(((offset, width), color), share)| (offset, width, color.clone(), *share))
            .collect();

        rsx! {
            svg {
                style: "width: 100%; height: auto;",
                view_box: "0 0 {CHART_WIDTH} {PROPORTION_HEIGHT}",
                onmouseleave: move |_| hovered.set(None),

                for (idx, (offset, width, color, share)) in segments.into_iter().enumerate() {
                    rect {
                        key: "{idx}",
                        x: "{offset}",
                        y: "0",
                        width: "{width}",
                        height: "{PROPORTION_HEIGHT}",
                        fill: "{color}",
                        stroke: "#ffffff",
                        "stroke-width": "1",
                        onmouseenter: move |_| hovered.set(Some(idx)),
                    }
                    if width > 48.0 {
                        text {
                            x: "{offset + width / 2.0}",
                            y: "{PROPORTION_HEIGHT / 2.0 + 4.0}",
                            fill: "#ffffff",
                            "font-size": "12",
                            "text-anchor": "middle",
                            style: "pointer-events: none;",
                            "{share:.1}%"
                        }
                    }
                }
            }
        }
    }
}

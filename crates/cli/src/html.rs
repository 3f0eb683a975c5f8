//! Static HTML page rendered with Chart.js

use crate::error::{Error, Result};
use crate::render::ChartJsRenderer;
use americas_core::view::{self, Citation, ComparisonBar, StatItem};
use americas_core::{ChartData, ChartOptions, ChartRenderer, Registry, Selection};
use chrono::Utc;
use minijinja::{context, Environment};
use std::path::Path;

/// HTML template for the static dashboard page
const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ title }}</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
    <style>
        :root {
            --bg: #fafaf9;
            --fg: #1c1917;
            --muted: #78716c;
            --border: #e7e5e4;
            --americas: #d97706;
            --other: #64748b;
        }
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--fg);
            line-height: 1.5;
        }
        .container { max-width: 960px; margin: 0 auto; padding: 2rem 1rem; }
        h1 { font-size: 1.75rem; margin-bottom: 1.5rem; }
        h2 { font-size: 1.1rem; margin: 2rem 0 0.75rem; }
        .stats { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; }
        .stat { border: 1px solid var(--border); border-radius: 8px; padding: 1rem; }
        .stat-value { font-size: 1.6rem; font-weight: 700; color: var(--americas); }
        .stat-label { font-size: 0.85rem; color: var(--muted); }
        .chart { position: relative; height: {{ bar_height }}px; }
        .chart.proportion { height: 120px; }
        .callout { margin-top: 0.75rem; font-weight: 600; }
        .compare-row { margin: 0.5rem 0; }
        .compare-track { background: var(--border); border-radius: 4px; height: 18px; }
        .compare-fill { height: 18px; border-radius: 4px; }
        .citation { font-size: 0.8rem; color: var(--muted); margin-top: 0.5rem; }
        .citation a { color: inherit; }
        .generated { font-size: 0.75rem; color: var(--muted); margin-top: 3rem; }
    </style>
</head>
<body>
    <div class="container">
        <h1>{{ title }}</h1>

        <div class="stats">
            {% for stat in stats %}
            <div class="stat">
                <div class="stat-value">{{ stat.value }}</div>
                <div class="stat-label">{{ stat.label }}</div>
            </div>
            {% endfor %}
        </div>

        <h2>Where immigrants were born</h2>
        <div class="chart proportion"><canvas id="proportion"></canvas></div>
        <p class="citation">{{ origin_citation.text }}{% if origin_citation.url %} <a href="{{ origin_citation.url }}">{{ origin_citation.url }}</a>{% endif %}</p>

        <h2>{{ bar_title }}</h2>
        <div class="chart"><canvas id="bars"></canvas></div>
        <p class="callout">{{ callout }}</p>
        <p class="citation">{{ arrest_citation.text }}{% if arrest_citation.url %} <a href="{{ arrest_citation.url }}">{{ arrest_citation.url }}</a>{% endif %}</p>

        <h2>Americas share</h2>
        {% for bar in comparison %}
        <div class="compare-row">
            <div>{{ bar.label }}: <strong>{{ bar.display }}</strong></div>
            <div class="compare-track"><div class="compare-fill" style="width: {{ bar.percent }}%; background: {{ bar.color }};"></div></div>
        </div>
        {% endfor %}

        <p class="generated">Generated {{ generated_at }}</p>
    </div>

    <script>
        function withTooltips(config) {
            config.options = config.options || {};
            config.options.maintainAspectRatio = false;
            config.options.plugins = config.options.plugins || {};
            config.options.plugins.tooltip = {
                callbacks: {
                    label: function(context) {
                        return context.dataset.tooltips[context.dataIndex];
                    }
                }
            };
            return config;
        }
        new Chart(document.getElementById('proportion'), withTooltips({{ proportion_config|safe }}));
        new Chart(document.getElementById('bars'), withTooltips({{ bar_config|safe }}));
    </script>
</body>
</html>
"#;

/// Page configuration
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub title: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Immigration from the Americas".to_string(),
        }
    }
}

/// Render the page for one selection
pub fn generate_page(registry: &Registry, selection: &Selection, config: &PageConfig) -> Result<String> {
    let mut env = Environment::new();
    // The .html name turns on auto-escaping
    env.add_template("page.html", PAGE_TEMPLATE)?;
    let template = env.get_template("page.html")?;

    let dataset = selection.active_dataset(registry)?;
    let bar_title = match dataset.fiscal_year {
        Some(fy) => format!("ICE arrests by country, {fy} ({})", dataset.unit),
        None => format!(
            "ICE arrests by country, {} ({})",
            registry.berkeley_range().label(),
            dataset.unit
        ),
    };

    let bar_config = ChartJsRenderer.render(
        &ChartData::from_dataset(&dataset),
        &ChartOptions::bar(&dataset, &bar_title),
    );
    let proportion_config = ChartJsRenderer.render(
        &ChartData::from_origins(registry.origins()),
        &ChartOptions::proportion(registry.origins(), "Foreign-born population"),
    );

    let stats: Vec<StatItem> = view::stat_strip(registry)?;
    let comparison: Vec<ComparisonBar> = view::comparison_bars(registry, selection)?;
    let arrest_citation: Citation = view::arrest_citation(registry, selection);
    let origin_citation: Citation = view::origin_citation(registry);
    let callout = view::callout_text(&selection.americas_callout(registry)?);

    let html = template.render(context! {
        title => &config.title,
        stats => stats,
        bar_title => bar_title,
        bar_height => 60 + 32 * dataset.rows.len(),
        callout => callout,
        comparison => comparison,
        arrest_citation => arrest_citation,
        origin_citation => origin_citation,
        bar_config => script_json(&bar_config)?,
        proportion_config => script_json(&proportion_config)?,
        generated_at => Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    })?;

    Ok(html)
}

/// JSON safe to inline in a `<script>` block
fn script_json(value: &serde_json::Value) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Write the page, creating parent directories
pub fn write_page(html: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::FileWrite {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    std::fs::write(path, html).map_err(|e| Error::FileWrite {
        path: path.display().to_string(),
        source: e,
    })
}

//! Binary to generate the index.html from Rust
//!
//! Run with: cargo run --bin generate_html
//!
//! Generates the HTML shell for the Dioxus WASM app. The headline figures go
//! into the meta description and a `<noscript>` fallback.

use americas_core::view;
use americas_core::Registry;
use std::fs;
use std::io;
use std::path::Path;

fn main() -> io::Result<()> {
    let html = generate_index_html(Registry::global())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let dist_path = Path::new("dist");
    fs::create_dir_all(dist_path)?;

    let index_path = dist_path.join("index.html");
    fs::write(&index_path, &html)?;

    println!("✅ Generated: {}", index_path.display());
    Ok(())
}

fn generate_index_html(registry: &Registry) -> americas_core::Result<String> {
    let summary = view::stat_strip(registry)?
        .iter()
        .map(|stat| format!("{} {}", stat.value, stat.label))
        .collect::<Vec<_>>()
        .join("; ");

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="description" content="{summary}">
    <title>Immigration from the Americas</title>
    <style>
{styles}
    </style>
</head>
<body>
    <div id="loading">loading...</div>
    <noscript>{summary}</noscript>
    <div id="main"></div>
    <script type="module">
        import init from './americas_dashboard.js';
        init().then(() => {{
            document.getElementById('loading').remove();
        }});
    </script>
</body>
</html>"#,
        summary = summary,
        styles = get_styles(),
    ))
}

fn get_styles() -> &'static str {
    r#"        * { margin: 0; padding: 0; box-sizing: border-box; }
        html, body { min-height: 100%; }
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; font-size: 15px; }
        #loading { padding: 2rem; text-align: center; font-family: inherit; }
        noscript { display: block; padding: 2rem; }
        #main { min-height: 100vh; }"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_carries_headline_figures() {
        let html = generate_index_html(&Registry::builtin()).unwrap();
        assert!(html.contains("americas_dashboard.js"));
        assert!(html.contains("53.5% born in the Americas"));
        assert!(html.contains("<div id=\"main\"></div>"));
    }
}

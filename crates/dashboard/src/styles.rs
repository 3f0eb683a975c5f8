//! Inline styles - no external CSS files
//!
//! Warm editorial palette with light/dark theme support. Embedded mode drops
//! the page chrome and tightens spacing.

use americas_core::selection::AMERICAS_COLOR;

// ============================================================================
// Layout
// ============================================================================

pub fn app_style(dark: bool) -> String {
    let (bg, fg) = if dark {
        ("#1c1917", "#e7e5e4")
    } else {
        ("#fafaf9", "#1c1917")
    };
    format!(
        "min-height: 100vh; \
         font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif; \
         font-size: 15px; \
         background: {bg}; \
         color: {fg}; \
         line-height: 1.5; \
         margin: 0; \
         padding: 0;"
    )
}

pub fn header_style(dark: bool) -> String {
    let border = if dark { "#44403c" } else { "#e7e5e4" };
    format!(
        "display: flex; \
         justify-content: space-between; \
         align-items: center; \
         padding: 0.75rem 1rem; \
         border-bottom: 1px solid {border};"
    )
}

pub fn title_style(_dark: bool) -> &'static str {
    "font-size: 1.4rem; \
     font-weight: 700; \
     margin: 0;"
}

/// Theme toggle in the header
pub fn toggle_btn_style(dark: bool) -> String {
    let (bg, fg, border) = if dark {
        ("#292524", "#e7e5e4", "#44403c")
    } else {
        ("#f5f5f4", "#1c1917", "#d6d3d1")
    };
    format!(
        "background: {bg}; \
         color: {fg}; \
         border: 1px solid {border}; \
         padding: 0.35rem 0.75rem; \
         font-family: inherit; \
         font-size: 0.8rem; \
         border-radius: 6px; \
         cursor: pointer;"
    )
}

pub fn container_style(embedded: bool) -> &'static str {
    if embedded {
        "max-width: 100%; margin: 0; padding: 0.5rem;"
    } else {
        "max-width: 960px; margin: 0 auto; padding: 1.5rem 1rem 3rem;"
    }
}

pub fn section_style(dark: bool, embedded: bool) -> String {
    let border = if dark { "#44403c" } else { "#e7e5e4" };
    let margin = if embedded { "1rem" } else { "2rem" };
    format!(
        "margin-top: {margin}; \
         padding-top: 1rem; \
         border-top: 1px solid {border};"
    )
}

pub fn section_title_style(_dark: bool) -> &'static str {
    "font-size: 1.05rem; \
     font-weight: 600; \
     margin: 0 0 0.75rem;"
}

// ============================================================================
// Stat strip
// ============================================================================

pub fn stat_strip_style(_dark: bool) -> &'static str {
    "display: grid; \
     grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); \
     gap: 0.75rem;"
}

pub fn stat_card_style(dark: bool) -> String {
    let (bg, border) = if dark {
        ("#292524", "#44403c")
    } else {
        ("#ffffff", "#e7e5e4")
    };
    format!(
        "background: {bg}; \
         border: 1px solid {border}; \
         border-radius: 8px; \
         padding: 0.9rem 1rem;"
    )
}

pub fn stat_value_style(_dark: bool) -> String {
    format!(
        "font-size: 1.7rem; \
         font-weight: 700; \
         color: {AMERICAS_COLOR};"
    )
}

pub fn stat_label_style(dark: bool) -> String {
    format!("font-size: 0.8rem; {}", muted_style(dark))
}

// ============================================================================
// Controls
// ============================================================================

pub fn toggle_group_style(_dark: bool) -> &'static str {
    "display: inline-flex; \
     gap: 0.25rem; \
     margin: 0 0.75rem 0.75rem 0;"
}

/// A toggle button; active is filled, disabled is dimmed
pub fn pill_style(dark: bool, active: bool, enabled: bool) -> String {
    let (bg, fg, border) = match (active, dark) {
        (true, _) => (AMERICAS_COLOR, "#ffffff", AMERICAS_COLOR),
        (false, true) => ("#292524", "#e7e5e4", "#44403c"),
        (false, false) => ("#ffffff", "#1c1917", "#d6d3d1"),
    };
    let (opacity, cursor) = if enabled {
        ("1", "pointer")
    } else {
        ("0.4", "not-allowed")
    };
    format!(
        "background: {bg}; \
         color: {fg}; \
         border: 1px solid {border}; \
         padding: 0.3rem 0.8rem; \
         font-family: inherit; \
         font-size: 0.8rem; \
         border-radius: 999px; \
         opacity: {opacity}; \
         cursor: {cursor};"
    )
}

pub fn select_style(dark: bool, enabled: bool) -> String {
    let (bg, fg, border) = if dark {
        ("#292524", "#e7e5e4", "#44403c")
    } else {
        ("#ffffff", "#1c1917", "#d6d3d1")
    };
    let opacity = if enabled { "1" } else { "0.4" };
    format!(
        "background: {bg}; \
         color: {fg}; \
         border: 1px solid {border}; \
         padding: 0.3rem 0.5rem; \
         font-family: inherit; \
         font-size: 0.8rem; \
         border-radius: 6px; \
         opacity: {opacity};"
    )
}

// ============================================================================
// Charts
// ============================================================================

pub fn chart_card_style(_dark: bool) -> &'static str {
    "position: relative; \
     padding: 0.25rem 0;"
}

pub fn legend_style(_dark: bool) -> &'static str {
    "display: flex; \
     flex-wrap: wrap; \
     gap: 0.35rem 1rem; \
     margin-top: 0.5rem; \
     font-size: 0.75rem;"
}

pub fn swatch_style(color: &str) -> String {
    format!(
        "display: inline-block; \
         width: 10px; \
         height: 10px; \
         border-radius: 2px; \
         margin-right: 0.3rem; \
         background: {color};"
    )
}

pub fn hover_tooltip_style(dark: bool) -> String {
    let (bg, border) = if dark {
        ("rgba(41, 37, 36, 0.95)", "#44403c")
    } else {
        ("rgba(255, 255, 255, 0.95)", "#d6d3d1")
    };
    format!(
        "position: absolute; \
         top: 0.25rem; \
         right: 0.25rem; \
         background: {bg}; \
         border: 1px solid {border}; \
         border-radius: 8px; \
         padding: 0.4rem 0.7rem; \
         font-size: 0.8rem; \
         z-index: 100; \
         box-shadow: 0 4px 12px rgba(0,0,0,0.2); \
         pointer-events: none;"
    )
}

pub fn callout_style(_dark: bool) -> &'static str {
    "margin-top: 0.75rem; \
     font-weight: 600;"
}

pub fn citation_style(dark: bool) -> String {
    format!("font-size: 0.75rem; margin-top: 0.5rem; {}", muted_style(dark))
}

// ============================================================================
// Comparison bars
// ============================================================================

pub fn compare_row_style(_dark: bool) -> &'static str {
    "margin: 0.6rem 0;"
}

pub fn compare_track_style(dark: bool) -> String {
    let bg = if dark { "#44403c" } else { "#e7e5e4" };
    format!(
        "background: {bg}; \
         border-radius: 4px; \
         height: 18px; \
         overflow: hidden;"
    )
}

/// Fill grows from zero once the latch has fired
pub fn compare_fill_style(color: &str, percent: f64, revealed: bool) -> String {
    let width = if revealed { percent.clamp(0.0, 100.0) } else { 0.0 };
    format!(
        "height: 18px; \
         width: {width:.1}%; \
         background: {color}; \
         transition: width 1.2s ease-out;"
    )
}

// ============================================================================
// Misc
// ============================================================================

pub fn muted_style(dark: bool) -> String {
    let fg = if dark { "#a8a29e" } else { "#78716c" };
    format!("color: {fg};")
}

/// SVG grid line color
pub fn grid_color(dark: bool) -> &'static str {
    if dark { "#44403c" } else { "#e7e5e4" }
}

/// SVG axis label color
pub fn axis_color(dark: bool) -> &'static str {
    if dark { "#a8a29e" } else { "#78716c" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_hidden_until_revealed() {
        assert!(compare_fill_style("#000", 92.6, false).contains("width: 0.0%"));
        assert!(compare_fill_style("#000", 92.6, true).contains("width: 92.6%"));
        assert!(compare_fill_style("#000", 140.0, true).contains("width: 100.0%"));
    }

    #[test]
    fn test_disabled_pill_is_dimmed() {
        assert!(pill_style(false, false, false).contains("not-allowed"));
        assert!(pill_style(true, true, true).contains(AMERICAS_COLOR));
    }
}

//! Embedded display mode

use serde::Serialize;
use url::form_urlencoded;

/// Cosmetic layout switch; data and selection logic never look at it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Standalone,
    /// Hosted inside another page's frame
    Embedded,
}

impl DisplayMode {
    /// Embedded when the page is framed or the query string asks for it
    /// (`?embed`, `?embed=1`, `?embed=true`)
    pub fn detect(framed: bool, query: &str) -> Self {
        if framed || query_requests_embed(query) {
            DisplayMode::Embedded
        } else {
            DisplayMode::Standalone
        }
    }

    pub fn is_embedded(self) -> bool {
        self == DisplayMode::Embedded
    }
}

fn query_requests_embed(query: &str) -> bool {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .any(|(key, value)| key == "embed" && matches!(value.as_ref(), "" | "1" | "true"))
}

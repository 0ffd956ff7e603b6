// src/patch/models.rs
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static DASHED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+-\d+$").expect("Failed to compile DASHED_RE"));

static DOTTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.\d+)").expect("Failed to compile DOTTED_RE"));

// Fallback tokens still end up in a file name, so only allow a safe alphabet.
static SAFE_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9A-Za-z]+(?:-[0-9A-Za-z]+)*$").expect("Failed to compile SAFE_TOKEN_RE")
});

/// Dash-joined major-minor patch label, e.g. `25-16`.
///
/// Keys the bundle cache, the persisted page file and the detail page URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PatchVersion(String);

impl PatchVersion {
    /// Accepts an already dashed identifier such as a URL path segment.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        DASHED_RE.is_match(raw).then(|| PatchVersion(raw.to_string()))
    }

    /// Dotted number in a card title like "Patch 25.16 Notes", dashed.
    pub fn from_dotted(text: &str) -> Option<Self> {
        DOTTED_RE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|found| PatchVersion(found.as_str().replace('.', "-")))
    }

    /// Like [`PatchVersion::from_dotted`], falling back to the title's second
    /// word. Only meant for the newest card.
    pub fn from_listing_text(text: &str) -> Option<Self> {
        if let Some(version) = Self::from_dotted(text) {
            return Some(version);
        }
        let token = text.split_whitespace().nth(1)?.replace('.', "-");
        SAFE_TOKEN_RE.is_match(&token).then_some(PatchVersion(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the persisted raw page.
    pub fn page_file_name(&self) -> String {
        format!("patch-{}.html", self.0)
    }
}

impl fmt::Display for PatchVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

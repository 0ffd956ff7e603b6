// src/extractors/section.rs

// --- Imports ---
use crate::utils::text::compact_text;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Marker class carried by every content block in the patch notes body.
pub const CONTENT_BLOCK_CLASS: &str = "content-border";

// --- CSS Selectors (Lazy Static) ---
// Top-level section headings
pub(crate) static TOP_HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h2").expect("Failed to compile TOP_HEADING_SELECTOR")
});

pub(crate) static CONTENT_BLOCK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.content-border").expect("Failed to compile CONTENT_BLOCK_SELECTOR")
});

/// How a section parser recognizes its heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadingMatch {
    /// Element id equals the value.
    Id(String),
    /// Element id starts with the value.
    IdPrefix(String),
    /// Element id contains the value, case-insensitive.
    IdContains(String),
    /// Heading text contains the value, case-insensitive.
    TextContains(String),
    /// Heading text equals the value, case-insensitive.
    TextEquals(String),
    /// Any of the nested rules.
    AnyOf(Vec<HeadingMatch>),
}

impl HeadingMatch {
    pub fn matches(&self, heading: ElementRef<'_>) -> bool {
        let id = heading.value().id().unwrap_or("");
        match self {
            HeadingMatch::Id(want) => id == want,
            HeadingMatch::IdPrefix(prefix) => id.starts_with(prefix.as_str()),
            HeadingMatch::IdContains(needle) => {
                id.to_lowercase().contains(&needle.to_lowercase())
            }
            HeadingMatch::TextContains(needle) => compact_text(heading)
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            HeadingMatch::TextEquals(want) => {
                compact_text(heading).to_lowercase() == want.to_lowercase()
            }
            HeadingMatch::AnyOf(rules) => rules.iter().any(|rule| rule.matches(heading)),
        }
    }
}

/// All top-level headings in document order.
pub fn top_headings(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document.select(&TOP_HEADING_SELECTOR)
}

/// First top-level heading satisfying `rule`, in document order.
pub fn find_heading<'a>(document: &'a Html, rule: &HeadingMatch) -> Option<ElementRef<'a>> {
    top_headings(document).find(|heading| rule.matches(*heading))
}

/// Locates the section introduced by the heading matching `rule` and
/// returns its content blocks. Yields nothing when no heading matches.
pub fn locate<'a>(document: &'a Html, rule: &HeadingMatch) -> SectionBlocks<'a> {
    match find_heading(document, rule) {
        Some(heading) => {
            tracing::debug!("Found section heading {:?} for rule {:?}", heading.value().id(), rule);
            blocks_after(heading)
        }
        None => {
            tracing::debug!("No section heading matched rule {:?}", rule);
            SectionBlocks { next: None }
        }
    }
}

/// Content blocks following `heading`. Headings are wrapped in a container
/// (a `<header>` on the live page), so the walk starts at the container's
/// next sibling.
pub fn blocks_after(heading: ElementRef<'_>) -> SectionBlocks<'_> {
    let next = heading
        .parent()
        .and_then(ElementRef::wrap)
        .and_then(next_element_sibling);
    SectionBlocks { next }
}

/// The next `div.content-border` sibling of the heading's container,
/// ignoring section boundaries.
pub fn adjoining_block(heading: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let container = heading.parent().and_then(ElementRef::wrap)?;
    container
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| is_content_block(*el))
}

/// Iterator over the content blocks of one section.
///
/// Stops before any sibling that is a top-level heading or wraps one; the
/// boundary check runs before the block-type filter on every step.
#[derive(Debug, Clone)]
pub struct SectionBlocks<'a> {
    next: Option<ElementRef<'a>>,
}

impl<'a> Iterator for SectionBlocks<'a> {
    type Item = ElementRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.next {
            if is_boundary(current) {
                tracing::trace!("Section boundary at <{}>", current.value().name());
                self.next = None;
                return None;
            }
            self.next = next_element_sibling(current);
            if is_content_block(current) {
                return Some(current);
            }
        }
        None
    }
}

pub fn is_content_block(el: ElementRef<'_>) -> bool {
    el.value().name() == "div" && el.value().classes().any(|class| class == CONTENT_BLOCK_CLASS)
}

fn is_boundary(el: ElementRef<'_>) -> bool {
    el.value().name() == "h2" || el.select(&TOP_HEADING_SELECTOR).next().is_some()
}

fn next_element_sibling(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

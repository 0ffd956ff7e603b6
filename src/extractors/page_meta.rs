// src/extractors/page_meta.rs
use crate::extractors::section::{adjoining_block, top_headings, CONTENT_BLOCK_SELECTOR};
use crate::extractors::sections::HIGHLIGHTS_HEADING_ID;
use crate::utils::text::{compact_text, normalize_ws, spaced_text};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

// --- CSS Selectors (Lazy Static) ---
static TAGLINE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"div[data-testid="tagline"]"#).expect("Failed to compile TAGLINE_SELECTOR")
});

static META_DESCRIPTION_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"meta[name="description"]"#)
        .expect("Failed to compile META_DESCRIPTION_SELECTOR")
});

static OG_DESCRIPTION_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"meta[property="og:description"]"#)
        .expect("Failed to compile OG_DESCRIPTION_SELECTOR")
});

static IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("img").expect("Failed to compile IMAGE_SELECTOR")
});

static SOURCE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("source").expect("Failed to compile SOURCE_SELECTOR")
});

static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p").expect("Failed to compile PARAGRAPH_SELECTOR")
});

/// Hero image of the patch highlights section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Highlights {
    pub image: Option<String>,
    pub alt: String,
    pub caption: String,
}

/// The developer tagline under the page title, falling back to the
/// page's meta descriptions.
pub fn parse_tagline(document: &Html) -> Option<String> {
    if let Some(text) = document
        .select(&TAGLINE_SELECTOR)
        .next()
        .map(spaced_text)
        .filter(|text| !text.is_empty())
    {
        return Some(text);
    }

    [&*META_DESCRIPTION_SELECTOR, &*OG_DESCRIPTION_SELECTOR]
        .into_iter()
        .find_map(|selector| {
            document
                .select(selector)
                .next()
                .and_then(|meta| meta.value().attr("content"))
                .filter(|content| !content.is_empty())
                .map(str::to_string)
        })
}

pub fn parse_highlights(document: &Html) -> Highlights {
    let Some(heading) = top_headings(document).find(|heading| is_highlights_heading(*heading))
    else {
        return Highlights::default();
    };

    let Some(block) = adjoining_block(heading).or_else(|| following_block(heading)) else {
        tracing::debug!("Highlights heading found without a content block");
        return Highlights::default();
    };

    let mut highlights = Highlights::default();
    let usable_img = block.select(&IMAGE_SELECTOR).next().filter(|img| {
        let attrs = img.value();
        attrs.attr("src").is_some()
            || attrs.attr("data-src").is_some()
            || attrs.attr("srcset").is_some()
    });

    if let Some(img) = usable_img {
        let attrs = img.value();
        highlights.image = attrs
            .attr("src")
            .filter(|src| !src.is_empty())
            .or_else(|| attrs.attr("data-src").filter(|src| !src.is_empty()))
            .map(str::to_string)
            .or_else(|| attrs.attr("srcset").and_then(first_srcset_url));
        highlights.alt = attrs.attr("alt").unwrap_or_default().to_string();
    } else if let Some(srcset) = block
        .select(&SOURCE_SELECTOR)
        .next()
        .and_then(|source| source.value().attr("srcset"))
    {
        highlights.image = first_srcset_url(srcset);
    }

    if let Some(paragraph) = block.select(&PARAGRAPH_SELECTOR).next() {
        highlights.caption = normalize_ws(&spaced_text(paragraph));
    }
    highlights
}

fn is_highlights_heading(heading: ElementRef<'_>) -> bool {
    let id = heading.value().id().unwrap_or("").to_lowercase();
    id == HIGHLIGHTS_HEADING_ID || compact_text(heading).to_lowercase().contains("patch highlights")
}

/// First content block anywhere after `heading` in document order.
fn following_block(heading: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut node = Some(*heading);
    while let Some(current) = node {
        for sibling in current.next_siblings().filter_map(ElementRef::wrap) {
            if CONTENT_BLOCK_SELECTOR.matches(&sibling) {
                return Some(sibling);
            }
            if let Some(found) = sibling.select(&CONTENT_BLOCK_SELECTOR).next() {
                return Some(found);
            }
        }
        node = current.parent();
    }
    None
}

fn first_srcset_url(srcset: &str) -> Option<String> {
    srcset
        .split(',')
        .next()
        .and_then(|candidate| candidate.split_whitespace().next())
        .map(str::to_string)
}

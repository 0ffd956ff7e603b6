// src/extractors/entry.rs
use crate::utils::text::{ascii_arrows, compact_text, inline_text};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use serde::Serialize;

/// Stored for a titled block that has neither a summary nor a bullet list.
pub const UNPARSED_SENTINEL: &str = "Content available but not parsed";

// --- CSS Selectors (Lazy Static) ---
static BASE_TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h3.change-title, h4.change-title")
        .expect("Failed to compile BASE_TITLE_SELECTOR")
});

static DETAIL_TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h3.change-detail-title, h4.change-detail-title")
        .expect("Failed to compile DETAIL_TITLE_SELECTOR")
});

static ANY_TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h3.change-title, h4.change-title, h3.change-detail-title, h4.change-detail-title")
        .expect("Failed to compile ANY_TITLE_SELECTOR")
});

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a").expect("Failed to compile LINK_SELECTOR")
});

static SUMMARY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p.summary").expect("Failed to compile SUMMARY_SELECTOR")
});

static LIST_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("ul").expect("Failed to compile LIST_SELECTOR")
});

static LIST_ITEM_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("li").expect("Failed to compile LIST_ITEM_SELECTOR")
});

static NOTE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("blockquote.blockquote").expect("Failed to compile NOTE_SELECTOR")
});

/// Which title marker classes a section accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleRule {
    /// `change-title` only (champions).
    Base,
    /// `change-detail-title` only (items).
    Detail,
    /// Either marker (arena and generic sections).
    Either,
}

impl TitleRule {
    fn selector(self) -> &'static Selector {
        match self {
            TitleRule::Base => &BASE_TITLE_SELECTOR,
            TitleRule::Detail => &DETAIL_TITLE_SELECTOR,
            TitleRule::Either => &ANY_TITLE_SELECTOR,
        }
    }
}

/// Primary content of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    List(Vec<String>),
}

/// Value stored under a key of a generic section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntryValue {
    Plain(Payload),
    Annotated { content: Payload, note: String },
    /// Standalone quotes collected under the reserved `notes` key.
    Notes(Vec<String>),
}

/// Everything one content block yields. Any field may be missing; the
/// section parsers decide what a partial entry means for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub bullets: Option<Vec<String>>,
    pub note: Option<String>,
}

impl Entry {
    pub fn extract(block: ElementRef<'_>, rule: TitleRule) -> Self {
        Entry {
            title: extract_title(block, rule),
            summary: block.select(&SUMMARY_SELECTOR).next().map(compact_text),
            bullets: block.select(&LIST_SELECTOR).next().map(extract_bullets),
            note: block
                .select(&NOTE_SELECTOR)
                .next()
                .map(|quote| inline_text(quote).trim().to_string())
                .filter(|note| !note.is_empty()),
        }
    }

    /// Summary first, then bullets, then the sentinel when only a title exists.
    pub fn payload(&self) -> Option<Payload> {
        if let Some(summary) = &self.summary {
            return Some(Payload::Text(summary.clone()));
        }
        if let Some(bullets) = &self.bullets {
            return Some(Payload::List(bullets.clone()));
        }
        self.title
            .as_ref()
            .map(|_| Payload::Text(UNPARSED_SENTINEL.to_string()))
    }

    /// Title and stored value of a titled entry; a note wraps the payload.
    pub fn into_titled(self) -> Option<(String, EntryValue)> {
        let content = self.payload()?;
        let title = self.title?;
        let value = match self.note {
            Some(note) => EntryValue::Annotated { content, note },
            None => EntryValue::Plain(content),
        };
        Some((title, value))
    }
}

fn extract_title(block: ElementRef<'_>, rule: TitleRule) -> Option<String> {
    let heading = block.select(rule.selector()).next()?;
    let text = match heading.select(&LINK_SELECTOR).next() {
        Some(link) => compact_text(link),
        None => compact_text(heading),
    };
    (!text.is_empty()).then_some(text)
}

fn extract_bullets(list: ElementRef<'_>) -> Vec<String> {
    list.select(&LIST_ITEM_SELECTOR)
        .map(|li| ascii_arrows(&inline_text(li)).trim().to_string())
        .collect()
}

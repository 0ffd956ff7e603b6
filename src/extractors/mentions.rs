// src/extractors/mentions.rs
use std::collections::HashSet;

use crate::extractors::section::top_headings;
use crate::utils::text::{normalize_ws, spaced_text};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

static SUBHEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h3, h4").expect("Failed to compile SUBHEADING_SELECTOR")
});

static SUMMARY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p.summary").expect("Failed to compile SUMMARY_SELECTOR")
});

static LIST_ITEM_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("li").expect("Failed to compile LIST_ITEM_SELECTOR")
});

static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p").expect("Failed to compile PARAGRAPH_SELECTOR")
});

/// Where in the page a mention was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionContext {
    H2,
    ChangeTitle,
    Summary,
    Li,
    P,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mention {
    pub context: MentionContext,
    pub text: String,
}

/// Collects snippets mentioning `keyword` anywhere in the page, ignoring
/// section boundaries. Snippets are deduplicated by normalized text.
pub fn scan(document: &Html, keyword: &str) -> Vec<Mention> {
    let mut collector = Collector::new(keyword);

    for heading in top_headings(document) {
        collector.add(MentionContext::H2, heading);
    }

    for title in document.select(&SUBHEADING_SELECTOR) {
        collector.add(MentionContext::ChangeTitle, title);
        let Some(block) = enclosing_div(title) else {
            continue;
        };
        if let Some(summary) = block.select(&SUMMARY_SELECTOR).next() {
            collector.add(MentionContext::Summary, summary);
        }
        for li in block.select(&LIST_ITEM_SELECTOR) {
            collector.add(MentionContext::Li, li);
        }
    }

    for paragraph in document.select(&PARAGRAPH_SELECTOR) {
        collector.add(MentionContext::P, paragraph);
    }

    tracing::info!("Found {} '{}' mentions", collector.mentions.len(), keyword);
    collector.mentions
}

struct Collector {
    keyword: String,
    seen: HashSet<String>,
    mentions: Vec<Mention>,
}

impl Collector {
    fn new(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            seen: HashSet::new(),
            mentions: Vec::new(),
        }
    }

    fn add(&mut self, context: MentionContext, el: ElementRef<'_>) {
        let text = normalize_ws(&spaced_text(el));
        if text.is_empty() || !text.to_lowercase().contains(&self.keyword) {
            return;
        }
        if self.seen.insert(text.clone()) {
            self.mentions.push(Mention { context, text });
        }
    }
}

fn enclosing_div(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "div")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <header><h2 id="patch-arena">Arena</h2></header>
        <div class="content-border">
            <h3 class="change-title">Arena Augments</h3>
            <p class="summary">Arena   augments rebalanced</p>
            <ul><li>Arena gold ⇒ 500</li><li>Unrelated</li></ul>
        </div>
        <div class="content-border">
            <h3 class="change-title">Ahri</h3>
            <p class="summary">Arena augments rebalanced</p>
        </div>
        <p>We love the ARENA.</p>
        <p>Nothing here.</p>
    "#;

    #[test]
    fn scans_in_fixed_order_and_dedups() {
        let doc = Html::parse_document(PAGE);
        let mentions = scan(&doc, "arena");
        let got: Vec<(MentionContext, &str)> =
            mentions.iter().map(|m| (m.context, m.text.as_str())).collect();
        assert_eq!(
            got,
            vec![
                (MentionContext::H2, "Arena"),
                (MentionContext::ChangeTitle, "Arena Augments"),
                (MentionContext::Summary, "Arena augments rebalanced"),
                (MentionContext::Li, "Arena gold ⇒ 500"),
                (MentionContext::P, "We love the ARENA."),
            ]
        );
    }

    #[test]
    fn every_mention_contains_keyword_once() {
        let doc = Html::parse_document(PAGE);
        let mentions = scan(&doc, "Arena");
        let unique: HashSet<&str> = mentions.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(unique.len(), mentions.len());
        assert!(mentions.iter().all(|m| m.text.to_lowercase().contains("arena")));
    }

    #[test]
    fn context_serializes_snake_case() {
        let mention = Mention {
            context: MentionContext::ChangeTitle,
            text: "Arena".into(),
        };
        assert_eq!(
            serde_json::to_value(&mention).unwrap(),
            serde_json::json!({"context": "change_title", "text": "Arena"})
        );
    }
}

// src/extractors/sections.rs
use crate::extractors::entry::{Entry, EntryValue, TitleRule};
use crate::extractors::section::{self, adjoining_block, blocks_after, locate, HeadingMatch};
use crate::utils::text::compact_text;
use indexmap::map::Entry as MapEntry;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

pub const CHAMPIONS_HEADING_ID: &str = "patch-champions";
pub const ITEMS_HEADING_ID: &str = "patch-items";
pub const HIGHLIGHTS_HEADING_ID: &str = "patch-patch-highlights";

/// Reserved key for standalone quotes in a section.
pub const NOTES_KEY: &str = "notes";

// Handled by their own parsers, never emitted by the generic one.
const DEDICATED_SECTIONS: [&str; 2] = ["champions", "items"];

static PARAGRAPH_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p").expect("Failed to compile PARAGRAPH_SELECTOR")
});

pub type ChampionChanges = IndexMap<String, Option<String>>;
pub type ItemChanges = IndexMap<String, Vec<String>>;
pub type SectionEntries = IndexMap<String, EntryValue>;
pub type OtherSections = IndexMap<String, SectionValue>;

/// A generic section is either a prose blurb (patch highlights) or a map
/// of titled entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SectionValue {
    Prose(String),
    Entries(SectionEntries),
}

/// Champion name to its one-line summary.
pub fn parse_champions(document: &Html) -> ChampionChanges {
    let rule = HeadingMatch::AnyOf(vec![
        HeadingMatch::Id(CHAMPIONS_HEADING_ID.to_string()),
        HeadingMatch::TextEquals("champions".to_string()),
    ]);
    let mut champions = ChampionChanges::new();
    for block in locate(document, &rule) {
        let entry = Entry::extract(block, TitleRule::Base);
        if let Some(title) = entry.title {
            champions.insert(title, entry.summary);
        }
    }
    tracing::info!("Parsed {} champion entries", champions.len());
    champions
}

/// Item name to its bullet list. Blocks without a non-empty list are dropped.
pub fn parse_items(document: &Html) -> ItemChanges {
    let rule = HeadingMatch::AnyOf(vec![
        HeadingMatch::Id(ITEMS_HEADING_ID.to_string()),
        HeadingMatch::TextEquals("items".to_string()),
    ]);
    let mut items = ItemChanges::new();
    for block in locate(document, &rule) {
        let entry = Entry::extract(block, TitleRule::Detail);
        match (entry.title, entry.bullets) {
            (Some(title), Some(bullets)) if !bullets.is_empty() => {
                items.insert(title, bullets);
            }
            (title, _) => {
                tracing::debug!("Skipping item block without bullet list: {:?}", title);
            }
        }
    }
    tracing::info!("Parsed {} item entries", items.len());
    items
}

/// Every remaining top-level section, keyed by heading id (minus the
/// `patch-` prefix) or lowercased heading text.
pub fn parse_other(document: &Html) -> OtherSections {
    let mut sections = OtherSections::new();

    for heading in section::top_headings(document) {
        let heading_text = compact_text(heading);
        if is_dedicated(&heading_text) {
            continue;
        }

        let key = section_key(heading, &heading_text);
        if key.is_empty() || is_dedicated(&key) {
            tracing::debug!("Skipping heading {:?} with key {:?}", heading_text, key);
            continue;
        }

        if heading.value().id() == Some(HIGHLIGHTS_HEADING_ID) {
            if let Some(prose) = highlights_prose(heading) {
                sections.insert(key, SectionValue::Prose(prose));
                continue;
            }
        }

        let entries = collect_entries(blocks_after(heading));
        if entries.is_empty() {
            // A later empty heading with the same key drops the earlier one too.
            sections.shift_remove(&key);
        } else {
            sections.insert(key, SectionValue::Entries(entries));
        }
    }

    tracing::info!("Parsed {} other sections", sections.len());
    sections
}

/// The section whose heading id or text mentions `keyword`.
pub fn parse_arena(document: &Html, keyword: &str) -> SectionEntries {
    let rule = HeadingMatch::AnyOf(vec![
        HeadingMatch::TextContains(keyword.to_string()),
        HeadingMatch::IdContains(keyword.to_string()),
    ]);
    let entries = collect_entries(locate(document, &rule));
    if entries.is_empty() {
        tracing::info!("No {} section content found", keyword);
    }
    entries
}

/// Shared entry loop for generic and arena sections. Titled blocks become
/// entries (last write wins); untitled quotes accumulate under `notes`.
fn collect_entries<'a>(blocks: impl Iterator<Item = ElementRef<'a>>) -> SectionEntries {
    let mut entries = SectionEntries::new();
    for block in blocks {
        let entry = Entry::extract(block, TitleRule::Either);
        if entry.title.is_some() {
            if let Some((title, value)) = entry.into_titled() {
                entries.insert(title, value);
            }
            continue;
        }
        let Some(note) = entry.note else {
            continue;
        };
        match entries.entry(NOTES_KEY.to_string()) {
            MapEntry::Occupied(mut slot) => match slot.get_mut() {
                EntryValue::Notes(notes) => notes.push(note),
                other => *other = EntryValue::Notes(vec![note]),
            },
            MapEntry::Vacant(slot) => {
                slot.insert(EntryValue::Notes(vec![note]));
            }
        }
    }
    entries
}

fn section_key(heading: ElementRef<'_>, heading_text: &str) -> String {
    match heading.value().id() {
        Some(id) if !id.is_empty() => id.replace("patch-", ""),
        _ => heading_text.to_lowercase(),
    }
}

fn is_dedicated(name: &str) -> bool {
    let name = name.to_lowercase();
    DEDICATED_SECTIONS.contains(&name.as_str())
}

fn highlights_prose(heading: ElementRef<'_>) -> Option<String> {
    let block = adjoining_block(heading)?;
    block.select(&PARAGRAPH_SELECTOR).next().map(compact_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::entry::{Payload, UNPARSED_SENTINEL};

    const PAGE: &str = r#"
        <html><body>
        <header><h2 id="patch-patch-highlights">Patch Highlights</h2></header>
        <div class="content-border"><p>Welcome to the big one.</p></div>

        <header><h2 id="patch-champions">Champions</h2></header>
        <div class="content-border">
            <h3 class="change-title"><a href="/ahri">Ahri</a></h3>
            <p class="summary">Q damage increased</p>
        </div>
        <div class="content-border">
            <h3 class="change-title">Brand</h3>
        </div>

        <header><h2 id="patch-items">Items</h2></header>
        <div class="content-border">
            <h4 class="change-detail-title">Infinity Edge</h4>
            <ul><li>Cost: 3400 ⇒ 3450</li><li>AD: 70 ⇒ 65</li><li>Crit: 40%</li></ul>
        </div>
        <div class="content-border">
            <h4 class="change-detail-title">Boots</h4>
            <p class="summary">Prose only</p>
        </div>

        <header><h2 id="patch-ranked">Ranked</h2></header>
        <div class="content-border"><blockquote class="blockquote">Season starts soon</blockquote></div>
        <div class="content-border"><blockquote class="blockquote">Rewards later</blockquote></div>

        <header><h2 id="patch-empty">Empty</h2></header>
        <div class="content-border"><p>No title here</p></div>

        <header><h2>Bugfixes</h2></header>
        <div class="content-border">
            <h3 class="change-title">Client</h3>
            <ul><li>Fixed login ⇒ works</li></ul>
            <blockquote class="blockquote">More next patch</blockquote>
        </div>
        <div class="content-border"><h4 class="change-detail-title">Misc</h4></div>

        <header><h2 id="patch-arena">Arena</h2></header>
        <div class="content-border">
            <h3 class="change-title">Augments</h3>
            <p class="summary">New augments added</p>
        </div>
        </body></html>
    "#;

    #[test]
    fn champions_map_summary_or_none() {
        let doc = Html::parse_document(PAGE);
        let champions = parse_champions(&doc);
        assert_eq!(champions.len(), 2);
        assert_eq!(champions["Ahri"].as_deref(), Some("Q damage increased"));
        assert_eq!(champions["Brand"], None);
    }

    #[test]
    fn items_keep_only_bulleted_blocks() {
        let doc = Html::parse_document(PAGE);
        let items = parse_items(&doc);
        assert_eq!(items.len(), 1);
        assert_eq!(
            items["Infinity Edge"],
            vec!["Cost: 3400 -> 3450", "AD: 70 -> 65", "Crit: 40%"]
        );
    }

    #[test]
    fn items_ignore_base_title_blocks() {
        let doc = Html::parse_document(
            r#"<header><h2 id="patch-items">Items</h2></header>
            <div class="content-border"><h3 class="change-title">Sunfire Aegis</h3><ul><li>Armor: 50</li></ul></div>
            <div class="content-border"><h4 class="change-detail-title">Thornmail</h4><ul><li>Armor: 75</li></ul></div>"#,
        );
        let items = parse_items(&doc);
        assert_eq!(items.keys().collect::<Vec<_>>(), vec!["Thornmail"]);
    }

    #[test]
    fn other_sections_shape() {
        let doc = Html::parse_document(PAGE);
        let other = parse_other(&doc);

        assert!(!other.contains_key("champions"));
        assert!(!other.contains_key("items"));
        assert!(!other.contains_key("empty"));
        assert_eq!(
            other["highlights"],
            SectionValue::Prose("Welcome to the big one.".into())
        );

        let SectionValue::Entries(ranked) = &other["ranked"] else {
            panic!("ranked should hold entries");
        };
        assert_eq!(
            ranked[NOTES_KEY],
            EntryValue::Notes(vec!["Season starts soon".into(), "Rewards later".into()])
        );

        let SectionValue::Entries(bugfixes) = &other["bugfixes"] else {
            panic!("bugfixes should hold entries");
        };
        assert_eq!(
            bugfixes["Client"],
            EntryValue::Annotated {
                content: Payload::List(vec!["Fixed login -> works".into()]),
                note: "More next patch".into(),
            }
        );
        assert_eq!(
            bugfixes["Misc"],
            EntryValue::Plain(Payload::Text(UNPARSED_SENTINEL.into()))
        );

        assert!(other.contains_key("arena"));
    }

    #[test]
    fn other_never_holds_empty_maps() {
        let doc = Html::parse_document(PAGE);
        for (key, value) in parse_other(&doc) {
            if let SectionValue::Entries(entries) = value {
                assert!(!entries.is_empty(), "section {key} is empty");
            }
        }
    }

    #[test]
    fn arena_section_by_keyword() {
        let doc = Html::parse_document(PAGE);
        let arena = parse_arena(&doc, "arena");
        assert_eq!(
            arena["Augments"],
            EntryValue::Plain(Payload::Text("New augments added".into()))
        );
        let empty = Html::parse_document("<h2>Champions</h2>");
        assert!(parse_arena(&empty, "arena").is_empty());
    }

    #[test]
    fn duplicate_titles_last_write_wins() {
        let doc = Html::parse_document(
            r#"<header><h2 id="patch-champions">Champions</h2></header>
            <div class="content-border"><h3 class="change-title">Ahri</h3><p class="summary">first</p></div>
            <div class="content-border"><h3 class="change-title">Ahri</h3><p class="summary">second</p></div>"#,
        );
        let champions = parse_champions(&doc);
        assert_eq!(champions.len(), 1);
        assert_eq!(champions["Ahri"].as_deref(), Some("second"));
    }
}

// tests/extraction.rs
use patchnotes::bundle::Bundle;
use patchnotes::extractors::{mentions, page_meta, sections};
use patchnotes::PatchVersion;
use scraper::Html;
use serde_json::json;

const PATCH_PAGE: &str = r#"
<!DOCTYPE html>
<html>
<head>
  <title>Patch 25.16 Notes</title>
  <meta name="description" content="Meta description fallback">
</head>
<body>
<div data-testid="tagline">Arena returns with a bang</div>
<div id="patch-notes-container">
  <header class="header-primary"><h2 id="patch-patch-highlights">Patch Highlights</h2></header>
  <div class="content-border">
    <img src="https://cdn.example/hero-25-16.jpg" alt="Patch 25.16 hero">
    <p>Highlights caption</p>
  </div>

  <header class="header-primary"><h2 id="patch-champions">Champions</h2></header>
  <div class="content-border">
    <div class="patch-change-block">
      <h3 class="change-title"><a href="/champions/ahri/">Ahri</a></h3>
      <p class="summary">Q damage increased</p>
    </div>
  </div>

  <header class="header-primary"><h2 id="patch-items">Items</h2></header>
  <div class="content-border">
    <h4 class="change-detail-title">Infinity Edge</h4>
    <ul>
      <li><strong>Cost:</strong> 3400 ⇒ 3450</li>
      <li>Attack Damage: 70 ⇒ 65</li>
      <li>Critical Strike Damage: 40% ⇒ 35%</li>
    </ul>
  </div>

  <header class="header-primary"><h2 id="patch-arena-changes">Arena Changes</h2></header>
  <div class="content-border">
    <h3 class="change-title">Augments</h3>
    <ul><li>Arena gold ⇒ 600</li></ul>
  </div>
  <div class="content-border">
    <blockquote class="blockquote">Arena queue opens Friday.</blockquote>
  </div>

  <header class="header-primary"><h2 id="patch-bugfixes">Bugfixes</h2></header>
  <div class="content-border">
    <h3 class="change-title">Client</h3>
    <p class="summary">Fixed a crash when leaving the arena lobby</p>
  </div>
</div>
</body>
</html>
"#;

#[test]
fn champions_end_to_end() {
    let doc = Html::parse_document(PATCH_PAGE);
    let champions = sections::parse_champions(&doc);
    assert_eq!(
        json!({"champions": champions}),
        json!({"champions": {"Ahri": "Q damage increased"}})
    );
}

#[test]
fn items_end_to_end() {
    let doc = Html::parse_document(PATCH_PAGE);
    let items = sections::parse_items(&doc);
    assert_eq!(
        items["Infinity Edge"],
        vec![
            "Cost: 3400 -> 3450",
            "Attack Damage: 70 -> 65",
            "Critical Strike Damage: 40% -> 35%",
        ]
    );
    for bullets in items.values() {
        assert!(!bullets.is_empty());
        assert!(bullets.iter().all(|b| !b.contains('⇒')));
    }
}

#[test]
fn highlights_end_to_end() {
    let doc = Html::parse_document(PATCH_PAGE);
    assert_eq!(
        json!(page_meta::parse_highlights(&doc)),
        json!({
            "image": "https://cdn.example/hero-25-16.jpg",
            "alt": "Patch 25.16 hero",
            "caption": "Highlights caption"
        })
    );
    assert_eq!(
        page_meta::parse_tagline(&doc).as_deref(),
        Some("Arena returns with a bang")
    );
}

#[test]
fn mentions_cover_whole_page() {
    let doc = Html::parse_document(PATCH_PAGE);
    let found = mentions::scan(&doc, "arena");
    assert_eq!(
        json!(found),
        json!([
            {"context": "h2", "text": "Arena Changes"},
            {"context": "li", "text": "Arena gold ⇒ 600"},
            {"context": "summary", "text": "Fixed a crash when leaving the arena lobby"},
        ])
    );
}

#[test]
fn full_bundle_shape() {
    let version = PatchVersion::parse("25-16").unwrap();
    let bundle = Bundle::from_html(version, Some(PATCH_PAGE));
    let value = serde_json::to_value(&bundle).unwrap();

    assert_eq!(value["version"], json!("25-16"));
    assert_eq!(value["other"]["highlights"], json!("Highlights caption"));
    assert_eq!(
        value["other"]["bugfixes"],
        json!({"Client": "Fixed a crash when leaving the arena lobby"})
    );
    assert!(value["other"].get("champions").is_none());
    assert!(value["other"].get("items").is_none());
    assert_eq!(
        value["arena"]["arena"],
        json!({
            "Augments": ["Arena gold -> 600"],
            "notes": ["Arena queue opens Friday."]
        })
    );
    assert_eq!(value["other"]["arena-changes"], value["arena"]["arena"]);
    assert_eq!(value["tagline"], json!("Arena returns with a bang"));
}

#[test]
fn rebuilding_is_deterministic() {
    let version = PatchVersion::parse("25-16").unwrap();
    let first = Bundle::from_html(version.clone(), Some(PATCH_PAGE));
    let second = Bundle::from_html(version, Some(PATCH_PAGE));
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

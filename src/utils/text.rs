// src/utils/text.rs
use std::borrow::Cow;

use scraper::{node::Node, ElementRef};

/// The "⇒" glyph used in patch notes between old and new values.
pub const DOUBLE_ARROW: char = '\u{21d2}';

/// A child of an element that can contribute text.
///
/// Comments, doctypes and processing instructions are not content and
/// never become an `Inline`.
#[derive(Debug, Clone, Copy)]
pub enum Inline<'a> {
    Text(&'a str),
    Element(ElementRef<'a>),
}

impl<'a> Inline<'a> {
    /// Raw text of this fragment; elements contribute all descendant text.
    pub fn text(&self) -> Cow<'a, str> {
        match *self {
            Inline::Text(text) => Cow::Borrowed(text),
            Inline::Element(el) => Cow::Owned(el.text().collect()),
        }
    }
}

/// The direct children of `el` that carry content, in document order.
pub fn inlines<'a>(el: ElementRef<'a>) -> impl Iterator<Item = Inline<'a>> + 'a {
    el.children().filter_map(|node| match node.value() {
        Node::Text(text) => Some(Inline::Text(&text.text)),
        Node::Element(_) => ElementRef::wrap(node).map(Inline::Element),
        _ => None,
    })
}

/// Concatenates the inline content of `el` without separators, so nested
/// emphasis (`<strong>`, `<a>`) stays glued to the surrounding words.
pub fn inline_text(el: ElementRef<'_>) -> String {
    inlines(el).map(|inline| inline.text()).collect()
}

/// Collapses every whitespace run to a single space and trims the ends.
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Element text with whitespace collapsed.
pub fn compact_text(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// Element text fragments, each trimmed, joined with single spaces.
pub fn spaced_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rewrites the double-arrow glyph to `->`.
pub fn ascii_arrows(text: &str) -> String {
    text.replace(DOUBLE_ARROW, "->")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        let sel = Selector::parse(css).unwrap();
        doc.select(&sel).next().unwrap()
    }

    #[test]
    fn inline_text_keeps_nested_emphasis() {
        let doc = Html::parse_fragment("<li>Cost: <strong>3000</strong> ⇒ 3100<!-- hidden --></li>");
        let li = first(&doc, "li");
        assert_eq!(inline_text(li), "Cost: 3000 ⇒ 3100");
    }

    #[test]
    fn spaced_text_separates_fragments() {
        let doc = Html::parse_fragment("<h2>  Arena<span>Changes </span></h2>");
        assert_eq!(spaced_text(first(&doc, "h2")), "Arena Changes");
    }

    #[test]
    fn normalize_collapses_runs() {
        assert_eq!(normalize_ws("  a \n\t b  "), "a b");
        assert_eq!(ascii_arrows("10 ⇒ 12"), "10 -> 12");
    }
}

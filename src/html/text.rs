//! HTML-to-text conversion for posting descriptions
//!
//! Providers deliver descriptions as HTML fragments, sometimes with the
//! markup itself entity-escaped (`&lt;p&gt;...`). Conversion therefore:
//! - Decodes character entities first
//! - Parses the result as a fragment, recovering from malformed markup
//! - Drops text inside non-visible elements (`<script>`, `<style>`, ...)
//! - Joins the visible text nodes and collapses whitespace

use scraper::{Html, Node};

/// Elements whose text content is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Converts an HTML fragment into normalized plain text
///
/// Unclosed or malformed markup never fails; whatever text the parser can
/// recover is returned. Plain text without markup comes back unchanged apart
/// from whitespace collapsing.
///
/// # Examples
///
/// ```
/// use ats_postings::html_to_text;
///
/// assert_eq!(html_to_text("<p>Hi</p><script>evil()</script>"), "Hi");
/// assert_eq!(html_to_text("&lt;p&gt;Build &amp; ship&lt;/p&gt;"), "Build & ship");
/// assert_eq!(html_to_text("plain   text"), "plain text");
/// ```
pub fn html_to_text(html: &str) -> String {
    let decoded = html_escape::decode_html_entities(html);
    let fragment = Html::parse_fragment(&decoded);

    let mut pieces: Vec<&str> = Vec::new();
    for node in fragment.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });

        if !hidden {
            pieces.push(text);
        }
    }

    collapse_whitespace(&pieces.join(" "))
}

/// Collapses every whitespace run into a single space and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

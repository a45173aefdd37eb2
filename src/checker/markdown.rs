// src/checker/markdown.rs
// =============================================================================
// This module extracts links from Markdown text.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows the CommonMark specification
// - Is fast and memory-efficient (it's a streaming parser)
//
// We never render anything: we walk the event stream once and record every
// link as it goes by. Malformed markup cannot make this fail, the parser just
// produces fewer (or odd-looking) links which the validators then flag.
// =============================================================================

use pulldown_cmark::{Event, LinkType, Parser, Tag};
use serde::Serialize;

// One hyperlink occurrence inside a document
//
// All three fields are captured exactly as written in the Markdown source.
// The same link written twice produces two separate values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Where the link points (the part in parentheses in [text](url))
    pub destination: String,
    /// Optional title ([text](url "title")), empty when absent
    pub title: String,
    /// The visible link text
    pub text: String,
}

// Extracts all links from Markdown text, in document order
//
// Parameters:
//   markdown: the markdown text to parse (borrowed as &str)
//
// Returns: Vec<Link>, one entry per link occurrence
//
// Example input:
//   "See the [guide](/guide/ \"Guide\")!"
//
// Example output:
//   vec![Link { destination: "/guide/", title: "Guide", text: "guide" }]
pub fn extract_markdown_links(markdown: &str) -> Vec<Link> {
    let mut links = Vec::new();

    // Track the link we're currently inside
    // A link arrives as Start(Link), some text events, then End(Link)
    let mut current_link: Option<Link> = None;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Link(link_type, dest_url, title)) => {
                // Email autolinks (<someone@example.com>) come without a scheme
                let destination = match link_type {
                    LinkType::Email => format!("mailto:{}", dest_url),
                    _ => dest_url.to_string(),
                };

                current_link = Some(Link {
                    destination,
                    title: title.to_string(),
                    text: String::new(),
                });
            }

            // Collect visible text while inside a link
            Event::Text(text) | Event::Code(text) | Event::Html(text) => {
                if let Some(link) = current_link.as_mut() {
                    link.text.push_str(&text);
                }
            }

            // Line breaks inside the link text are kept as written
            Event::SoftBreak | Event::HardBreak => {
                if let Some(link) = current_link.as_mut() {
                    link.text.push('\n');
                }
            }

            Event::End(Tag::Link(..)) => {
                if let Some(link) = current_link.take() {
                    links.push(link);
                }
            }

            _ => {}
        }
    }

    links
}

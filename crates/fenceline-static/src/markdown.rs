//! Markdown to HTML with highlighted code fences.

use pulldown_cmark::{html, CowStr, Event, Parser, Tag, TagEnd};

use fenceline_highlight::Highlighter;
use fenceline_mdx::{markdown_options, ParsedDoc};

/// Render a parsed document's body to HTML.
///
/// Code blocks are replaced by the highlighter's markup and headings get the
/// anchor ids from the document's table of contents.
pub fn render_markdown(doc: &ParsedDoc, highlighter: &Highlighter) -> String {
    // Same content and options as parse_mdx, so fences and headings line up by position
    let mut fences = doc.fences.iter();
    let mut heading_ids = doc.toc.iter().map(|entry| entry.id.as_str());

    let mut in_code_block = false;
    let mut events = Vec::new();

    for event in Parser::new_ext(&doc.content, markdown_options()) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,

            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                if let Some(fence) = fences.next() {
                    events.push(Event::Html(highlighter.fence_html(fence).into()));
                }
            }

            _ if in_code_block => {}

            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let slug = heading_ids.next();
                let id = id.or_else(|| slug.map(CowStr::from));
                events.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
            }

            other => events.push(other),
        }
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());
    html_output
}

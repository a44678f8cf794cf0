//! Structured rich text from the content API
//!
//! The API delivers post bodies as a sequence of typed blocks (headings,
//! paragraphs, list items) with inline span annotations over character
//! offsets, rather than raw HTML. Two pure renderings exist: plain text for
//! the reading-time estimate and HTML for display.

use serde::{Deserialize, Serialize};

/// Text content of a block plus its inline span annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
}

/// An inline annotation over `[start, end)` character offsets of a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub kind: SpanKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SpanKind {
    #[serde(rename = "strong")]
    Strong,
    #[serde(rename = "em")]
    Em,
    #[serde(rename = "hyperlink")]
    Hyperlink { data: LinkData },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkData {
    pub url: String,
}

/// One block of a rich text document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    #[serde(rename = "heading1")]
    Heading1(TextNode),
    #[serde(rename = "heading2")]
    Heading2(TextNode),
    #[serde(rename = "heading3")]
    Heading3(TextNode),
    #[serde(rename = "heading4")]
    Heading4(TextNode),
    #[serde(rename = "heading5")]
    Heading5(TextNode),
    #[serde(rename = "heading6")]
    Heading6(TextNode),
    #[serde(rename = "paragraph")]
    Paragraph(TextNode),
    #[serde(rename = "preformatted")]
    Preformatted(TextNode),
    #[serde(rename = "list-item")]
    ListItem(TextNode),
    #[serde(rename = "o-list-item")]
    OListItem(TextNode),
    #[serde(rename = "image")]
    Image {
        url: String,
        #[serde(default)]
        alt: Option<String>,
    },
}

impl Block {
    /// Text content, `None` for non-text blocks
    fn node(&self) -> Option<&TextNode> {
        match self {
            Block::Heading1(n)
            | Block::Heading2(n)
            | Block::Heading3(n)
            | Block::Heading4(n)
            | Block::Heading5(n)
            | Block::Heading6(n)
            | Block::Paragraph(n)
            | Block::Preformatted(n)
            | Block::ListItem(n)
            | Block::OListItem(n) => Some(n),
            Block::Image { .. } => None,
        }
    }
}

/// Extract the plain text of a block sequence, blocks joined by a space
pub fn as_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter_map(|b| b.node().map(|n| n.text.as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Serialize a block sequence to HTML, preserving source order.
///
/// Trust boundary: the content repository is editorial input. Text content
/// and attribute values are escaped, but span markup and link URLs are
/// emitted as authored — anyone feeding this renderer untrusted documents
/// must sanitize upstream.
pub fn as_html(blocks: &[Block]) -> String {
    let mut html = String::new();
    let mut iter = blocks.iter().peekable();

    while let Some(block) = iter.next() {
        match block {
            Block::Heading1(n) => wrap(&mut html, "h1", n),
            Block::Heading2(n) => wrap(&mut html, "h2", n),
            Block::Heading3(n) => wrap(&mut html, "h3", n),
            Block::Heading4(n) => wrap(&mut html, "h4", n),
            Block::Heading5(n) => wrap(&mut html, "h5", n),
            Block::Heading6(n) => wrap(&mut html, "h6", n),
            Block::Paragraph(n) => wrap(&mut html, "p", n),
            Block::Preformatted(n) => wrap(&mut html, "pre", n),
            Block::ListItem(n) => {
                html.push_str("<ul>");
                wrap(&mut html, "li", n);
                while let Some(Block::ListItem(next)) = iter.peek() {
                    wrap(&mut html, "li", next);
                    iter.next();
                }
                html.push_str("</ul>");
            }
            Block::OListItem(n) => {
                html.push_str("<ol>");
                wrap(&mut html, "li", n);
                while let Some(Block::OListItem(next)) = iter.peek() {
                    wrap(&mut html, "li", next);
                    iter.next();
                }
                html.push_str("</ol>");
            }
            Block::Image { url, alt } => {
                html.push_str(&format!(
                    r#"<p class="block-img"><img src="{}" alt="{}"></p>"#,
                    html_escape(url),
                    html_escape(alt.as_deref().unwrap_or(""))
                ));
            }
        }
    }

    html
}

fn wrap(html: &mut String, tag: &str, node: &TextNode) {
    html.push('<');
    html.push_str(tag);
    html.push('>');
    html.push_str(&span_html(&node.text, &node.spans));
    html.push_str("</");
    html.push_str(tag);
    html.push('>');
}

/// Apply inline spans to a block's text, escaping the text itself.
///
/// Span offsets are character offsets. Spans are opened longest-first; a
/// span that overlaps a closing one without nesting inside it is closed and
/// reopened at the boundary, so the markup stays well formed.
fn span_html(text: &str, spans: &[Span]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let mut sorted: Vec<&Span> = spans
        .iter()
        .filter(|s| s.start < s.end && s.start < len)
        .collect();
    sorted.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut out = String::with_capacity(text.len());
    let mut open: Vec<&Span> = Vec::new();
    for pos in 0..=len {
        // unwind the open stack until every span ending here is closed,
        // reopening the still-active spans that had to come off with them
        if open.iter().any(|s| s.end.min(len) == pos) {
            let mut reopen: Vec<&Span> = Vec::new();
            while open.iter().any(|s| s.end.min(len) == pos) {
                let span = open.pop().unwrap();
                out.push_str(close_tag(&span.kind));
                if span.end.min(len) > pos {
                    reopen.push(span);
                }
            }
            for span in reopen.into_iter().rev() {
                out.push_str(&open_tag(&span.kind));
                open.push(span);
            }
        }
        for span in &sorted {
            if span.start == pos {
                out.push_str(&open_tag(&span.kind));
                open.push(span);
            }
        }
        if pos < len {
            push_escaped(&mut out, chars[pos]);
        }
    }

    out
}

fn open_tag(kind: &SpanKind) -> String {
    match kind {
        SpanKind::Strong => "<strong>".to_string(),
        SpanKind::Em => "<em>".to_string(),
        SpanKind::Hyperlink { data } => {
            format!(r#"<a href="{}">"#, html_escape(&data.url))
        }
    }
}

fn close_tag(kind: &SpanKind) -> &'static str {
    match kind {
        SpanKind::Strong => "</strong>",
        SpanKind::Em => "</em>",
        SpanKind::Hyperlink { .. } => "</a>",
    }
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        push_escaped(&mut out, c);
    }
    out
}

//! Markdown rendering and sanitizing.
//!
//! Markdown is rendered into a complete HTML page with a table of contents,
//! then cleaned against a user-generated-content policy. Rendering never
//! fails: malformed markdown degrades to whatever the parser makes of it.

use std::ops::Range;
use std::sync::LazyLock;

use pulldown_cmark::{
    CowStr, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream, html,
};
use regex::Regex;

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'\[\]()]+"#).unwrap());

static RAW_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[A-Za-z][^<>]*>").unwrap());

// `id` attribute inside a tag, with its leading separator captured.
static RAW_ID_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)([\s/])id\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+)"#).unwrap()
});

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Render markdown to sanitized HTML.
pub fn render_markdown(title: &str, markdown: &str) -> String {
    sanitize(&render_page(title, markdown))
}

/// Render markdown to a complete, unsanitized HTML page.
pub fn render_page(title: &str, markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(markdown, options).into_offset_iter();
    let events = suppress_intraword_emphasis(markdown, parser);
    let (events, toc) = collect_events(TextMergeStream::new(events.into_iter()));

    let mut body = String::new();
    html::push_html(&mut body, events.into_iter());

    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    page.push_str("<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    page.push_str("</head>\n<body>\n");
    page.push_str(&table_of_contents(&toc));
    page.push_str(&body);
    page.push_str("</body>\n</html>\n");
    page
}

/// Clean HTML against the user-generated-content policy.
///
/// `id` survives only on headings, where the renderer puts the `toc_N`
/// anchors.
pub fn sanitize(html: &str) -> String {
    let mut policy = ammonia::Builder::default();
    policy
        .add_tags(&["nav"])
        .add_tag_attributes("code", &["class"])
        .add_clean_content_tags(&["title"])
        .link_rel(Some("nofollow noopener noreferrer"));
    for heading in HEADING_TAGS {
        policy.add_tag_attributes(heading, &["id"]);
    }
    policy.clean(html).to_string()
}

struct TocEntry {
    level: usize,
    anchor: String,
    text: String,
}

/// Anchor headings, autolink bare URLs and gather the table of contents.
fn collect_events<'a>(parser: impl Iterator<Item = Event<'a>>) -> (Vec<Event<'a>>, Vec<TocEntry>) {
    let mut events = Vec::new();
    let mut toc: Vec<TocEntry> = Vec::new();
    let mut in_heading = false;
    let mut in_code_block = false;
    let mut link_depth = 0usize;
    let mut raw_html = String::new();

    for event in parser {
        // Block HTML arrives one line per event; strip ids from the whole block.
        if let Event::Html(fragment) = &event {
            raw_html.push_str(fragment);
            continue;
        }
        if !raw_html.is_empty() {
            events.push(Event::Html(strip_raw_ids(&std::mem::take(&mut raw_html)).into()));
        }

        match event {
            Event::Start(Tag::Heading {
                level,
                classes,
                attrs,
                ..
            }) => {
                let anchor = format!("toc_{}", toc.len());
                toc.push(TocEntry {
                    level: heading_depth(level),
                    anchor: anchor.clone(),
                    text: String::new(),
                });
                in_heading = true;
                events.push(Event::Start(Tag::Heading {
                    level,
                    id: Some(anchor.into()),
                    classes,
                    attrs,
                }));
            }
            Event::End(TagEnd::Heading(level)) => {
                in_heading = false;
                events.push(Event::End(TagEnd::Heading(level)));
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                events.push(Event::Start(Tag::CodeBlock(kind)));
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                events.push(Event::End(TagEnd::CodeBlock));
            }
            Event::Start(tag @ (Tag::Link { .. } | Tag::Image { .. })) => {
                link_depth += 1;
                events.push(Event::Start(tag));
            }
            Event::End(tag @ (TagEnd::Link | TagEnd::Image)) => {
                link_depth = link_depth.saturating_sub(1);
                events.push(Event::End(tag));
            }
            Event::Code(code) => {
                if in_heading && let Some(entry) = toc.last_mut() {
                    entry.text.push_str(&code);
                }
                events.push(Event::Code(code));
            }
            Event::Text(text) => {
                if in_heading && let Some(entry) = toc.last_mut() {
                    entry.text.push_str(&text);
                }
                if in_code_block || link_depth > 0 {
                    events.push(Event::Text(text));
                } else {
                    push_autolinked(&mut events, text);
                }
            }
            Event::InlineHtml(fragment) => {
                events.push(Event::InlineHtml(strip_raw_ids(&fragment).into()));
            }
            other => events.push(other),
        }
    }
    if !raw_html.is_empty() {
        events.push(Event::Html(strip_raw_ids(&raw_html).into()));
    }

    (events, toc)
}

/// Remove `id` attributes from user-written HTML so only generated anchors
/// carry ids.
fn strip_raw_ids(html: &str) -> String {
    RAW_TAG
        .replace_all(html, |tag: &regex::Captures| {
            RAW_ID_ATTR.replace_all(&tag[0], "$1").into_owned()
        })
        .into_owned()
}

/// Turn emphasis that opens or closes inside a word back into its literal
/// delimiters, so `foo*bar*baz` and `foo**bar**baz` stay plain text.
fn suppress_intraword_emphasis<'a>(
    source: &'a str,
    events: impl Iterator<Item = (Event<'a>, Range<usize>)>,
) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    // One entry per open emphasis: the delimiter when it was suppressed.
    let mut open: Vec<Option<&'a str>> = Vec::new();

    for (event, range) in events {
        match event {
            Event::Start(tag @ (Tag::Emphasis | Tag::Strong)) => {
                let width = if matches!(tag, Tag::Strong) { 2 } else { 1 };
                if is_intraword(source, &range) {
                    let delimiter = source
                        .get(range.start..range.start + width)
                        .unwrap_or("*");
                    open.push(Some(delimiter));
                    out.push(Event::Text(delimiter.into()));
                } else {
                    open.push(None);
                    out.push(Event::Start(tag));
                }
            }
            Event::End(end @ (TagEnd::Emphasis | TagEnd::Strong)) => {
                match open.pop().flatten() {
                    Some(delimiter) => out.push(Event::Text(delimiter.into())),
                    None => out.push(Event::End(end)),
                }
            }
            other => out.push(other),
        }
    }

    out
}

/// Whether the delimiter run around `range` touches a letter or digit.
fn is_intraword(source: &str, range: &Range<usize>) -> bool {
    let is_delimiter = |c: &char| matches!(c, '*' | '_');
    let before = source
        .get(..range.start)
        .and_then(|s| s.chars().rev().find(|c| !is_delimiter(c)));
    let after = source
        .get(range.end..)
        .and_then(|s| s.chars().find(|c| !is_delimiter(c)));
    before.is_some_and(char::is_alphanumeric) || after.is_some_and(char::is_alphanumeric)
}

/// Split a text event around bare URLs, wrapping each URL in a link.
fn push_autolinked<'a>(events: &mut Vec<Event<'a>>, text: CowStr<'a>) {
    if !BARE_URL.is_match(&text) {
        events.push(Event::Text(text));
        return;
    }

    let mut last = 0;
    for found in BARE_URL.find_iter(&text) {
        let url = found
            .as_str()
            .trim_end_matches(['.', ',', ';', ':', '!', '?']);
        if found.start() > last {
            events.push(Event::Text(text[last..found.start()].to_string().into()));
        }
        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: url.to_string().into(),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        events.push(Event::Text(url.to_string().into()));
        events.push(Event::End(TagEnd::Link));
        last = found.start() + url.len();
    }
    if last < text.len() {
        events.push(Event::Text(text[last..].to_string().into()));
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Nested list of links to every heading, empty when there are none.
fn table_of_contents(entries: &[TocEntry]) -> String {
    let Some(min_level) = entries.iter().map(|e| e.level).min() else {
        return String::new();
    };

    let mut out = String::from("<nav>\n");
    let mut open = 0usize;

    for entry in entries {
        let level = entry.level - min_level + 1;
        if level > open {
            while open < level {
                out.push_str("<ul>\n");
                open += 1;
                if open < level {
                    out.push_str("<li>\n");
                }
            }
        } else {
            out.push_str("</li>\n");
            while open > level {
                out.push_str("</ul>\n</li>\n");
                open -= 1;
            }
        }
        out.push_str(&format!(
            "<li><a href=\"#{}\">{}</a>\n",
            entry.anchor,
            html_escape(&entry.text)
        ));
    }

    out.push_str("</li>\n");
    while open > 0 {
        out.push_str("</ul>\n");
        open -= 1;
        if open > 0 {
            out.push_str("</li>\n");
        }
    }

    out.push_str("</nav>\n");
    out
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

//! HTML pages.
//!
//! Templates are constants with `<!-- NAME -->` placeholders. Anything typed
//! by a visitor is escaped on the way in; rendered markdown arrives already
//! sanitized.

use hotnot_board::{Assessment, CommentView, TopicListing, TopicPage, TopicSummary, TopicTitle};

pub fn topics_page(listing: &TopicListing) -> String {
    TOPICS_HTML
        .replace("<!-- CURRENT_COUNT -->", &listing.current.len().to_string())
        .replace("<!-- CURRENT -->", &topic_rows(&listing.current))
        .replace("<!-- OLD_COUNT -->", &listing.old.len().to_string())
        .replace("<!-- OLD -->", &topic_rows(&listing.old))
}

pub fn view_page(page: &TopicPage, comments: &[CommentView]) -> String {
    let mut comments_html = String::new();
    for comment in comments {
        comments_html.push_str(&format!(
            r#"<div class="comment">
                <img class="reaction" src="/images/{}" alt="{}">
                <span class="author">{}</span>
                <div class="body">{}</div>
            </div>"#,
            comment.reaction_asset,
            comment.assessment,
            html_escape(short_identity(comment.identity.as_str())),
            comment.html,
        ));
    }

    VIEW_HTML
        .replace("<!-- TITLE -->", &html_escape(page.title.as_str()))
        .replace("<!-- CONTENT -->", &page.html)
        .replace("<!-- COMMENT_COUNT -->", &comments.len().to_string())
        .replace("<!-- COMMENTS -->", &comments_html)
        .replace(
            "<!-- OWN_COMMENT -->",
            &html_escape(page.own_comment.as_deref().unwrap_or("")),
        )
        .replace(
            "<!-- ASSESSMENT_CHOICES -->",
            &assessment_choices(page.own_assessment),
        )
}

pub fn edit_page(title: &TopicTitle, markdown: &str) -> String {
    EDIT_HTML
        .replace("<!-- TITLE -->", &html_escape(title.as_str()))
        .replace("<!-- MARKDOWN -->", &html_escape(markdown))
}

fn topic_rows(summaries: &[TopicSummary]) -> String {
    let mut rows = String::new();
    for summary in summaries {
        rows.push_str(&format!(
            r#"<li class="topic">
                <a href="/view/{}" class="title">{}</a>
                <span class="hotness">{}% hot</span>
                <span class="counts">{} hot, {} not, {} shrug, {} comments</span>
            </li>"#,
            html_escape(summary.title.as_str()),
            html_escape(summary.title.as_str()),
            summary.hotness_percent,
            summary.hot_count,
            summary.not_count,
            summary.shrug_count,
            summary.comment_count,
        ));
    }
    rows
}

fn assessment_choices(selected: Assessment) -> String {
    [Assessment::Hot, Assessment::Not, Assessment::Shrug]
        .iter()
        .map(|choice| {
            format!(
                r#"<label><input type="radio" name="assessment" value="{0}"{1}> {0}</label>"#,
                choice,
                if *choice == selected { " checked" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn short_identity(token: &str) -> &str {
    let end = token
        .char_indices()
        .nth(8)
        .map(|(i, _)| i)
        .unwrap_or(token.len());
    &token[..end]
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ============================================================================
// HTML Templates
// ============================================================================

const TOPICS_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Topics - hotnot</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; max-width: 800px; margin: 0 auto; padding: 2rem; background: #0a0a0a; color: #e0e0e0; }
        h1 { color: #88c0d0; }
        a { color: #81a1c1; }
        ul { list-style: none; padding: 0; }
        .topic { padding: 1rem; margin: 1rem 0; background: #2e3440; border-radius: 4px; }
        .title { font-weight: bold; color: #88c0d0; text-decoration: none; }
        .title:hover { text-decoration: underline; }
        .hotness { color: #bf616a; margin-left: 0.5rem; }
        .counts { color: #888; font-size: 0.85rem; margin-left: 0.5rem; }
        .new input { padding: 0.5rem; background: #2e3440; border: 1px solid #4c566a; border-radius: 4px; color: #e0e0e0; }
    </style>
</head>
<body>
    <h1>Topics</h1>
    <form class="new" action="/new/" method="get">
        <input type="text" name="topic" placeholder="new-topic-title" pattern="[A-Za-z0-9-]+">
        <input type="submit" value="Create">
    </form>
    <h2>New to you (<!-- CURRENT_COUNT -->)</h2>
    <ul><!-- CURRENT --></ul>
    <h2>Already rated (<!-- OLD_COUNT -->)</h2>
    <ul><!-- OLD --></ul>
</body>
</html>"#;

const VIEW_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title><!-- TITLE --> - hotnot</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; max-width: 800px; margin: 0 auto; padding: 2rem; background: #0a0a0a; color: #e0e0e0; }
        h1 { color: #88c0d0; }
        h1 a { color: #88c0d0; text-decoration: none; }
        a { color: #81a1c1; }
        .content { line-height: 1.7; }
        .comment { padding: 1rem; margin: 1rem 0; background: #2e3440; border-radius: 4px; }
        .reaction { width: 48px; height: 48px; float: right; }
        .author { color: #888; font-size: 0.85rem; font-family: monospace; }
        textarea { width: 100%; min-height: 8rem; background: #2e3440; color: #e0e0e0; border: 1px solid #4c566a; border-radius: 4px; box-sizing: border-box; }
    </style>
</head>
<body>
    <h1><a href="/topics/">Topics</a> / <!-- TITLE --></h1>
    <p><a href="/edit/<!-- TITLE -->">edit</a></p>
    <div class="content"><!-- CONTENT --></div>
    <h2>Your take</h2>
    <form action="/save/<!-- TITLE -->" method="post">
        <input type="hidden" name="mode" value="comment">
        <textarea name="markdown"><!-- OWN_COMMENT --></textarea>
        <div class="choices"><!-- ASSESSMENT_CHOICES --></div>
        <input type="submit" name="next" value="Save">
        <input type="submit" name="next" value="Next">
    </form>
    <h2>Comments (<!-- COMMENT_COUNT -->)</h2>
    <div><!-- COMMENTS --></div>
</body>
</html>"#;

const EDIT_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Editing <!-- TITLE --> - hotnot</title>
    <style>
        body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; max-width: 800px; margin: 0 auto; padding: 2rem; background: #0a0a0a; color: #e0e0e0; }
        h1 { color: #88c0d0; }
        h1 a { color: #88c0d0; text-decoration: none; }
        textarea { width: 100%; min-height: 20rem; background: #2e3440; color: #e0e0e0; border: 1px solid #4c566a; border-radius: 4px; box-sizing: border-box; font-family: monospace; }
    </style>
</head>
<body>
    <h1><a href="/topics/">Topics</a> / Editing <!-- TITLE --></h1>
    <form action="/save/<!-- TITLE -->" method="post">
        <input type="hidden" name="mode" value="edit">
        <textarea name="markdown"><!-- MARKDOWN --></textarea>
        <input type="submit" value="Save">
    </form>
</body>
</html>"#;

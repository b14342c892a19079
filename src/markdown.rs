//! Markdown to HTML conversion. This is a pure function as far as the rest
//! of the crate is concerned: markdown text in, HTML text out.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag};

/// Converts `markdown` into an HTML fragment.
///
/// Fenced code blocks carry their language as a `language-{lang}` class on
/// the `<code>` element so a theme's highlighter can pick them up; blocks
/// without a language get a plain `<pre><code>`.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(
        &mut out,
        Parser::new_ext(markdown, options).map(normalize_code_block),
    );
    out
}

// Keeps only the first word of a fence's info string (```rust,ignore ->
// rust) so the emitted class is a usable language name.
fn normalize_code_block(ev: Event) -> Event {
    match ev {
        Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
            let lang = info
                .split(|c: char| c == ',' || c.is_whitespace())
                .next()
                .unwrap_or_default()
                .to_owned();
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(CowStr::from(lang))))
        }
        _ => ev,
    }
}

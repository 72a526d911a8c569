//! Read-only markdown for event descriptions.

use dioxus::prelude::*;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag};

fn parser_options() -> Options {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let scheme = url.trim_start().to_ascii_lowercase();
    if scheme.starts_with("javascript:") || scheme.starts_with("data:") || scheme.starts_with("vbscript:") {
        CowStr::Borrowed("#")
    } else {
        url
    }
}

/// Render markdown to HTML. Raw HTML in the source is shown as text and
/// script-capable link targets are dropped, since descriptions are user input.
pub fn render_markdown(source: &str) -> String {
    let events = Parser::new_ext(source, parser_options()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    });
    let mut html = String::with_capacity(source.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, events);
    html
}

#[component]
pub fn Markdown(source: String, #[props(default)] class: String) -> Element {
    let html = use_memo(use_reactive!(|source| render_markdown(&source)));
    rsx! {
        div { class: "markdown {class}", dangerous_inner_html: "{html}" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_basic_markdown() {
        let html = render_markdown("# Festa\n\nTraga **amigos** e ~~nada~~ mais.");
        assert!(html.contains("<h1>Festa</h1>"));
        assert!(html.contains("<strong>amigos</strong>"));
        assert!(html.contains("<del>nada</del>"));
    }

    #[test]
    fn test_escapes_raw_html() {
        let html = render_markdown("oi <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_drops_javascript_links() {
        let html = render_markdown("[clique](javascript:alert(1)) [site](https://agito.app)");
        assert!(!html.contains("javascript:"));
        assert!(html.contains("href=\"#\""));
        assert!(html.contains("href=\"https://agito.app\""));
    }
}

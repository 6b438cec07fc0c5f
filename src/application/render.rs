//! Markdown-to-HTML rendering.
//!
//! Rendering is pure and happens on every read; the HTML is never stored.
//! Author content is trusted, so raw HTML in the markdown passes through
//! unsanitized.

use comrak::{Options, markdown_to_html};

fn options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.render.r#unsafe = true;
    options
}

pub fn render_markdown(markdown: &str) -> String {
    markdown_to_html(markdown, &options())
}

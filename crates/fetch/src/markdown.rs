//! Minimal HTML to Markdown conversion for HN comment bodies.
//!
//! HN comments only ever contain a handful of tags (`p`, `a`, `i`, `pre`,
//! `code`, the odd `br`), so a small hand-rolled walk over the parsed tree
//! is enough. Unknown elements fall back to their text content.

use scraper::{ElementRef, Node};

/// Render an element's children as Markdown.
pub fn element_to_markdown(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    render_children(el, &mut out);
    out.trim().to_string()
}

fn render_children(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(t) => push_text(&normalize_ws(t), out),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    render_element(child_el, out);
                }
            }
            _ => {}
        }
    }
}

fn render_element(el: ElementRef<'_>, out: &mut String) {
    match el.value().name() {
        "p" => {
            push_paragraph_break(out);
            render_children(el, out);
        }
        "br" => out.push('\n'),
        "a" => {
            let text: String = el.text().collect();
            let text = text.trim();
            match el.value().attr("href") {
                Some(href) if !text.is_empty() => {
                    out.push('[');
                    out.push_str(text);
                    out.push_str("](");
                    out.push_str(href);
                    out.push(')');
                }
                Some(href) => out.push_str(href),
                None => out.push_str(text),
            }
        }
        "i" | "em" => {
            out.push('*');
            render_children(el, out);
            out.push('*');
        }
        "pre" => {
            // Code blocks keep their whitespace verbatim.
            push_paragraph_break(out);
            let code: String = el.text().collect();
            out.push_str("```\n");
            out.push_str(code.trim_matches('\n'));
            out.push_str("\n```");
        }
        "code" => {
            out.push('`');
            render_children(el, out);
            out.push('`');
        }
        _ => render_children(el, out),
    }
}

/// Append normalized text, suppressing a leading space right after a break.
fn push_text(text: &str, out: &mut String) {
    if out.is_empty() || out.ends_with('\n') {
        out.push_str(text.trim_start());
    } else {
        out.push_str(text);
    }
}

fn push_paragraph_break(out: &mut String) {
    let end = out.trim_end().len();
    out.truncate(end);
    if !out.is_empty() {
        out.push_str("\n\n");
    }
}

/// Collapse whitespace runs to single spaces while keeping edge spaces, so
/// inline elements stay separated from surrounding text.
fn normalize_ws(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_ws = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            if !last_ws {
                out.push(' ');
            }
            last_ws = true;
        } else {
            out.push(ch);
            last_ws = false;
        }
    }
    out
}

//! Printable document artifact.
//!
//! # Responsibility
//! - Render the card layout as a self-contained HTML document suitable
//!   for the platform print/share service.
//!
//! # Invariants
//! - Field content comes only from the shared [`CardLayout`], one row
//!   per layout row.
//! - All user text is HTML-escaped.

use crate::export::layout::{CardLayout, NOTES_HEADING};
use std::fmt::Write as _;

/// Renders the printable document for one card layout.
pub fn document_html(layout: &CardLayout) -> String {
    let mut rows = String::new();
    for row in &layout.rows {
        let _ = writeln!(
            rows,
            "      <div class=\"row\"><span class=\"label\">{}</span><span class=\"value\">{}</span></div>",
            escape_html(row.label),
            escape_html(&row.value)
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8" />
    <title>{title}</title>
    <style>
      body {{ font-family: -apple-system, Roboto, sans-serif; margin: 32px; color: #282c34; }}
      .card {{ border: 1px solid #e5e7eb; border-radius: 12px; overflow: hidden; max-width: 560px; }}
      .header {{ background: #568cd8; color: #ffffff; padding: 16px 24px; font-size: 14px; }}
      .name {{ font-size: 26px; font-weight: 600; padding: 20px 24px 8px; }}
      .row {{ display: flex; justify-content: space-between; padding: 10px 24px; border-top: 1px solid #e5e7eb; }}
      .label {{ color: #6e7681; }}
      .notes-heading {{ padding: 18px 24px 4px; font-size: 13px; color: #6e7681; text-transform: uppercase; }}
      .notes {{ padding: 0 24px 24px; white-space: pre-wrap; }}
    </style>
  </head>
  <body>
    <div class="card">
      <div class="header">{title}</div>
      <div class="name">{name}</div>
{rows}      <div class="notes-heading">{notes_heading}</div>
      <div class="notes">{notes}</div>
    </div>
  </body>
</html>
"#,
        title = escape_html(&layout.title),
        name = escape_html(&layout.name),
        rows = rows,
        notes_heading = escape_html(NOTES_HEADING),
        notes = escape_html(&layout.notes),
    )
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

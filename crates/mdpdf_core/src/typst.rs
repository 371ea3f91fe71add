//! Lowering of formatted elements into Typst markup.
//!
//! Everything is emitted in code mode and all document text goes through
//! [`string_literal`], so nothing in the source can be read as Typst syntax.
//! Vertical spacing between elements is emitted as weak `v` so that it
//! disappears at page breaks.

use std::fmt::Write;

use crate::block::{RichText, Span, SpanKind};
use crate::config::PageConfig;
use crate::element::{Content, FormattedElement};
use crate::style::{
    Border, BorderSide, Color, Font, RULE_SPACER, StyleDescriptor, StyleId, StyleRegistry,
    TABLE_GAP_AFTER,
};

const SANS_FAMILIES: &str =
    r#"("Helvetica", "Arial", "Liberation Sans", "Nimbus Sans", "DejaVu Sans")"#;
const MONO_FAMILIES: &str =
    r#"("Courier", "Courier New", "Liberation Mono", "Nimbus Mono PS", "DejaVu Sans Mono")"#;

const A4_WIDTH_PT: f64 = 595.276;
const A4_HEIGHT_PT: f64 = 841.89;
const PT_PER_MM: f64 = 72.0 / 25.4;

/// Usable area inside the margins.
#[derive(Debug, Clone, Copy)]
struct ContentArea {
    width: f64,
    height: f64,
}

impl ContentArea {
    fn new(page: &PageConfig) -> Self {
        let margin = page.margin_mm * PT_PER_MM;
        Self {
            width: A4_WIDTH_PT - 2.0 * margin,
            height: A4_HEIGHT_PT - 2.0 * margin,
        }
    }
}

/// Convert elements to Typst markup
pub fn elements_to_typst(
    elements: &[FormattedElement],
    registry: &StyleRegistry,
    page: &PageConfig,
) -> String {
    let mut out = String::new();

    emit_preamble(page, &mut out);

    // Space-after of the previous element overlaps the next space-before;
    // fixed spacers (after tables, before rules) stack on top.
    let mut pending_after = 0.0;
    let mut pending_spacer = 0.0;
    for element in elements {
        let style = registry.get(element.style);

        let mut gap = f64::max(pending_after, style.space_before) + pending_spacer;
        if element.style == StyleId::Rule {
            gap += RULE_SPACER;
        }
        if gap > 0.0 {
            let _ = writeln!(out, "#v({}, weak: true)", pt(gap));
        }

        match &element.content {
            Content::Text(text) => emit_text(text, &style, registry, &mut out),
            Content::Code(lines) => emit_code(lines, &style, &mut out),
            Content::Table(rows) => emit_table(rows, registry, &mut out),
            Content::Rule => emit_rule(&style, &mut out),
        }

        pending_after = style.space_after;
        pending_spacer = if matches!(element.content, Content::Table(_)) {
            TABLE_GAP_AFTER
        } else {
            0.0
        };
    }

    out
}

fn emit_preamble(page: &PageConfig, out: &mut String) {
    let area = ContentArea::new(page);
    let numbering = if page.numbers { "\"1\"" } else { "none" };
    let _ = writeln!(
        out,
        "#set page(paper: \"a4\", margin: {}mm, numbering: {numbering}, number-align: center + bottom)",
        page.margin_mm
    );
    let _ = writeln!(out, "#set text(font: {SANS_FAMILIES}, hyphenate: false)");
    out.push_str("#set par(leading: 0pt, spacing: 0pt, justify: false)\n");
    out.push_str("#set block(spacing: 0pt)\n");
    // Elements stay on one page unless they are taller than a whole page.
    let _ = writeln!(
        out,
        "#let keep(body) = context {{ let height = measure(body, width: {}).height; block(width: 100%, breakable: height > {}, body) }}",
        pt(area.width),
        pt(area.height)
    );
}

fn emit_text(text: &RichText, style: &StyleDescriptor, registry: &StyleRegistry, out: &mut String) {
    let mut body = String::new();
    text_settings(style, &mut body);
    for span in text.spans() {
        body.push_str("; ");
        span_to_typst(span, registry, &mut body);
    }

    emit_box(style, &body, out);
}

fn emit_code(lines: &[String], style: &StyleDescriptor, out: &mut String) {
    let mut body = String::new();
    text_settings(style, &mut body);
    let _ = write!(
        body,
        "; show raw: set text(font: {MONO_FAMILIES}, size: {}); raw(block: true, {})",
        pt(style.font_size),
        string_literal(&lines.join("\n"))
    );

    emit_box(style, &body, out);
}

fn emit_table(rows: &[Vec<RichText>], registry: &StyleRegistry, out: &mut String) {
    if rows.iter().all(|row| row.is_empty()) {
        return;
    }

    let columns = rows.first().map_or(0, Vec::len).max(1);
    let header = registry.style_for(StyleId::TableHeader, 0);
    let grid = header.border.map_or_else(|| "none".to_string(), stroke_all);

    let _ = writeln!(
        out,
        "#keep(table(columns: {columns}, stroke: {grid}, inset: {}, align: left,",
        pt(header.padding)
    );
    for (index, row) in rows.iter().enumerate() {
        let style = registry.style_for(StyleId::TableBody, index);
        let fill = style.background.map_or_else(|| "none".to_string(), rgb);
        for cell in row {
            let mut body = String::new();
            text_settings(&style, &mut body);
            for span in cell.spans() {
                body.push_str("; ");
                span_to_typst(span, registry, &mut body);
            }
            let _ = writeln!(out, "  table.cell(fill: {fill}, {{ {body} }}),");
        }
    }
    out.push_str("))\n");
}

fn emit_rule(style: &StyleDescriptor, out: &mut String) {
    let stroke = style.border.map_or_else(|| "none".to_string(), stroke_for);
    let _ = writeln!(
        out,
        "#block(width: 100%, height: {}, stroke: {stroke})",
        pt(style.leading)
    );
}

/// Emit one block-level box for a text or code element.
fn emit_box(style: &StyleDescriptor, body: &str, out: &mut String) {
    let left_bordered = style
        .border
        .is_some_and(|border| border.side == BorderSide::Left);
    let (offset, inset) = if left_bordered {
        (
            (style.left_indent - style.padding).max(0.0),
            format!("(left: {})", pt(style.padding)),
        )
    } else {
        (style.left_indent, pt(style.padding))
    };

    let mut attrs = format!("width: 100%, inset: {inset}");
    if let Some(fill) = style.background {
        let _ = write!(attrs, ", fill: {}", rgb(fill));
    }
    if let Some(border) = style.border {
        let _ = write!(attrs, ", stroke: {}", stroke_for(border));
    }

    let block = format!("block({attrs}, {{ {body} }})");
    if offset > 0.0 {
        let _ = writeln!(out, "#keep(pad(left: {}, {block}))", pt(offset));
    } else {
        let _ = writeln!(out, "#keep({block})");
    }
}
/// Set rules fixing font, size, color and line height for a block.
///
/// The text frame is pinned to exactly `leading` points, so consecutive
/// lines sit one leading apart whatever fonts they mix.
fn text_settings(style: &StyleDescriptor, out: &mut String) {
    let descent = (style.leading - style.font_size).max(0.0) / 2.0 + 0.2 * style.font_size;
    let ascent = style.leading - descent;
    let _ = write!(
        out,
        "set text(font: {}, weight: \"{}\", size: {}, fill: {}, top-edge: {}, bottom-edge: {})",
        families(style.font),
        if style.font.is_bold() { "bold" } else { "regular" },
        pt(style.font_size),
        rgb(style.text_color),
        pt(ascent),
        pt(-descent)
    );
}

fn span_to_typst(span: &Span, registry: &StyleRegistry, out: &mut String) {
    let text = string_literal(&span.text);
    match span.kind {
        SpanKind::Plain => out.push_str(&text),
        SpanKind::Bold => {
            let _ = write!(out, "text(weight: \"bold\", {text})");
        }
        SpanKind::Italic => {
            let _ = write!(out, "text(style: \"italic\", {text})");
        }
        SpanKind::Code => {
            let style = registry.get(StyleId::InlineCode);
            let fill = style.background.map_or_else(|| "none".to_string(), rgb);
            let stroke = style.border.map_or_else(|| "none".to_string(), stroke_for);
            let _ = write!(
                out,
                "box(fill: {fill}, stroke: {stroke}, inset: (x: {}), text(font: {}, size: {}, fill: {}, {text}))",
                pt(style.padding / 2.0),
                families(style.font),
                pt(style.font_size),
                rgb(style.text_color)
            );
        }
    }
}

fn families(font: Font) -> &'static str {
    if font.is_monospace() {
        MONO_FAMILIES
    } else {
        SANS_FAMILIES
    }
}

fn stroke_for(border: Border) -> String {
    let stroke = format!("{} + {}", pt(border.width), rgb(border.color));
    match border.side {
        BorderSide::All => stroke,
        BorderSide::Top => format!("(top: {stroke})"),
        BorderSide::Left => format!("(left: {stroke})"),
    }
}

fn stroke_all(border: Border) -> String {
    stroke_for(Border {
        side: BorderSide::All,
        ..border
    })
}

fn rgb(color: Color) -> String {
    format!("rgb(\"{}\")", color.to_hex())
}

/// A point length, rounded so that float noise never reaches the output.
fn pt(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid "-0pt".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}pt")
}

/// Quote `text` as a Typst string literal.
pub fn string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

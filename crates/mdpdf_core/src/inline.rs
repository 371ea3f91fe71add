//! Inline formatting: emphasis, code spans and links.
//!
//! Formatting is a fixed pipeline of rewrite passes. Each pass takes the whole
//! rich text produced by the previous one and returns a new one; a span made
//! by an earlier pass is never split by a later emphasis pass, so markup does
//! not nest.

use std::borrow::Cow;

use crate::block::{RichText, Span, SpanKind};

type Pass = fn(RichText) -> RichText;

/// Order matters: bold must run before italic so that `**` pairs are consumed
/// before single `*` are matched, and unescaping runs last so that decoded
/// characters are never read as markup.
const PASSES: [Pass; 5] = [bold, italic, code, link, unescape];

/// Format a line of inline markdown.
pub fn format(text: &str) -> RichText {
    PASSES
        .iter()
        .fold(RichText::plain(text), |rich, pass| pass(rich))
}

/// `**X**` becomes a bold span.
pub fn bold(rich: RichText) -> RichText {
    split_plain(rich, "**", SpanKind::Bold)
}

/// `*X*` becomes an italic span.
pub fn italic(rich: RichText) -> RichText {
    split_plain(rich, "*", SpanKind::Italic)
}

/// `` `X` `` becomes a code span.
pub fn code(rich: RichText) -> RichText {
    split_plain(rich, "`", SpanKind::Code)
}

/// `[text](url)` keeps only `text`. Applies inside every span.
pub fn link(rich: RichText) -> RichText {
    map_text(rich, strip_links)
}

/// Decode HTML entities such as `&amp;`. Applies inside every span.
pub fn unescape(rich: RichText) -> RichText {
    map_text(rich, |text| html_escape::decode_html_entities(text))
}

/// Split every plain span on pairs of `delim`, turning the text between the
/// nearest pair into a `kind` span. An opening delimiter without a match is
/// left as literal text.
fn split_plain(rich: RichText, delim: &str, kind: SpanKind) -> RichText {
    let mut out = RichText::default();

    for span in rich {
        if span.kind != SpanKind::Plain {
            out.push(span);
            continue;
        }

        let mut rest = span.text.as_str();
        while let Some((before, inner, after)) = next_pair(rest, delim) {
            out.push(Span::plain(before));
            out.push(Span::new(kind, inner));
            rest = after;
        }
        out.push(Span::plain(rest));
    }

    out
}

/// Find the first `delim` and the nearest following `delim`.
fn next_pair<'a>(text: &'a str, delim: &str) -> Option<(&'a str, &'a str, &'a str)> {
    let open = text.find(delim)?;
    let inner_start = open + delim.len();
    let close = inner_start + text[inner_start..].find(delim)?;
    Some((
        &text[..open],
        &text[inner_start..close],
        &text[close + delim.len()..],
    ))
}

fn map_text<F>(rich: RichText, f: F) -> RichText
where
    F: for<'a> Fn(&'a str) -> Cow<'a, str>,
{
    let mut out = RichText::default();
    for span in rich {
        let text = match f(&span.text) {
            Cow::Borrowed(_) => span.text,
            Cow::Owned(text) => text,
        };
        out.push(Span::new(span.kind, text));
    }
    out
}

fn strip_links(text: &str) -> Cow<'_, str> {
    if !text.contains("](") {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        match parse_link(&rest[open..]) {
            Some((label, consumed)) => {
                out.push_str(&rest[..open]);
                out.push_str(label);
                rest = &rest[open + consumed..];
            }
            None => {
                out.push_str(&rest[..=open]);
                rest = &rest[open + 1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Match `[label](url)` at the start of `text`, where neither part is empty.
/// Returns the label and the number of bytes consumed.
fn parse_link(text: &str) -> Option<(&str, usize)> {
    let label_end = 1 + text[1..].find(']')?;
    if label_end == 1 {
        return None;
    }
    let after_label = &text[label_end + 1..];
    let url = after_label.strip_prefix('(')?;
    let url_len = url.find(')')?;
    if url_len == 0 {
        return None;
    }
    // '[' + label + "](" + url + ')'
    Some((&text[1..label_end], label_end + 2 + url_len + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn rich(spans: Vec<Span>) -> RichText {
        RichText(spans)
    }

    #[test]
    fn mixed_emphasis() {
        assert_eq!(
            format("**a** *b* `c`"),
            rich(vec![
                Span::bold("a"),
                Span::plain(" "),
                Span::italic("b"),
                Span::plain(" "),
                Span::code("c"),
            ])
        );
    }

    #[test]
    fn plain_text_is_one_span() {
        assert_eq!(format("hello world"), rich(vec![Span::plain("hello world")]));
    }

    #[test]
    fn empty_text_has_no_spans() {
        assert!(format("").is_empty());
    }

    #[rstest]
    #[case("*italic without close")]
    #[case("`code without close")]
    #[case("[label without url]")]
    #[case("[label](no close")]
    #[case("[](empty label)")]
    #[case("[empty url]()")]
    fn unterminated_markers_stay_literal(#[case] input: &str) {
        assert_eq!(format(input).plain_text(), input);
    }

    #[test]
    fn leftover_double_star_becomes_empty_italic() {
        // The bold pass finds no pair, so the italic pass pairs the two stars.
        assert_eq!(
            format("**a"),
            rich(vec![Span::italic(""), Span::plain("a")])
        );
    }

    #[test]
    fn same_kind_markers_pair_left_to_right() {
        assert_eq!(
            format("**a**b**c**"),
            rich(vec![Span::bold("a"), Span::plain("b"), Span::bold("c")])
        );
    }

    #[test]
    fn triple_star_pairs_nearest() {
        assert_eq!(
            format("***a***"),
            rich(vec![Span::bold("*a"), Span::plain("*")])
        );
    }

    #[test]
    fn emphasis_does_not_nest() {
        assert_eq!(
            format("**a *b* c**"),
            rich(vec![Span::bold("a *b* c")])
        );
    }

    #[test]
    fn italic_runs_before_code() {
        assert_eq!(
            format("`*x*` *y*"),
            rich(vec![
                Span::plain("`"),
                Span::italic("x"),
                Span::plain("` "),
                Span::italic("y"),
            ])
        );
    }

    #[test]
    fn unpaired_star_survives_into_code_span() {
        assert_eq!(
            format("`a*b` and [c](d)"),
            rich(vec![Span::code("a*b"), Span::plain(" and c")])
        );
    }

    #[test]
    fn link_keeps_label_only() {
        assert_eq!(
            format("see [the docs](https://example.com) now"),
            rich(vec![Span::plain("see the docs now")])
        );
    }

    #[test]
    fn link_inside_bold_is_resolved() {
        assert_eq!(
            format("**[x](http://y)**"),
            rich(vec![Span::bold("x")])
        );
    }

    #[test]
    fn link_label_may_contain_open_bracket() {
        assert_eq!(
            format("a [b [c](d)"),
            rich(vec![Span::plain("a b [c")])
        );
    }

    #[test]
    fn entities_are_decoded_last() {
        assert_eq!(
            format("**a &amp; b** &lt;tag&gt; &#42;x&#42;"),
            rich(vec![Span::bold("a & b"), Span::plain(" <tag> *x*")])
        );
    }

    #[test]
    fn passes_compose_in_order() {
        let text = RichText::plain("**a** *b*");
        assert_eq!(
            italic(bold(text.clone())),
            rich(vec![Span::bold("a"), Span::plain(" "), Span::italic("b")])
        );
        // Italic first eats the bold markers as empty italic spans.
        assert_eq!(
            bold(italic(text)),
            rich(vec![
                Span::italic(""),
                Span::plain("a"),
                Span::italic(""),
                Span::plain(" "),
                Span::italic("b"),
            ])
        );
    }
}

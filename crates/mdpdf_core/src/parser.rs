use crate::block::Block;

const FENCE: &str = "```";

/// Heading prefixes in the order they are tried. Five or more `#` match none.
const HEADING_PREFIXES: [(&str, u8); 4] = [("# ", 1), ("## ", 2), ("### ", 3), ("#### ", 4)];

/// Parse markdown text into a list of blocks.
///
/// Parsing never fails: anything that is not recognised becomes a paragraph.
pub fn parse(markdown: &str) -> Vec<Block> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut cursor = LineCursor::new(&lines);
    let mut blocks = Vec::new();

    while let Some(raw) = cursor.current() {
        let line = raw.trim();

        if line.is_empty() {
            cursor.advance();
            continue;
        }

        if let Some(block) = parse_marked_line(line) {
            blocks.push(block);
            cursor.advance();
        } else if line.starts_with(FENCE) {
            blocks.push(parse_code_block(&mut cursor));
        } else if starts_table(&cursor, line) {
            blocks.push(parse_table(&mut cursor));
        } else if line.starts_with("---") || line.starts_with("***") {
            blocks.push(Block::Rule);
            cursor.advance();
        } else {
            blocks.push(Block::Paragraph {
                text: line.to_string(),
            });
            cursor.advance();
        }
    }

    blocks
}

/// Explicit index over the source lines. Only fences and tables move it by
/// more than one line at a time.
struct LineCursor<'a> {
    lines: &'a [&'a str],
    index: usize,
}

impl<'a> LineCursor<'a> {
    fn new(lines: &'a [&'a str]) -> Self {
        Self { lines, index: 0 }
    }

    fn current(&self) -> Option<&'a str> {
        self.lines.get(self.index).copied()
    }

    fn peek_next(&self) -> Option<&'a str> {
        self.lines.get(self.index + 1).copied()
    }

    fn advance(&mut self) {
        self.index += 1;
    }
}

/// Headings, list items and quotes: single lines recognised by their leading
/// marker. These take precedence over tables, so `> a | b` is a quote even
/// when the next line holds a pipe.
fn parse_marked_line(line: &str) -> Option<Block> {
    for (prefix, level) in HEADING_PREFIXES {
        if let Some(text) = line.strip_prefix(prefix) {
            return Some(Block::Heading {
                level,
                text: text.to_string(),
            });
        }
    }

    if let Some(text) = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| strip_ordinal(line))
    {
        return Some(Block::ListItem {
            text: text.to_string(),
        });
    }

    line.strip_prefix("> ").map(|text| Block::Quote {
        text: text.to_string(),
    })
}

/// Strip a leading `<digits>. ` marker, returning the rest of the line.
fn strip_ordinal(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

/// Consume an opening fence, the code lines, and the closing fence if any.
/// An unterminated fence runs to the end of input.
fn parse_code_block(cursor: &mut LineCursor<'_>) -> Block {
    cursor.advance();

    let mut lines = Vec::new();
    while let Some(raw) = cursor.current() {
        cursor.advance();
        if raw.trim().starts_with(FENCE) {
            break;
        }
        lines.push(raw.to_string());
    }

    Block::CodeBlock { lines }
}

fn starts_table(cursor: &LineCursor<'_>, line: &str) -> bool {
    line.contains('|') && cursor.peek_next().is_some_and(|next| next.contains('|'))
}

/// Consume consecutive lines containing a pipe. The separator row under the
/// header is kept as an ordinary row.
fn parse_table(cursor: &mut LineCursor<'_>) -> Block {
    let mut rows = Vec::new();
    while let Some(raw) = cursor.current().filter(|raw| raw.contains('|')) {
        rows.push(split_row(raw));
        cursor.advance();
    }
    Block::Table { rows }
}

/// Split on `|`, dropping the fragments outside the outer pipes.
fn split_row(raw: &str) -> Vec<String> {
    let fragments: Vec<&str> = raw.split('|').collect();
    match fragments.len() {
        0..=2 => Vec::new(),
        n => fragments[1..n - 1]
            .iter()
            .map(|cell| cell.trim().to_string())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::parse;
    use crate::block::Block;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn paragraph(text: &str) -> Block {
        Block::Paragraph {
            text: text.to_string(),
        }
    }

    fn item(text: &str) -> Block {
        Block::ListItem {
            text: text.to_string(),
        }
    }

    #[rstest]
    #[case("# Title", 1, "Title")]
    #[case("## Title", 2, "Title")]
    #[case("### Title", 3, "Title")]
    #[case("#### Title", 4, "Title")]
    #[case("   ## Indented", 2, "Indented")]
    fn headings(#[case] input: &str, #[case] level: u8, #[case] text: &str) {
        assert_eq!(
            parse(input),
            vec![Block::Heading {
                level,
                text: text.to_string()
            }]
        );
    }

    #[test]
    fn five_hashes_is_a_paragraph() {
        assert_eq!(parse("##### Title"), vec![paragraph("##### Title")]);
    }

    #[test]
    fn hash_without_space_is_a_paragraph() {
        assert_eq!(parse("#Title"), vec![paragraph("#Title")]);
    }

    #[test]
    fn bullets_and_numbers_become_list_items() {
        assert_eq!(
            parse("- one\n* two\n1. three\n42. four"),
            vec![item("one"), item("two"), item("three"), item("four")]
        );
    }

    #[test]
    fn number_without_space_is_a_paragraph() {
        assert_eq!(parse("1.5 apples"), vec![paragraph("1.5 apples")]);
    }

    #[test]
    fn fenced_code_block() {
        assert_eq!(
            parse("```\nline1\nline2\n```"),
            vec![Block::CodeBlock {
                lines: vec!["line1".to_string(), "line2".to_string()]
            }]
        );
    }

    #[test]
    fn code_block_keeps_whitespace_and_ignores_language() {
        assert_eq!(
            parse("```rust\nfn main() {\n    let x = 1;\n\n}\n```\nafter"),
            vec![
                Block::CodeBlock {
                    lines: vec![
                        "fn main() {".to_string(),
                        "    let x = 1;".to_string(),
                        String::new(),
                        "}".to_string(),
                    ]
                },
                paragraph("after"),
            ]
        );
    }

    #[test]
    fn code_block_content_is_not_classified() {
        assert_eq!(
            parse("```\n# not a heading\n| a | b |\n| c | d |\n```"),
            vec![Block::CodeBlock {
                lines: vec![
                    "# not a heading".to_string(),
                    "| a | b |".to_string(),
                    "| c | d |".to_string(),
                ]
            }]
        );
    }

    #[test]
    fn unterminated_fence_runs_to_end() {
        assert_eq!(
            parse("```\nline1"),
            vec![Block::CodeBlock {
                lines: vec!["line1".to_string()]
            }]
        );
    }

    #[test]
    fn empty_fence() {
        assert_eq!(parse("```\n```"), vec![Block::CodeBlock { lines: vec![] }]);
    }

    #[test]
    fn consecutive_quotes_stay_separate() {
        assert_eq!(
            parse("> first\n> second"),
            vec![
                Block::Quote {
                    text: "first".to_string()
                },
                Block::Quote {
                    text: "second".to_string()
                },
            ]
        );
    }

    #[test]
    fn table_keeps_separator_row() {
        let rows = |cells: &[&[&str]]| {
            cells
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect::<Vec<_>>())
                .collect::<Vec<_>>()
        };
        assert_eq!(
            parse("| A | B |\n| - | - |\n| 1 | 2 |"),
            vec![Block::Table {
                rows: rows(&[&["A", "B"], &["-", "-"], &["1", "2"]])
            }]
        );
    }

    #[test]
    fn ragged_table_rows_are_kept_as_is() {
        assert_eq!(
            parse("| A | B |\n| 1 |\n| 2 | 3 | 4 |"),
            vec![Block::Table {
                rows: vec![
                    vec!["A".to_string(), "B".to_string()],
                    vec!["1".to_string()],
                    vec!["2".to_string(), "3".to_string(), "4".to_string()],
                ]
            }]
        );
    }

    #[test]
    fn table_ends_at_first_line_without_pipe() {
        let blocks = parse("| A |\n| 1 |\ntext");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1], paragraph("text"));
    }

    #[test]
    fn quote_wins_over_table() {
        assert_eq!(
            parse("> a | b\n| c | d |"),
            vec![
                Block::Quote {
                    text: "a | b".to_string()
                },
                paragraph("| c | d |"),
            ]
        );
    }

    #[test]
    fn separator_looking_table_is_not_a_rule() {
        assert_eq!(
            parse("---|---\n| a |"),
            vec![Block::Table {
                rows: vec![vec![], vec!["a".to_string()]]
            }]
        );
    }

    #[test]
    fn lone_pipe_line_is_a_paragraph() {
        assert_eq!(
            parse("a | b\n\nnext"),
            vec![paragraph("a | b"), paragraph("next")]
        );
    }

    #[rstest]
    #[case("---")]
    #[case("***")]
    #[case("-----")]
    fn rules(#[case] input: &str) {
        assert_eq!(parse(input), vec![Block::Rule]);
    }

    #[test]
    fn spaced_dashes_are_a_list_item() {
        assert_eq!(parse("- - -"), vec![item("- -")]);
    }

    #[test]
    fn paragraphs_are_trimmed_and_blank_lines_skipped() {
        assert_eq!(
            parse("  hello  \n\n   \nworld"),
            vec![paragraph("hello"), paragraph("world")]
        );
    }

    #[test]
    fn crlf_input() {
        assert_eq!(
            parse("# Title\r\n```\r\ncode\r\n```\r\n"),
            vec![
                Block::Heading {
                    level: 1,
                    text: "Title".to_string()
                },
                Block::CodeBlock {
                    lines: vec!["code".to_string()]
                },
            ]
        );
    }

    #[rstest]
    #[case("")]
    #[case("\n\n\n")]
    #[case("|")]
    #[case("|\n|\n|")]
    #[case("```")]
    #[case("# \n## \n1. \n> ")]
    #[case("**\n``\n[](\n|||")]
    fn never_more_blocks_than_lines(#[case] input: &str) {
        assert!(parse(input).len() <= input.lines().count());
    }
}

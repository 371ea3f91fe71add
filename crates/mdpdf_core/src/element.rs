use crate::block::{Block, RichText, Span};
use crate::inline;
use crate::style::StyleId;

const BULLET: &str = "• ";

/// What an element puts on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(RichText),
    /// Verbatim code lines; never inline-formatted.
    Code(Vec<String>),
    /// Rows of formatted cells, header first.
    Table(Vec<Vec<RichText>>),
    Rule,
}

/// A block paired with the style it is drawn with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedElement {
    pub style: StyleId,
    pub content: Content,
}

impl FormattedElement {
    fn text(style: StyleId, text: RichText) -> Self {
        Self {
            style,
            content: Content::Text(text),
        }
    }
}

/// Inline-format each block and assign its style.
///
/// Code blocks without any lines produce no element.
pub fn format_blocks(blocks: &[Block]) -> Vec<FormattedElement> {
    blocks.iter().filter_map(format_block).collect()
}

fn format_block(block: &Block) -> Option<FormattedElement> {
    let element = match block {
        Block::Heading { level, text } => {
            FormattedElement::text(StyleId::heading(*level), inline::format(text))
        }
        Block::ListItem { text } => {
            let mut rich = RichText::default();
            rich.push(Span::plain(BULLET));
            rich.0.extend(inline::format(text));
            FormattedElement::text(StyleId::List, rich)
        }
        Block::Quote { text } => FormattedElement::text(StyleId::Quote, inline::format(text)),
        Block::Paragraph { text } => FormattedElement::text(StyleId::Normal, inline::format(text)),
        Block::CodeBlock { lines } if lines.is_empty() => return None,
        Block::CodeBlock { lines } => FormattedElement {
            style: StyleId::Code,
            content: Content::Code(lines.clone()),
        },
        Block::Table { rows } => FormattedElement {
            style: StyleId::TableHeader,
            content: Content::Table(
                rows.iter()
                    .map(|row| row.iter().map(|cell| inline::format(cell)).collect())
                    .collect(),
            ),
        },
        Block::Rule => FormattedElement {
            style: StyleId::Rule,
            content: Content::Rule,
        },
    };
    Some(element)
}

/// How a run of inline text is emphasised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Plain,
    Bold,
    Italic,
    Code,
}

/// A run of text with a single resolved emphasis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub text: String,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Plain, text)
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Bold, text)
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Italic, text)
    }

    pub fn code(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Code, text)
    }

    pub fn new(kind: SpanKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Inline text after formatting: an ordered, flat sequence of spans
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText(pub Vec<Span>);

impl RichText {
    /// A single plain span holding `text`, or nothing if `text` is empty.
    pub fn plain(text: &str) -> Self {
        let mut rich = Self::default();
        rich.push(Span::plain(text));
        rich
    }

    /// Append a span. Empty plain spans carry nothing and are dropped.
    pub fn push(&mut self, span: Span) {
        if span.kind == SpanKind::Plain && span.text.is_empty() {
            return;
        }
        self.0.push(span);
    }

    pub fn spans(&self) -> &[Span] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The text with all emphasis removed.
    pub fn plain_text(&self) -> String {
        self.0.iter().map(|span| span.text.as_str()).collect()
    }
}

impl IntoIterator for RichText {
    type Item = Span;
    type IntoIter = std::vec::IntoIter<Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Block-level elements parsed from Markdown, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Level is always in `1..=4`.
    Heading {
        level: u8,
        text: String,
    },
    /// Bulleted and numbered items alike; numbering is discarded.
    ListItem {
        text: String,
    },
    /// Raw lines between the fences, verbatim. The fence language is ignored.
    CodeBlock {
        lines: Vec<String>,
    },
    Quote {
        text: String,
    },
    /// First row is the header. Rows are not padded to a common width.
    Table {
        rows: Vec<Vec<String>>,
    },
    Rule,
    Paragraph {
        text: String,
    },
}

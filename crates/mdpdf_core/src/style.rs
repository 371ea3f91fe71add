//! The style registry: a fixed table of visual attributes per element kind.
//!
//! All lengths are in points. The values reproduce the light preview theme
//! of the reference editor and are part of the output contract, so they are
//! not meant to be tuned. Only the body and heading font sizes are
//! configurable; see [`StyleRegistry::for_sizes`].

use std::borrow::Cow;
use std::sync::LazyLock;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const fn rgb(hex: u32) -> Self {
        Self(hex & 0x00ff_ffff)
    }

    /// `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.0)
    }
}

pub const TEXT_COLOR: Color = Color::rgb(0x24292f);
pub const QUOTE_COLOR: Color = Color::rgb(0x656d76);
pub const CODE_BACKGROUND: Color = Color::rgb(0xf6f8fa);
pub const BORDER_COLOR: Color = Color::rgb(0xd0d7de);
pub const WHITE: Color = Color::rgb(0xffffff);

/// Vertical gap inserted after every table.
pub const TABLE_GAP_AFTER: f64 = 20.0;

/// Extra vertical gap placed in front of a horizontal rule.
pub const RULE_SPACER: f64 = 32.0;

pub const DEFAULT_BODY_SIZE: f64 = 16.0;
pub const DEFAULT_HEADING_SIZE: f64 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    Courier,
}

impl Font {
    pub fn is_bold(self) -> bool {
        matches!(self, Font::HelveticaBold)
    }

    pub fn is_monospace(self) -> bool {
        matches!(self, Font::Courier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderSide {
    Top,
    Left,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub width: f64,
    pub color: Color,
    pub side: BorderSide,
}

impl Border {
    const fn all(width: f64) -> Self {
        Self {
            width,
            color: BORDER_COLOR,
            side: BorderSide::All,
        }
    }
}

/// Visual attributes of one element kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleDescriptor {
    pub font: Font,
    pub font_size: f64,
    /// Baseline-to-baseline distance.
    pub leading: f64,
    pub text_color: Color,
    pub background: Option<Color>,
    pub border: Option<Border>,
    /// Gap between the border (or background edge) and the text.
    pub padding: f64,
    pub space_before: f64,
    pub space_after: f64,
    pub left_indent: f64,
}

impl StyleDescriptor {
    const fn text(font: Font, font_size: f64, leading: f64) -> Self {
        Self {
            font,
            font_size,
            leading,
            text_color: TEXT_COLOR,
            background: None,
            border: None,
            padding: 0.0,
            space_before: 0.0,
            space_after: 0.0,
            left_indent: 0.0,
        }
    }

    const fn spaced(mut self, before: f64, after: f64) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }
}

const STYLE_COUNT: usize = 12;

/// Every element kind the registry knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleId {
    H1,
    H2,
    H3,
    H4,
    Normal,
    Code,
    InlineCode,
    List,
    Quote,
    Rule,
    TableHeader,
    TableBody,
}

impl StyleId {
    pub const ALL: [StyleId; STYLE_COUNT] = [
        StyleId::H1,
        StyleId::H2,
        StyleId::H3,
        StyleId::H4,
        StyleId::Normal,
        StyleId::Code,
        StyleId::InlineCode,
        StyleId::List,
        StyleId::Quote,
        StyleId::Rule,
        StyleId::TableHeader,
        StyleId::TableBody,
    ];

    /// Heading style for a level; levels past 4 use the H4 style.
    pub fn heading(level: u8) -> Self {
        match level {
            0 | 1 => StyleId::H1,
            2 => StyleId::H2,
            3 => StyleId::H3,
            _ => StyleId::H4,
        }
    }

    pub fn is_table(self) -> bool {
        matches!(self, StyleId::TableHeader | StyleId::TableBody)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Immutable lookup table from [`StyleId`] to [`StyleDescriptor`].
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRegistry {
    styles: [StyleDescriptor; STYLE_COUNT],
}

static REFERENCE: LazyLock<StyleRegistry> =
    LazyLock::new(|| StyleRegistry::build(DEFAULT_BODY_SIZE, DEFAULT_HEADING_SIZE));

impl StyleRegistry {
    /// The reference theme. Built once on first use and shared by every
    /// conversion afterwards.
    pub fn reference() -> &'static StyleRegistry {
        &REFERENCE
    }

    /// The registry for the given body and heading sizes. Returns the shared
    /// reference theme when both are at their defaults.
    pub fn for_sizes(body_size: f64, heading_size: f64) -> Cow<'static, StyleRegistry> {
        if body_size == DEFAULT_BODY_SIZE && heading_size == DEFAULT_HEADING_SIZE {
            Cow::Borrowed(Self::reference())
        } else {
            Cow::Owned(Self::build(body_size, heading_size))
        }
    }

    /// Descriptor for `id`. For table styles `position` is the row index:
    /// row 0 is the header, body rows alternate backgrounds starting with
    /// white. Other kinds ignore `position`.
    pub fn style_for(&self, id: StyleId, position: usize) -> StyleDescriptor {
        match id {
            StyleId::TableHeader | StyleId::TableBody if position == 0 => {
                self.get(StyleId::TableHeader)
            }
            StyleId::TableHeader | StyleId::TableBody => {
                let mut body = self.get(StyleId::TableBody);
                body.background = Some(if position % 2 == 1 {
                    WHITE
                } else {
                    CODE_BACKGROUND
                });
                body
            }
            _ => self.get(id),
        }
    }

    pub fn get(&self, id: StyleId) -> StyleDescriptor {
        self.styles[id.index()]
    }

    fn build(body_size: f64, heading_size: f64) -> Self {
        let h = heading_size / DEFAULT_HEADING_SIZE;
        let b = body_size / DEFAULT_BODY_SIZE;

        let heading = |size: f64, leading: f64, before: f64, after: f64| {
            StyleDescriptor::text(Font::HelveticaBold, size * h, leading * h).spaced(before, after)
        };
        let body = StyleDescriptor::text(Font::Helvetica, body_size, 24.0 * b);

        let normal = body.spaced(0.0, 12.0);

        let code = StyleDescriptor {
            background: Some(CODE_BACKGROUND),
            border: Some(Border::all(1.0)),
            padding: 20.0,
            ..StyleDescriptor::text(Font::Courier, 14.0, 18.0).spaced(20.0, 20.0)
        };

        let inline_code = StyleDescriptor {
            background: Some(CODE_BACKGROUND),
            border: Some(Border::all(0.5)),
            padding: 6.0,
            ..StyleDescriptor::text(Font::Courier, 14.0, 18.0)
        };

        let list = StyleDescriptor {
            left_indent: 24.0,
            ..body.spaced(6.0, 6.0)
        };

        let quote = StyleDescriptor {
            text_color: QUOTE_COLOR,
            left_indent: 24.0,
            padding: 16.0,
            border: Some(Border {
                width: 4.0,
                color: BORDER_COLOR,
                side: BorderSide::Left,
            }),
            ..body.spaced(12.0, 12.0)
        };

        let rule = StyleDescriptor {
            leading: 1.0,
            border: Some(Border {
                width: 1.0,
                color: BORDER_COLOR,
                side: BorderSide::Top,
            }),
            ..body.spaced(32.0, 32.0)
        };

        let table_header = StyleDescriptor {
            background: Some(CODE_BACKGROUND),
            border: Some(Border::all(1.0)),
            padding: 12.0,
            ..StyleDescriptor::text(Font::HelveticaBold, 14.0, 14.0 * 1.2)
        };

        let table_body = StyleDescriptor {
            font: Font::Helvetica,
            background: Some(WHITE),
            ..table_header
        };

        Self {
            styles: [
                heading(32.0, 38.0, 40.0, 24.0),
                heading(24.0, 28.0, 32.0, 20.0),
                heading(20.0, 24.0, 28.0, 16.0),
                heading(18.0, 22.0, 24.0, 14.0),
                normal,
                code,
                inline_code,
                list,
                quote,
                rule,
                table_header,
                table_body,
            ],
        }
    }
}

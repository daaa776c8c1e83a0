use std::fs;
use std::path::Path;

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use super::{Canvas, FontStyle};
use crate::error::RenderError;

pub const PAGE_WIDTH_CM: f32 = 21.0;
pub const PAGE_HEIGHT_CM: f32 = 29.7;

const POINTS_PER_CM: f32 = 72.0 / 2.54;

const CATALOG_ID: Ref = Ref::new(1);
const PAGE_TREE_ID: Ref = Ref::new(2);
const PAGE_ID: Ref = Ref::new(3);
const CONTENT_ID: Ref = Ref::new(4);

const FONTS: [FontStyle; 3] = [FontStyle::Normal, FontStyle::Bold, FontStyle::Italic];

impl FontStyle {
    fn resource_name(self) -> Name<'static> {
        match self {
            FontStyle::Normal => Name(b"F1"),
            FontStyle::Bold => Name(b"F2"),
            FontStyle::Italic => Name(b"F3"),
        }
    }

    fn base_font(self) -> Name<'static> {
        match self {
            FontStyle::Normal => Name(b"Helvetica"),
            FontStyle::Bold => Name(b"Helvetica-Bold"),
            FontStyle::Italic => Name(b"Helvetica-Oblique"),
        }
    }

    fn font_id(self) -> Ref {
        match self {
            FontStyle::Normal => Ref::new(5),
            FontStyle::Bold => Ref::new(6),
            FontStyle::Italic => Ref::new(7),
        }
    }
}

/// Single A4 page drawn with the standard Helvetica faces.
///
/// The output carries no creation date or document ID, so the same drawing
/// calls always produce the same bytes.
pub struct PdfCanvas {
    content: Content,
    font_size: f32,
    style: FontStyle,
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfCanvas {
    pub fn new() -> Self {
        Self {
            content: Content::new(),
            font_size: 16.0,
            style: FontStyle::Normal,
        }
    }

    /// Serialises the page into PDF bytes.
    pub fn finish(self) -> Vec<u8> {
        let mut pdf = Pdf::new();
        pdf.catalog(CATALOG_ID).pages(PAGE_TREE_ID);
        pdf.pages(PAGE_TREE_ID).kids([PAGE_ID]).count(1);

        let mut page = pdf.page(PAGE_ID);
        page.media_box(Rect::new(
            0.0,
            0.0,
            PAGE_WIDTH_CM * POINTS_PER_CM,
            PAGE_HEIGHT_CM * POINTS_PER_CM,
        ));
        page.parent(PAGE_TREE_ID);
        page.contents(CONTENT_ID);
        {
            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            for style in FONTS {
                fonts.pair(style.resource_name(), style.font_id());
            }
        }
        page.finish();

        for style in FONTS {
            pdf.type1_font(style.font_id())
                .base_font(style.base_font())
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        pdf.stream(CONTENT_ID, &self.content.finish());
        pdf.finish()
    }

    /// Converts top-left centimetres to PDF user space (bottom-left points).
    fn point(x: f32, y: f32) -> (f32, f32) {
        (x * POINTS_PER_CM, (PAGE_HEIGHT_CM - y) * POINTS_PER_CM)
    }
}

impl Canvas for PdfCanvas {
    fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    fn set_font_style(&mut self, style: FontStyle) {
        self.style = style;
    }

    fn text(&mut self, text: &str, x: f32, y: f32) {
        let (px, py) = Self::point(x, y);
        let encoded = win_ansi(text);
        self.content.begin_text();
        self.content.set_font(self.style.resource_name(), self.font_size);
        self.content.next_line(px, py);
        self.content.show(Str(&encoded));
        self.content.end_text();
    }

    fn set_line_width(&mut self, width: f32) {
        self.content.set_line_width(width * POINTS_PER_CM);
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let (ax, ay) = Self::point(x1, y1);
        let (bx, by) = Self::point(x2, y2);
        self.content.move_to(ax, ay);
        self.content.line_to(bx, by);
        self.content.stroke();
    }

    fn save(self, path: &Path) -> Result<(), RenderError> {
        fs::write(path, self.finish()).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Latin-1 characters map straight onto WinAnsi, as do the typographic
/// characters WinAnsi keeps in 0x80..=0x9F. Anything else becomes '?'.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => win_ansi_extra(c).unwrap_or(b'?'),
        })
        .collect()
}

fn win_ansi_extra(c: char) -> Option<u8> {
    let byte = match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

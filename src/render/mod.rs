//! Fixed-layout invoice page.
//!
//! Every block is placed at absolute coordinates, in centimetres measured
//! from the top-left corner of an A4 page. There is no flow layout and no
//! second page.

mod pdf;

pub use pdf::{PAGE_HEIGHT_CM, PAGE_WIDTH_CM, PdfCanvas};

use std::path::{Path, PathBuf};

use tracing::info;

use crate::currency::format_usd;
use crate::error::RenderError;
use crate::model::{Invoice, TAX_RATE_PERCENT};

pub const ARTIFACT_EXTENSION: &str = "pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

/// The page-drawing capability the renderer needs.
pub trait Canvas {
    fn set_font_size(&mut self, size: f32);
    fn set_font_style(&mut self, style: FontStyle);
    /// Places `text` with its baseline starting at (`x`, `y`).
    fn text(&mut self, text: &str, x: f32, y: f32);
    fn set_line_width(&mut self, width: f32);
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);
    /// Serialises the page to `path`, replacing any existing file.
    fn save(self, path: &Path) -> Result<(), RenderError>
    where
        Self: Sized;
}

/// `invoice-{number}.pdf`
pub fn artifact_file_name(invoice: &Invoice) -> String {
    format!("invoice-{}.{}", invoice.number_label(), ARTIFACT_EXTENSION)
}

/// Draws the whole page.
pub fn render<C: Canvas>(invoice: &Invoice, canvas: &mut C) {
    draw_name_and_address(canvas, invoice);
    draw_title(canvas, invoice);
    draw_bill_to(canvas, invoice);
    draw_balance_due(canvas, invoice);
    draw_item_header(canvas);
    draw_item_row(canvas, invoice);
    draw_totals(canvas, invoice);
    draw_notes_and_terms(canvas, invoice);
}

/// Renders `invoice` to `dir/invoice-{number}.pdf` and returns that path.
pub fn render_to_file(invoice: &Invoice, dir: &Path) -> Result<PathBuf, RenderError> {
    let path = dir.join(artifact_file_name(invoice));

    let mut canvas = PdfCanvas::new();
    render(invoice, &mut canvas);
    canvas.save(&path)?;

    info!(path = %path.display(), "invoice written");
    Ok(path)
}

fn draw_name_and_address<C: Canvas>(canvas: &mut C, invoice: &Invoice) {
    let from = invoice.bill_from();
    canvas.set_font_size(10.0);
    canvas.set_font_style(FontStyle::Bold);
    canvas.text(&from.name, 1.0, 1.5);
    canvas.set_font_style(FontStyle::Normal);
    canvas.text(&from.address, 1.0, 2.0);
    canvas.text(&from.state, 1.0, 2.5);
}

fn draw_title<C: Canvas>(canvas: &mut C, invoice: &Invoice) {
    canvas.set_font_size(30.0);
    canvas.set_font_style(FontStyle::Bold);
    canvas.text("INVOICE", 15.0, 2.0);
    canvas.set_font_size(10.0);
    canvas.set_font_style(FontStyle::Normal);
    canvas.text(&format!("Invoice #: {}", invoice.number_label()), 15.0, 2.5);
    canvas.text(&format!("Date: {}", invoice.date()), 15.0, 3.0);
}

fn draw_bill_to<C: Canvas>(canvas: &mut C, invoice: &Invoice) {
    let to = invoice.bill_to();
    canvas.set_font_size(10.0);
    canvas.set_font_style(FontStyle::Normal);
    canvas.text("Bill To:", 1.0, 5.0);
    canvas.set_font_style(FontStyle::Bold);
    canvas.text(&to.name, 1.0, 5.75);
    canvas.text(&to.address, 1.0, 6.1);
    canvas.text(&to.state, 1.0, 6.45);
}

fn draw_balance_due<C: Canvas>(canvas: &mut C, invoice: &Invoice) {
    canvas.set_font_size(12.0);
    canvas.set_font_style(FontStyle::Bold);
    canvas.text("Balance Due:", 12.0, 6.0);
    canvas.text(&format_usd(invoice.amount()), 15.0, 6.0);
}

fn draw_item_header<C: Canvas>(canvas: &mut C) {
    canvas.set_font_size(10.0);
    canvas.set_font_style(FontStyle::Normal);
    canvas.text("Item", 1.0, 9.0);
    canvas.text("Quantity", 10.0, 9.0);
    canvas.text("Rate", 13.0, 9.0);
    canvas.text("Amount", 16.0, 9.0);
    canvas.set_line_width(0.05);
    canvas.line(1.0, 9.2, 18.0, 9.2);
}

fn draw_item_row<C: Canvas>(canvas: &mut C, invoice: &Invoice) {
    let item = invoice.item();
    canvas.set_font_size(10.0);
    canvas.set_font_style(FontStyle::Normal);
    canvas.text(&item.description, 1.0, 10.0);
    canvas.text(&item.quantity.to_string(), 10.0, 10.0);
    canvas.text(&format_usd(item.rate), 13.0, 10.0);
    canvas.text(&format_usd(item.amount), 16.0, 10.0);
}

fn draw_totals<C: Canvas>(canvas: &mut C, invoice: &Invoice) {
    let amount = format_usd(invoice.amount());
    canvas.set_font_size(10.0);
    canvas.set_font_style(FontStyle::Italic);
    canvas.text("Subtotal: ", 12.0, 12.0);
    canvas.text(&format!("Tax ({TAX_RATE_PERCENT}%): "), 12.0, 12.5);
    canvas.text("Total: ", 12.0, 13.0);
    canvas.set_font_style(FontStyle::Normal);
    canvas.text(&amount, 16.0, 12.0);
    canvas.text(&format!("{} ", format_usd(0.0)), 16.0, 12.5);
    canvas.text(&amount, 16.0, 13.0);
}

fn draw_notes_and_terms<C: Canvas>(canvas: &mut C, invoice: &Invoice) {
    canvas.set_font_size(10.0);
    canvas.set_font_style(FontStyle::Bold);
    canvas.text("Notes:", 1.0, 15.0);
    canvas.text("Terms:", 1.0, 18.0);
    canvas.set_font_style(FontStyle::Normal);
    canvas.text(invoice.notes(), 1.0, 15.5);
    canvas.text(invoice.terms(), 1.0, 18.5);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BillingConfig;
    use chrono::NaiveDate;

    /// Records the text the renderer places, with the font in effect.
    #[derive(Default)]
    struct RecordingCanvas {
        size: f32,
        style: Option<FontStyle>,
        texts: Vec<(String, f32, f32, f32, FontStyle)>,
        lines: Vec<(f32, f32, f32, f32, f32)>,
        line_width: f32,
    }

    impl RecordingCanvas {
        fn at(&self, text: &str) -> (f32, f32, f32, FontStyle) {
            let (_, x, y, size, style) = self
                .texts
                .iter()
                .find(|t| t.0 == text)
                .unwrap_or_else(|| panic!("{text:?} was not drawn"));
            (*x, *y, *size, *style)
        }
    }

    impl Canvas for RecordingCanvas {
        fn set_font_size(&mut self, size: f32) {
            self.size = size;
        }
        fn set_font_style(&mut self, style: FontStyle) {
            self.style = Some(style);
        }
        fn text(&mut self, text: &str, x: f32, y: f32) {
            let style = self.style.expect("font style set before drawing");
            self.texts.push((text.to_string(), x, y, self.size, style));
        }
        fn set_line_width(&mut self, width: f32) {
            self.line_width = width;
        }
        fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
            self.lines.push((x1, y1, x2, y2, self.line_width));
        }
        fn save(self, _path: &Path) -> Result<(), RenderError> {
            Ok(())
        }
    }

    fn invoice(number: Option<&str>, adjust: Option<f64>) -> Invoice {
        let billing = BillingConfig {
            name: "Ada Lovelace".into(),
            address: "12 Analytical Row".into(),
            state: "London, UK".into(),
            company: "Engine Works Ltd".into(),
            client_address: "1 Difference St".into(),
            client_state: "Cambridge, UK".into(),
            rate: 50.0,
        };
        Invoice::build(
            NaiveDate::from_ymd_opt(2024, 1, 19).unwrap(),
            number.map(str::to_string),
            adjust,
            &billing,
        )
    }

    fn drawn(invoice: &Invoice) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::default();
        render(invoice, &mut canvas);
        canvas
    }

    #[test]
    fn header_blocks_are_placed() {
        let canvas = drawn(&invoice(Some("42"), None));

        assert_eq!(canvas.at("Ada Lovelace"), (1.0, 1.5, 10.0, FontStyle::Bold));
        assert_eq!(canvas.at("London, UK"), (1.0, 2.5, 10.0, FontStyle::Normal));
        assert_eq!(canvas.at("INVOICE"), (15.0, 2.0, 30.0, FontStyle::Bold));
        assert_eq!(canvas.at("Invoice #: 42"), (15.0, 2.5, 10.0, FontStyle::Normal));
        assert_eq!(canvas.at("Date: Jan 19, 2024"), (15.0, 3.0, 10.0, FontStyle::Normal));
        assert_eq!(canvas.at("Bill To:"), (1.0, 5.0, 10.0, FontStyle::Normal));
        assert_eq!(canvas.at("Engine Works Ltd"), (1.0, 5.75, 10.0, FontStyle::Bold));
        assert_eq!(canvas.at("Cambridge, UK"), (1.0, 6.45, 10.0, FontStyle::Bold));
        assert_eq!(canvas.at("Balance Due:"), (12.0, 6.0, 12.0, FontStyle::Bold));
    }

    #[test]
    fn balance_and_totals_use_adjusted_amount() {
        let canvas = drawn(&invoice(Some("42"), Some(200.0)));

        let amounts: Vec<_> = canvas
            .texts
            .iter()
            .filter(|t| t.0 == "$1,800.00")
            .map(|t| (t.1, t.2))
            .collect();
        assert_eq!(amounts, vec![(15.0, 6.0), (16.0, 10.0), (16.0, 12.0), (16.0, 13.0)]);

        assert_eq!(canvas.at("Tax (0%): "), (12.0, 12.5, 10.0, FontStyle::Italic));
        assert_eq!(canvas.at("$0.00 "), (16.0, 12.5, 10.0, FontStyle::Normal));
        assert_eq!(canvas.at("$50.00"), (13.0, 10.0, 10.0, FontStyle::Normal));
        assert_eq!(canvas.at("40"), (10.0, 10.0, 10.0, FontStyle::Normal));
    }

    #[test]
    fn item_header_has_rule_below() {
        let canvas = drawn(&invoice(Some("42"), None));

        for (label, x) in [("Item", 1.0), ("Quantity", 10.0), ("Rate", 13.0), ("Amount", 16.0)] {
            assert_eq!(canvas.at(label), (x, 9.0, 10.0, FontStyle::Normal));
        }
        assert_eq!(canvas.lines, vec![(1.0, 9.2, 18.0, 9.2, 0.05)]);
    }

    #[test]
    fn notes_and_terms_at_bottom() {
        let canvas = drawn(&invoice(Some("42"), None));

        assert_eq!(canvas.at("Notes:"), (1.0, 15.0, 10.0, FontStyle::Bold));
        assert_eq!(
            canvas.at("Hours worked Jan 04, 2024-Jan 15, 2024"),
            (1.0, 15.5, 10.0, FontStyle::Normal)
        );
        assert_eq!(canvas.at("Terms:"), (1.0, 18.0, 10.0, FontStyle::Bold));
        assert_eq!(
            canvas.at("Payment for direct deposit; to be paid within 2 weeks."),
            (1.0, 18.5, 10.0, FontStyle::Normal)
        );
    }

    #[test]
    fn missing_number_prints_literal() {
        let invoice = invoice(None, None);
        let canvas = drawn(&invoice);

        assert_eq!(canvas.at("Invoice #: undefined").0, 15.0);
        assert_eq!(artifact_file_name(&invoice), "invoice-undefined.pdf");
    }

    #[test]
    fn everything_stays_on_one_page() {
        let canvas = drawn(&invoice(Some("42"), None));
        for (text, x, y, _, _) in &canvas.texts {
            assert!(*x >= 0.0 && *x < PAGE_WIDTH_CM, "{text} x={x}");
            assert!(*y >= 0.0 && *y < PAGE_HEIGHT_CM, "{text} y={y}");
        }
    }
}

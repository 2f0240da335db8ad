//! Printable PDF summary of an order.
//!
//! The layout is deliberately simple: a title block, one block per review
//! section with bold labels and wrapped values, the palette drawn as
//! filled swatches, and a page counter in the footer. Only the standard
//! Helvetica fonts are referenced so nothing has to be embedded.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::palette::hex_to_rgb;
use crate::review::ReviewSummary;

// ---------------------------------------------------------------------------
// Page geometry (PDF points)
// ---------------------------------------------------------------------------

/// A4 width.
pub const PAGE_WIDTH: f32 = 595.0;
/// A4 height.
pub const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const FOOTER_Y: f32 = 30.0;
const VALUE_X: f32 = MARGIN + 130.0;

const TITLE_SIZE: f32 = 20.0;
const SECTION_SIZE: f32 = 13.0;
const BODY_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 8.0;
const LINE_GAP: f32 = 4.0;

const SWATCH_SIZE: f32 = 28.0;
const SWATCH_GAP: f32 = 8.0;

/// Rough Helvetica average glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

type Rgb = (f32, f32, f32);

const ACCENT: Rgb = (0.71, 0.28, 0.42);
const TEXT: Rgb = (0.15, 0.15, 0.15);
const MUTED: Rgb = (0.45, 0.45, 0.45);
const RULE: Rgb = (0.85, 0.80, 0.82);

#[derive(Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

/// Escape text for a PDF literal string.
///
/// Latin-1 characters are written as octal escapes (WinAnsi agrees with
/// Latin-1 there); anything else becomes `?`.
pub fn escape_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            '\u{a0}'..='\u{ff}' => out.push_str(&format!("\\{:03o}", ch as u32)),
            _ => out.push('?'),
        }
    }
    out
}

/// Greedy word wrap to at most `max_chars` per line. Existing line breaks
/// are kept; words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let word: String = word.into_iter().collect();
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn chars_for_width(width: f32, size: f32) -> usize {
    (width / (size * AVG_GLYPH_WIDTH)).floor() as usize
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

struct PageLayout {
    pages: Vec<String>,
    y: f32,
}

impl PageLayout {
    fn new() -> Self {
        Self {
            pages: vec![String::new()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn ops(&mut self) -> &mut String {
        // `pages` always holds at least one page.
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Start a new page when fewer than `height` points remain.
    fn reserve(&mut self, height: f32) {
        if self.y - height < MARGIN + FOOTER_Y {
            self.pages.push(String::new());
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn text(&mut self, x: f32, font: Font, size: f32, color: Rgb, text: &str) {
        let y = self.y;
        let op = format!(
            "BT /{} {size:.1} Tf {:.3} {:.3} {:.3} rg {x:.2} {y:.2} Td ({}) Tj ET\n",
            font.resource(),
            color.0,
            color.1,
            color.2,
            escape_pdf_text(text)
        );
        self.ops().push_str(&op);
    }

    fn rule(&mut self) {
        let y = self.y;
        let op = format!(
            "{:.3} {:.3} {:.3} RG 0.5 w {MARGIN:.2} {y:.2} m {:.2} {y:.2} l S\n",
            RULE.0,
            RULE.1,
            RULE.2,
            PAGE_WIDTH - MARGIN
        );
        self.ops().push_str(&op);
    }

    fn swatch(&mut self, x: f32, color: Rgb) {
        let y = self.y - SWATCH_SIZE;
        let op = format!(
            "{:.3} {:.3} {:.3} rg {x:.2} {y:.2} {SWATCH_SIZE:.2} {SWATCH_SIZE:.2} re f\n\
             {:.3} {:.3} {:.3} RG 0.5 w {x:.2} {y:.2} {SWATCH_SIZE:.2} {SWATCH_SIZE:.2} re S\n",
            color.0, color.1, color.2, RULE.0, RULE.1, RULE.2
        );
        self.ops().push_str(&op);
    }
}

fn lay_out(summary: &ReviewSummary) -> Vec<String> {
    let mut layout = PageLayout::new();

    layout.y -= TITLE_SIZE;
    layout.text(MARGIN, Font::Bold, TITLE_SIZE, ACCENT, "Invitation Request");
    layout.y -= BODY_SIZE + 2.0 * LINE_GAP;
    if !summary.customer_name.is_empty() {
        let subtitle = format!("Prepared for {}", summary.customer_name);
        layout.text(MARGIN, Font::Regular, BODY_SIZE + 1.0, MUTED, &subtitle);
    }
    layout.y -= 2.0 * SECTION_SIZE;

    let value_chars = chars_for_width(PAGE_WIDTH - MARGIN - VALUE_X, BODY_SIZE);
    let label_chars = chars_for_width(VALUE_X - MARGIN - 8.0, BODY_SIZE);
    let line_height = BODY_SIZE + LINE_GAP;

    for section in &summary.sections {
        layout.reserve(SECTION_SIZE + 2.0 * line_height);
        layout.text(MARGIN, Font::Bold, SECTION_SIZE, ACCENT, &section.title);
        layout.y -= LINE_GAP;
        layout.rule();
        layout.y -= line_height + LINE_GAP;

        for row in &section.rows {
            let label_lines = wrap_text(&row.label, label_chars);
            let value_lines = wrap_text(&row.value, value_chars);
            let rows = label_lines.len().max(value_lines.len());
            for i in 0..rows {
                layout.reserve(line_height);
                if let Some(label) = label_lines.get(i) {
                    layout.text(MARGIN, Font::Bold, BODY_SIZE, TEXT, label);
                }
                if let Some(value) = value_lines.get(i) {
                    layout.text(VALUE_X, Font::Regular, BODY_SIZE, TEXT, value);
                }
                layout.y -= line_height;
            }
        }

        if section.title == "Design" && !summary.palette_swatches.is_empty() {
            layout.reserve(SWATCH_SIZE + line_height);
            let mut x = VALUE_X;
            for hex in &summary.palette_swatches {
                if let Ok((r, g, b)) = hex_to_rgb(hex) {
                    let color = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
                    layout.swatch(x, color);
                    x += SWATCH_SIZE + SWATCH_GAP;
                }
            }
            layout.y -= SWATCH_SIZE + line_height;
        }

        layout.y -= SECTION_SIZE;
    }

    let total = layout.pages.len();
    for (i, page) in layout.pages.iter_mut().enumerate() {
        let footer = format!("Page {} of {total}", i + 1);
        page.push_str(&format!(
            "BT /F1 {FOOTER_SIZE:.1} Tf {:.3} {:.3} {:.3} rg {MARGIN:.2} {FOOTER_Y:.2} Td ({}) Tj ET\n",
            MUTED.0,
            MUTED.1,
            MUTED.2,
            escape_pdf_text(&footer)
        ));
    }
    layout.pages
}

// ---------------------------------------------------------------------------
// Serialisation
// ---------------------------------------------------------------------------

struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    /// Append object number `offsets.len() + 1`.
    fn object(&mut self, body: &str) {
        self.offsets.push(self.buf.len());
        let id = self.offsets.len();
        self.buf
            .extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn stream(&mut self, content: &str) {
        let body = format!(
            "<< /Length {} >>\nstream\n{content}endstream",
            content.len()
        );
        self.object(&body);
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let count = self.offsets.len() + 1;
        let mut xref = format!("xref\n0 {count}\n0000000000 65535 f \n");
        for offset in &self.offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {count} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        ));
        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}

/// Render the review summary as a PDF document.
pub fn render_summary_pdf(summary: &ReviewSummary) -> Vec<u8> {
    let pages = lay_out(summary);

    // 1 catalog, 2 page tree, 3-4 fonts, then a (page, content) pair per page.
    let first_page_id = 5;
    let kids = (0..pages.len())
        .map(|i| format!("{} 0 R", first_page_id + 2 * i))
        .collect::<Vec<_>>()
        .join(" ");

    let mut writer = PdfWriter::new();
    writer.object("<< /Type /Catalog /Pages 2 0 R >>");
    writer.object(&format!(
        "<< /Type /Pages /Kids [{kids}] /Count {} >>",
        pages.len()
    ));
    writer.object("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>");
    writer.object(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
    );
    for (i, content) in pages.iter().enumerate() {
        let content_id = first_page_id + 2 * i + 1;
        writer.object(&format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {content_id} 0 R >>"
        ));
        writer.stream(content);
    }
    writer.finish()
}

/// Wrap PDF bytes in a `data:` URI.
pub fn to_data_uri(pdf: &[u8]) -> String {
    format!("data:application/pdf;base64,{}", STANDARD.encode(pdf))
}

/// Attachment file name for a customer, e.g. `invitation-request-ana-lopez.pdf`.
pub fn attachment_file_name(customer_name: &str) -> String {
    let slug = customer_name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "invitation-request.pdf".to_string()
    } else {
        format!("invitation-request-{slug}.pdf")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::{ReviewRow, ReviewSection};

    fn summary(rows: usize) -> ReviewSummary {
        ReviewSummary {
            customer_name: "Ana".into(),
            sections: vec![
                ReviewSection {
                    title: "Event".into(),
                    rows: (0..rows)
                        .map(|i| ReviewRow {
                            label: format!("Row {i}"),
                            value: "Garden party (outdoors)".into(),
                        })
                        .collect(),
                },
                ReviewSection {
                    title: "Design".into(),
                    rows: vec![],
                },
            ],
            palette_swatches: vec!["#aabbcc".into(), "#112233".into()],
            total_display: "$150".into(),
        }
    }

    fn as_text(pdf: &[u8]) -> String {
        String::from_utf8_lossy(pdf).into_owned()
    }

    #[test]
    fn produces_pdf_envelope() {
        let pdf = render_summary_pdf(&summary(3));
        let text = as_text(&pdf);
        assert!(pdf.starts_with(b"%PDF-1.4\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("(Invitation Request) Tj"));
        assert!(text.contains("(Garden party \\(outdoors\\)) Tj"));
        assert!(text.contains("(Page 1 of 1) Tj"));
    }

    #[test]
    fn draws_palette_swatches() {
        let text = as_text(&render_summary_pdf(&summary(1)));
        assert!(text.contains("0.667 0.733 0.800 rg"));
        assert!(text.contains("0.067 0.133 0.200 rg"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let pdf = render_summary_pdf(&summary(2));
        let text = as_text(&pdf);
        let start: usize = text
            .rsplit("startxref\n")
            .next()
            .and_then(|s| s.lines().next())
            .unwrap()
            .parse()
            .unwrap();
        // Everything after the binary header comment is ASCII.
        let tail = std::str::from_utf8(&pdf[start..]).unwrap();
        assert!(tail.starts_with("xref\n"));
        let entries: Vec<usize> = tail
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();
        assert_eq!(entries.len(), 6);
        for (i, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", i + 1);
            assert!(pdf[*offset..].starts_with(expected.as_bytes()));
        }
    }

    #[test]
    fn long_summaries_paginate() {
        let text = as_text(&render_summary_pdf(&summary(120)));
        assert!(text.contains("/Count 3"));
        assert!(text.contains("(Page 3 of 3) Tj"));
    }

    #[test]
    fn escapes_special_and_non_latin_characters() {
        assert_eq!(escape_pdf_text("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(escape_pdf_text("café"), "caf\\351");
        assert_eq!(escape_pdf_text("🎉 party"), "? party");
    }

    #[test]
    fn wraps_words_and_long_tokens() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("first\nsecond", 40), vec!["first", "second"]);
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn data_uri_prefix() {
        let uri = to_data_uri(b"%PDF");
        assert_eq!(uri, "data:application/pdf;base64,JVBERg==");
    }

    #[test]
    fn attachment_names_are_slugged() {
        assert_eq!(
            attachment_file_name("Ana  López"),
            "invitation-request-ana-l-pez.pdf"
        );
        assert_eq!(attachment_file_name("  "), "invitation-request.pdf");
    }
}

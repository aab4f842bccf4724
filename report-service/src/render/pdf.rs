//! Serialization of a rendered document to PDF bytes.
//!
//! Text-only output over the base-14 Helvetica faces, so no font files
//! ship with the service. Object numbering, stream contents, and string
//! encoding depend solely on the input document, which keeps the byte
//! output reproducible for identical renders.

use crate::error::ReportError;
use crate::render::layout::{FontStyle, PageContent, RenderedDocument};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

const FONT_REGULAR: Name<'static> = Name(b"F1");
const FONT_BOLD: Name<'static> = Name(b"F2");

const RULE_WIDTH: f32 = 0.75;

/// Serialize `doc` to a complete PDF, fully buffered.
pub fn export(doc: &RenderedDocument) -> Result<Vec<u8>, ReportError> {
    if doc.page_count() == 0 {
        return Err(ReportError::ExportFailure(
            "rendered document has no pages".to_string(),
        ));
    }

    let mut pdf = Pdf::new();

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let regular_id = Ref::new(3);
    let bold_id = Ref::new(4);

    let page_ids: Vec<Ref> = (0..doc.page_count())
        .map(|i| Ref::new(5 + 2 * i as i32))
        .collect();
    let content_ids: Vec<Ref> = (0..doc.page_count())
        .map(|i| Ref::new(6 + 2 * i as i32))
        .collect();

    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    pdf.type1_font(regular_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    for (i, page) in doc.pages().iter().enumerate() {
        {
            let mut writer = pdf.page(page_ids[i]);
            writer
                .media_box(Rect::new(0.0, 0.0, doc.page_width, doc.page_height))
                .parent(page_tree_id)
                .contents(content_ids[i]);
            writer
                .resources()
                .fonts()
                .pair(FONT_REGULAR, regular_id)
                .pair(FONT_BOLD, bold_id);
        }
        let content = page_content(page);
        pdf.stream(content_ids[i], &content.finish());
    }

    Ok(pdf.finish())
}

fn page_content(page: &PageContent) -> Content {
    let mut content = Content::new();

    for rule in &page.rules {
        content.set_line_width(RULE_WIDTH);
        content.move_to(rule.x1, rule.y);
        content.line_to(rule.x2, rule.y);
        content.stroke();
    }

    for run in &page.runs {
        let font = match run.style {
            FontStyle::Regular => FONT_REGULAR,
            FontStyle::Bold => FONT_BOLD,
        };
        content.begin_text();
        content.set_font(font, run.size);
        content.next_line(run.x, run.y);
        content.show(Str(&encode_win_ansi(&run.text)));
        content.end_text();
    }

    content
}

/// Encode text for the WinAnsi (Windows-1252) simple-font encoding.
///
/// Latin-1 maps through directly; the handful of CP1252 punctuation
/// characters that show up in real names and program titles are
/// translated, everything else degrades to '?'.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20ac}' => 0x80, // euro sign
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201c}' => 0x93, // left double quote
            '\u{201d}' => 0x94, // right double quote
            '\u{2013}' => 0x96, // en dash
            '\u{2014}' => 0x97, // em dash
            _ => {
                let code = c as u32;
                if code < 0x80 || (0xa0..=0xff).contains(&code) {
                    code as u8
                } else {
                    b'?'
                }
            }
        })
        .collect()
}

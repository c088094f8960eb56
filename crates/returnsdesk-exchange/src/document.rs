//! Client-facing PDF rendering.
//!
//! One A4 page per report: title and render time, a two-column field table
//! with alternating row shading, a signature line and a fixed legal footer.
//! Text uses the standard Helvetica faces with WinAnsi encoding, so no font
//! files are embedded.

use crate::error::ExchangeError;
use chrono::NaiveDateTime;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use returnsdesk_model::{Clock, Report};
use std::sync::Arc;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN_X: f32 = 40.0;
const MARGIN_TOP: f32 = 60.0;
const MARGIN_BOTTOM: f32 = 40.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN_X;
const LABEL_WIDTH: f32 = CONTENT_WIDTH * 0.3;
const CELL_PADDING: f32 = 5.0;
const TABLE_FONT_SIZE: f32 = 10.0;
const TABLE_LINE_HEIGHT: f32 = 13.0;
const MAX_VALUE_LINES: usize = 24;
const SIGNATURE_GAP: f32 = 55.0;
const FOOTER_GAP: f32 = 50.0;
const FOOTER_LINE_HEIGHT: f32 = 12.0;

const TITLE: &str = "DEVOLUCIONES GRUPO ETICALIDAD";
const SIGNATURE_LABEL: &str = "Firma del cliente / representante";
const FOOTER: [&str; 2] = [
    "Documento generado automáticamente por el sistema interno de Grupo Eticalidad.",
    "Prohibida su modificación o distribución sin autorización.",
];

/// Font resource names.
const REGULAR: &str = "F1";
const BOLD: &str = "F2";
const ITALIC: &str = "F3";

/// A rendered PDF ready for delivery.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Suggested file name.
    pub file_name: String,
    /// PDF bytes.
    pub bytes: Vec<u8>,
    /// Number of pages (one per report).
    pub pages: usize,
}

/// Renders reports into a paginated PDF.
pub struct DocumentRenderer {
    clock: Arc<dyn Clock>,
}

impl DocumentRenderer {
    /// Creates a renderer stamping pages with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Renders one page per report, in input order.
    pub fn render(&self, reports: &[Report]) -> Result<RenderedDocument, ExchangeError> {
        if reports.is_empty() {
            return Err(ExchangeError::NothingToRender);
        }
        let now = self.clock.now();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let fonts = dictionary! {
            REGULAR => doc.add_object(font("Helvetica")),
            BOLD => doc.add_object(font("Helvetica-Bold")),
            ITALIC => doc.add_object(font("Helvetica-Oblique")),
        };
        let resources_id = doc.add_object(dictionary! { "Font" => fonts });

        let mut kids: Vec<Object> = Vec::with_capacity(reports.len());
        for report in reports {
            let content = Content {
                operations: page_operations(report, now),
            };
            let encoded = content
                .encode()
                .map_err(|e| ExchangeError::Pdf(format!("failed to encode page: {}", e)))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => reports.len() as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), real(PAGE_WIDTH), real(PAGE_HEIGHT)],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| ExchangeError::Pdf(format!("failed to write document: {}", e)))?;

        Ok(RenderedDocument {
            file_name: document_file_name(reports, now),
            bytes,
            pages: reports.len(),
        })
    }
}

/// `Reporte_{id}.pdf` for one report, `Reportes_{YYYY-MM-DD}.pdf` for several.
pub fn document_file_name(reports: &[Report], now: NaiveDateTime) -> String {
    match reports {
        [single] if single.id.trim().is_empty() => "Reporte_sinID.pdf".to_string(),
        [single] => format!("Reporte_{}.pdf", single.id),
        _ => format!("Reportes_{}.pdf", now.format("%Y-%m-%d")),
    }
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

/// Rows of the field table, in display order.
fn table_rows(report: &Report) -> [(&'static str, &str); 8] {
    [
        ("ID del reporte", report.id.as_str()),
        ("Número de pedido", report.fields.order_number.as_str()),
        ("Cliente", report.fields.client.as_str()),
        ("Marca", report.fields.brand.as_str()),
        ("Pieza", report.fields.part.as_str()),
        ("Motivo de devolución", report.fields.reason.as_str()),
        ("Estado", report.fields.status.as_str()),
        ("Comentario interno", report.fields.comment.as_str()),
    ]
}

fn page_operations(report: &Report, rendered_at: NaiveDateTime) -> Vec<Operation> {
    let mut page = PageWriter::default();
    let mut y = PAGE_HEIGHT - MARGIN_TOP;

    y -= 20.0;
    page.centered_text(BOLD, 20.0, y, TITLE, 0.0);
    y -= 28.0;
    let subheader = format!("Fecha: {}", rendered_at.format("%d/%m/%Y %H:%M:%S"));
    page.centered_text(REGULAR, 11.0, y, &subheader, 0.333);
    y -= 35.0;

    // Header row.
    let header_height = TABLE_LINE_HEIGHT + 2.0 * CELL_PADDING;
    page.fill_rect(MARGIN_X, y - header_height, CONTENT_WIDTH, header_height, 0.0);
    page.text_colored(
        BOLD,
        TABLE_FONT_SIZE,
        MARGIN_X + CELL_PADDING,
        y - CELL_PADDING - TABLE_FONT_SIZE,
        "Campo",
        1.0,
    );
    page.text_colored(
        BOLD,
        TABLE_FONT_SIZE,
        MARGIN_X + LABEL_WIDTH + CELL_PADDING,
        y - CELL_PADDING - TABLE_FONT_SIZE,
        "Valor",
        1.0,
    );
    let table_top = y;
    y -= header_height;

    // Value lines share what is left above the signature and footer.
    let rows = table_rows(report);
    let below_table = SIGNATURE_GAP
        + FOOTER_GAP
        + (FOOTER.len() - 1) as f32 * FOOTER_LINE_HEIGHT
        + MARGIN_BOTTOM;
    let row_space = y - below_table - rows.len() as f32 * 2.0 * CELL_PADDING;
    let mut line_budget = ((row_space / TABLE_LINE_HEIGHT).floor() as usize).max(rows.len());

    let value_chars = chars_fitting(CONTENT_WIDTH - LABEL_WIDTH - 2.0 * CELL_PADDING, TABLE_FONT_SIZE);
    for (idx, (label, value)) in rows.iter().enumerate() {
        let rows_after = rows.len() - idx - 1;
        let allowed = line_budget
            .saturating_sub(rows_after)
            .clamp(1, MAX_VALUE_LINES);
        let lines = wrap(value, value_chars, allowed);
        line_budget = line_budget.saturating_sub(lines.len().max(1));
        let height = lines.len().max(1) as f32 * TABLE_LINE_HEIGHT + 2.0 * CELL_PADDING;
        if idx % 2 == 0 {
            page.fill_rect(MARGIN_X, y - height, CONTENT_WIDTH, height, 0.976);
        }
        page.hline(MARGIN_X, MARGIN_X + CONTENT_WIDTH, y, 0.5);

        let baseline = y - CELL_PADDING - TABLE_FONT_SIZE;
        page.text_colored(REGULAR, TABLE_FONT_SIZE, MARGIN_X + CELL_PADDING, baseline, label, 0.0);
        for (line_idx, line) in lines.iter().enumerate() {
            page.text_colored(
                REGULAR,
                TABLE_FONT_SIZE,
                MARGIN_X + LABEL_WIDTH + CELL_PADDING,
                baseline - line_idx as f32 * TABLE_LINE_HEIGHT,
                line,
                0.0,
            );
        }
        y -= height;
    }

    // Outer border and column divider.
    page.hline(MARGIN_X, MARGIN_X + CONTENT_WIDTH, table_top, 1.0);
    page.hline(MARGIN_X, MARGIN_X + CONTENT_WIDTH, y, 1.0);
    for x in [MARGIN_X, MARGIN_X + LABEL_WIDTH, MARGIN_X + CONTENT_WIDTH] {
        page.vline(x, y, table_top, 0.5);
    }

    y -= SIGNATURE_GAP;
    page.signature_line(MARGIN_X, y, 200.0);
    page.text_colored(REGULAR, 10.0, MARGIN_X, y - 15.0, SIGNATURE_LABEL, 0.0);

    y -= FOOTER_GAP;
    for line in FOOTER {
        page.centered_text(ITALIC, 9.0, y, line, 0.4);
        y -= FOOTER_LINE_HEIGHT;
    }

    page.ops
}

/// Accumulates content-stream operations for one page.
#[derive(Default)]
struct PageWriter {
    ops: Vec<Operation>,
}

impl PageWriter {
    fn text_colored(&mut self, font: &str, size: f32, x: f32, y: f32, text: &str, gray: f32) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new("g", vec![real(gray)]));
        self.ops
            .push(Operation::new("Tf", vec![font.into(), real(size)]));
        self.ops.push(Operation::new("Td", vec![real(x), real(y)]));
        self.ops
            .push(Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn centered_text(&mut self, font: &str, size: f32, y: f32, text: &str, gray: f32) {
        let width = approx_width(text, size);
        let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN_X);
        self.text_colored(font, size, x, y, text, gray);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, gray: f32) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new("g", vec![real(gray)]));
        self.ops
            .push(Operation::new("re", vec![real(x), real(y), real(w), real(h)]));
        self.ops.push(Operation::new("f", vec![]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    fn stroke(&mut self, from: (f32, f32), to: (f32, f32), width: f32, gray: f32) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new("G", vec![real(gray)]));
        self.ops.push(Operation::new("w", vec![real(width)]));
        self.ops
            .push(Operation::new("m", vec![real(from.0), real(from.1)]));
        self.ops.push(Operation::new("l", vec![real(to.0), real(to.1)]));
        self.ops.push(Operation::new("S", vec![]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    fn hline(&mut self, x1: f32, x2: f32, y: f32, width: f32) {
        self.stroke((x1, y), (x2, y), width, 0.8);
    }

    fn vline(&mut self, x: f32, y1: f32, y2: f32, width: f32) {
        self.stroke((x, y1), (x, y2), width, 0.8);
    }

    fn signature_line(&mut self, x: f32, y: f32, length: f32) {
        self.stroke((x, y), (x + length, y), 1.0, 0.0);
    }
}

/// Helvetica averages a little over half an em per character.
fn approx_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.52
}

fn chars_fitting(width: f32, size: f32) -> usize {
    ((width / (size * 0.52)).floor() as usize).max(1)
}

/// Word-wraps `text` to lines of at most `max_chars` characters.
///
/// Explicit line breaks are kept. Words longer than a line are split.
/// Output is capped at `max_lines`, the last kept line ending in `...`.
fn wrap(text: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
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
            let needed = if current.is_empty() {
                word.len()
            } else {
                current.chars().count() + 1 + word.len()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.extend(word);
        }
        lines.push(current);
    }
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            last.push_str("...");
        }
    }
    lines
}

/// Encodes text for a WinAnsi-encoded standard font.
///
/// Latin-1 characters map to themselves; a few common typographic
/// characters map to their WinAnsi slots; anything else becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' | '\r' | '\n' => b' ',
            '€' => 0x80,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            c if (c as u32) >= 0x20 && (c as u32) < 0x7f => c as u8,
            c if (0xa0..=0xff).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

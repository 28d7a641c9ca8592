//! A5 purchase statement (form 01/TNDN) rendered with printpdf.

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{Bill, MAX_ITEMS, MIN_ITEMS};
use crate::utils::format::{format_money, format_unit_price, format_weight, to_whole_units};
use crate::utils::words::amount_in_words;

const PAGE_WIDTH: f32 = 148.0;
const PAGE_HEIGHT: f32 = 210.0;
/// 30pt
const MARGIN: f32 = 10.6;
const PT_TO_MM: f32 = 0.3528;
/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

const TABLE_COLUMNS: [f32; 4] = [22.0, 32.0, 32.0, 40.0];
const TABLE_ROW_HEIGHT: f32 = 7.0;
const SIGNATURE_COLUMN: f32 = 63.0;

const TITLE: &str = "BẢNG KÊ MUA HÀNG HOÁ, DỊCH VỤ CỦA TỔ CHỨC, CÁ NHÂN KHÔNG KINH DOANH KHÔNG CÓ HOÁ ĐƠN, CHỨNG TỪ";

#[derive(Error, Debug)]
pub enum ReceiptError {
    #[error("bill must have between {min} and {max} items, got {got}")]
    ItemCount { min: usize, max: usize, got: usize },

    #[error("bill total cannot be expressed in whole dong")]
    Total,

    #[error("PDF layout failed: {0}")]
    Layout(String),
}

#[derive(Debug, Clone)]
pub struct RenderedReceipt {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ReceiptRenderer {
    company_name: String,
    file_prefix: String,
    font_path: PathBuf,
    bold_font_path: PathBuf,
}

impl ReceiptRenderer {
    pub fn new(
        company_name: impl Into<String>,
        file_prefix: impl Into<String>,
        font_path: impl Into<PathBuf>,
        bold_font_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            file_prefix: file_prefix.into(),
            font_path: font_path.into(),
            bold_font_path: bold_font_path.into(),
        }
    }

    /// `<prefix>_<sellerName>_<YYYYmmddHHMMSS>.pdf`
    pub fn file_name(&self, bill: &Bill) -> String {
        format!(
            "{}_{}_{}.pdf",
            self.file_prefix,
            bill.seller.name,
            bill.timestamp.format("%Y%m%d%H%M%S")
        )
    }

    pub fn render(&self, bill: &Bill) -> Result<RenderedReceipt, ReceiptError> {
        let count = bill.items.len();
        if !(MIN_ITEMS..=MAX_ITEMS).contains(&count) {
            return Err(ReceiptError::ItemCount {
                min: MIN_ITEMS,
                max: MAX_ITEMS,
                got: count,
            });
        }
        let total = bill.total();
        let total_units = to_whole_units(&total).ok_or(ReceiptError::Total)?;

        let (doc, page, layer) =
            PdfDocument::new("Bảng kê mua hàng", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = load_font(&doc, &self.font_path, BuiltinFont::Helvetica)?;
        let bold = load_font(&doc, &self.bold_font_path, BuiltinFont::HelveticaBold)?;
        let mut page = Page {
            layer: doc.get_page(page).get_layer(layer),
            cursor: PAGE_HEIGHT - MARGIN,
        };

        page.centered("CỘNG HOÀ XÃ HỘI CHỦ NGHĨA VIỆT NAM", 10.0, &regular);
        page.centered("Độc lập - Tự do - Hạnh phúc", 10.0, &regular);
        page.space(3.5);
        page.left(&format!("Tên đơn vị: {}", self.company_name), 10.0, &regular);
        page.space(1.0);
        for line in wrap(TITLE, 14.0, PAGE_WIDTH - 2.0 * MARGIN) {
            page.centered(&line, 14.0, &bold);
        }
        page.centered("(Theo mẫu 01/TNDN)", 10.0, &regular);
        page.space(5.0);

        page.left(&format!("Tên người bán: {}", bill.seller.name), 10.0, &regular);
        page.left(&format!("Số CCCD: {}", bill.seller.id_number), 10.0, &regular);
        page.left(&format!("Địa chỉ: {}", bill.seller.address), 10.0, &regular);
        page.left(
            &format!("Ngày: {}", bill.timestamp.format("%d/%m/%Y %H:%M:%S")),
            10.0,
            &regular,
        );
        page.space(5.0);

        let mut rows: Vec<[String; 4]> = Vec::with_capacity(count + 2);
        rows.push([
            "Cân Nặng (gram)".to_string(),
            "Loại Vàng".to_string(),
            "Đơn Giá (VND)".to_string(),
            "Thành Tiền (VND)".to_string(),
        ]);
        for item in &bill.items {
            rows.push([
                format_weight(&item.weight),
                item.gold_type.label().to_string(),
                format_unit_price(item.unit_price),
                format_money(&item.amount()),
            ]);
        }
        rows.push([
            String::new(),
            String::new(),
            "Tổng Cộng:".to_string(),
            format!("{} VND", format_money(&total)),
        ]);
        page.table(&rows, &regular, &bold);
        page.space(7.0);

        page.left(
            &format!("Tổng số tiền bằng chữ: {}", amount_in_words(total_units)),
            10.0,
            &regular,
        );
        page.space(7.0);
        page.signatures(["Chữ ký người bán", "Chữ ký người mua"], &regular);

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| ReceiptError::Layout(format!("{:?}", e)))?;

        tracing::debug!(
            seller = %bill.seller.name,
            items = count,
            size_bytes = bytes.len(),
            "Receipt rendered"
        );

        Ok(RenderedReceipt {
            file_name: self.file_name(bill),
            bytes,
        })
    }
}

/// Embeds the TrueType font at `path`, or falls back to a built-in face when
/// the file cannot be opened. A file that opens but does not parse is an error.
fn load_font(
    doc: &PdfDocumentReference,
    path: &Path,
    fallback: BuiltinFont,
) -> Result<IndirectFontRef, ReceiptError> {
    match File::open(path) {
        Ok(file) => doc.add_external_font(BufReader::new(file)).map_err(|e| {
            ReceiptError::Layout(format!("font {} is unusable: {:?}", path.display(), e))
        }),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                reason = %e,
                "Receipt font unavailable, using built-in font"
            );
            doc.add_builtin_font(fallback)
                .map_err(|e| ReceiptError::Layout(format!("{:?}", e)))
        }
    }
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_WIDTH * PT_TO_MM
}

/// Greedy word wrap against the estimated glyph width.
fn wrap(text: &str, size: f32, width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width(&candidate, size) > width && !current.is_empty() {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Top-down writer over a single page layer.
struct Page {
    layer: PdfLayerReference,
    cursor: f32,
}

impl Page {
    fn space(&mut self, mm: f32) {
        self.cursor -= mm;
    }

    fn advance(&mut self, size: f32) -> f32 {
        self.cursor -= size * PT_TO_MM * 1.2;
        self.cursor
    }

    fn left(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        for line in wrap(text, size, PAGE_WIDTH - 2.0 * MARGIN) {
            let y = self.advance(size);
            self.layer.use_text(line, size, Mm(MARGIN), Mm(y), font);
        }
    }

    fn centered(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        let y = self.advance(size);
        self.text_in_cell(text, size, 0.0, PAGE_WIDTH, y, font);
    }

    fn text_in_cell(&self, text: &str, size: f32, left: f32, width: f32, y: f32, font: &IndirectFontRef) {
        let x = left + ((width - text_width(text, size)) / 2.0).max(0.0);
        self.layer.use_text(text, size, Mm(x), Mm(y), font);
    }

    fn rule(&self, from: (f32, f32), to: (f32, f32)) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(from.0), Mm(from.1)), false),
                (Point::new(Mm(to.0), Mm(to.1)), false),
            ],
            is_closed: false,
        });
    }

    /// Gridded table; the first row and the last row's total cells are bold.
    fn table(&mut self, rows: &[[String; 4]], regular: &IndirectFontRef, bold: &IndirectFontRef) {
        let width: f32 = TABLE_COLUMNS.iter().sum();
        let left = (PAGE_WIDTH - width) / 2.0;
        let top = self.cursor;
        let bottom = top - TABLE_ROW_HEIGHT * rows.len() as f32;
        let last = rows.len() - 1;

        self.layer.set_outline_thickness(0.75);

        for (r, row) in rows.iter().enumerate() {
            let row_top = top - TABLE_ROW_HEIGHT * r as f32;
            let baseline = row_top - TABLE_ROW_HEIGHT / 2.0 - 1.2;
            self.rule((left, row_top), (left + width, row_top));

            let mut x = left;
            for (c, cell) in row.iter().enumerate() {
                let font = if r == 0 || (r == last && c >= 2) { bold } else { regular };
                let size = if r == 0 { 8.0 } else { 9.0 };
                self.text_in_cell(cell, size, x, TABLE_COLUMNS[c], baseline, font);
                x += TABLE_COLUMNS[c];
            }
        }
        self.rule((left, bottom), (left + width, bottom));

        let mut x = left;
        self.rule((x, top), (x, bottom));
        for column in TABLE_COLUMNS {
            x += column;
            self.rule((x, top), (x, bottom));
        }

        self.cursor = bottom;
    }

    fn signatures(&mut self, labels: [&str; 2], font: &IndirectFontRef) {
        let left = (PAGE_WIDTH - 2.0 * SIGNATURE_COLUMN) / 2.0;
        let y = self.advance(10.0);
        for (i, label) in labels.iter().enumerate() {
            self.text_in_cell(label, 10.0, left + SIGNATURE_COLUMN * i as f32, SIGNATURE_COLUMN, y, font);
        }
        self.space(14.0);
    }
}

//! Text-run extraction backed by lopdf.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{Metadata, TextRun};

use super::{check_page, check_pdf_header, PdfSource, SourceProvider};

/// Default leading when a content stream moves to the next line without `TL`.
const DEFAULT_LEADING: f32 = 12.0;

/// Average glyph advance as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// Provider producing [`LopdfSource`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfProvider;

impl SourceProvider for LopdfProvider {
    type Source = LopdfSource;

    fn load(&self, data: &[u8]) -> Result<LopdfSource> {
        LopdfSource::load_bytes(data)
    }
}

/// A PDF document opened with lopdf.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfSource {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::load_bytes(&data)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        check_pdf_header(data)?;
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        let pages = doc.get_pages();
        log::debug!("Loaded PDF {} with {} pages", doc.version, pages.len());
        Ok(Self { doc, pages })
    }

    /// Load from a reader.
    pub fn load_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes(&data)
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn page_id(&self, number: u32) -> Result<ObjectId> {
        check_page(number, self.page_count())?;
        self.pages
            .get(&number)
            .copied()
            .ok_or(Error::PageOutOfRange(number, self.page_count()))
    }

    /// Get page content stream.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;
        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r)? {
                Object::Stream(s) => stream_bytes(s),
                Object::Array(arr) => Ok(self.concat_streams(arr)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => Ok(self.concat_streams(arr)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn concat_streams(&self, refs: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in refs {
            if let Object::Reference(r) = obj {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    match stream_bytes(s) {
                        Ok(data) => {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                        Err(e) => log::warn!("Skipping undecodable content stream: {}", e),
                    }
                }
            }
        }
        content
    }

    /// Parse a content stream into text runs.
    fn extract_runs(&self, page_id: ObjectId) -> Result<Vec<TextRun>> {
        let fonts = PageFonts::new(&self.doc, self.doc.get_page_fonts(page_id)?);

        let content = self.page_content(page_id)?;
        let content = lopdf::content::Content::decode(&content)?;

        let mut runs = Vec::new();
        let mut state = TextState::default();
        let mut saved = Vec::new();
        let mut in_text_block = false;

        for op in &content.operations {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => saved.push(state.ctm),
                "Q" => {
                    if let Some(ctm) = saved.pop() {
                        state.ctm = ctm;
                    }
                }
                "cm" => {
                    let values: Vec<f32> = operands.iter().filter_map(get_number).collect();
                    if let [a, b, c, d, e, f] = values[..] {
                        state.ctm = Ctm([a, b, c, d, e, f]).then(&state.ctm);
                    }
                }
                "BT" => {
                    in_text_block = true;
                    state.matrix = TextMatrix::default();
                }
                "ET" => in_text_block = false,
                "Tf" => {
                    if let (Some(Object::Name(name)), Some(size)) =
                        (operands.first(), operands.get(1).and_then(get_number))
                    {
                        state.font_key = name.clone();
                        state.font_size = size;
                    }
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(get_number) {
                        state.leading = leading;
                    }
                }
                "Td" => {
                    if let Some((tx, ty)) = pair(operands) {
                        state.matrix.translate(tx, ty);
                    }
                }
                "TD" => {
                    if let Some((tx, ty)) = pair(operands) {
                        state.leading = -ty;
                        state.matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    let values: Vec<f32> = operands.iter().filter_map(get_number).collect();
                    if let [a, b, c, d, e, f] = values[..] {
                        state.matrix.set(a, b, c, d, e, f);
                    }
                }
                "T*" => state.matrix.next_line(state.leading),
                "Tj" if in_text_block => {
                    if let Some(Object::String(bytes, _)) = operands.first() {
                        let text = fonts.decode(&state.font_key, bytes);
                        state.show(text, &fonts, &mut runs);
                    }
                }
                "TJ" if in_text_block => {
                    if let Some(Object::Array(items)) = operands.first() {
                        state.show_array(items, &fonts, &mut runs);
                    }
                }
                "'" | "\"" => {
                    state.matrix.next_line(state.leading);
                    let index = if op.operator == "\"" { 2 } else { 0 };
                    if in_text_block {
                        if let Some(Object::String(bytes, _)) = operands.get(index) {
                            let text = fonts.decode(&state.font_key, bytes);
                            state.show(text, &fonts, &mut runs);
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(runs)
    }

    fn info_dictionary(&self) -> Option<&Dictionary> {
        let info = self.doc.trailer.get(b"Info").ok()?;
        match info {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }
}

impl PdfSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_runs(&self, number: u32) -> Result<Vec<TextRun>> {
        let page_id = self.page_id(number)?;
        self.extract_runs(page_id)
    }

    fn metadata(&self) -> Result<Metadata> {
        let mut metadata = Metadata::default();
        if let Some(info) = self.info_dictionary() {
            metadata.title = get_string_from_dict(info, b"Title");
            metadata.author = get_string_from_dict(info, b"Author");
            metadata.subject = get_string_from_dict(info, b"Subject");
            metadata.created =
                get_string_from_dict(info, b"CreationDate").and_then(|s| parse_pdf_date(&s));
            metadata.modified =
                get_string_from_dict(info, b"ModDate").and_then(|s| parse_pdf_date(&s));
        }
        Ok(metadata)
    }
}

/// Fonts of one page keyed by resource name.
struct PageFonts<'a> {
    doc: &'a LopdfDocument,
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
}

impl<'a> PageFonts<'a> {
    fn new(doc: &'a LopdfDocument, fonts: BTreeMap<Vec<u8>, &'a Dictionary>) -> Self {
        Self { doc, fonts }
    }

    /// Base font name, falling back to the resource key.
    fn name(&self, key: &[u8]) -> String {
        self.fonts
            .get(key)
            .and_then(|font| font.get(b"BaseFont").ok())
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| String::from_utf8_lossy(key).to_string())
    }

    fn decode(&self, key: &[u8], bytes: &[u8]) -> String {
        let text = self
            .fonts
            .get(key)
            .and_then(|font| font.get_font_encoding(self.doc).ok())
            .and_then(|enc| LopdfDocument::decode_text(&enc, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes));
        text.nfc().collect()
    }
}

/// Raw bytes of a content stream, decoded only when a filter is declared.
fn stream_bytes(stream: &Stream) -> Result<Vec<u8>> {
    if stream.dict.has(b"Filter") {
        Ok(stream.decompressed_content()?)
    } else {
        Ok(stream.content.clone())
    }
}

/// Text state carried across operators inside a content stream.
struct TextState {
    matrix: TextMatrix,
    ctm: Ctm,
    font_key: Vec<u8>,
    font_size: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: TextMatrix::default(),
            ctm: Ctm::default(),
            font_key: Vec::new(),
            font_size: 12.0,
            leading: DEFAULT_LEADING,
        }
    }
}

impl TextState {
    /// Text origin in user space.
    fn origin(&self) -> (f32, f32) {
        let (x, y) = self.matrix.position();
        self.ctm.apply(x, y)
    }

    /// Rendered glyph height through both the text and the transformation matrix.
    fn glyph_height(&self) -> f32 {
        let (c, d) = self.ctm.scale_vector(self.matrix.c, self.matrix.d);
        self.font_size * (c * c + d * d).sqrt()
    }

    /// Emit a run at the current position and advance past it.
    fn show(&mut self, text: String, fonts: &PageFonts<'_>, runs: &mut Vec<TextRun>) {
        let glyphs = text.chars().count() as f32;
        if !text.is_empty() {
            let (x, y) = self.origin();
            runs.push(TextRun::new(
                text,
                x,
                y,
                fonts.name(&self.font_key),
                self.glyph_height(),
            ));
        }
        self.matrix
            .advance(glyphs * self.font_size * AVG_GLYPH_WIDTH);
    }

    /// `TJ`: strings interleaved with kerning adjustments in 1/1000 text units.
    fn show_array(&mut self, items: &[Object], fonts: &PageFonts<'_>, runs: &mut Vec<TextRun>) {
        let (x, y) = self.origin();
        let mut combined = String::new();
        let mut advance = 0.0;

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let decoded = fonts.decode(&self.font_key, bytes);
                    advance += decoded.chars().count() as f32 * self.font_size * AVG_GLYPH_WIDTH;
                    combined.push_str(&decoded);
                }
                other => {
                    if let Some(n) = get_number(other) {
                        let shift = -n / 1000.0;
                        advance += shift * self.font_size;
                        if shift > 0.2 && needs_space(&combined) {
                            combined.push(' ');
                        }
                    }
                }
            }
        }

        if !combined.is_empty() {
            runs.push(TextRun::new(
                combined,
                x,
                y,
                fonts.name(&self.font_key),
                self.glyph_height(),
            ));
        }
        self.matrix.advance(advance);
    }
}

/// Whether a kerning gap after `text` reads as a word break.
fn needs_space(text: &str) -> bool {
    match text.chars().last() {
        Some(c) => !c.is_whitespace() && c != '\u{00A0}' && !is_spaceless_script_char(c),
        None => false,
    }
}

#[derive(Debug, Clone, Copy)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    // start of the current line
    line_e: f32,
    line_f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            line_e: 0.0,
            line_f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        *self = Self {
            a,
            b,
            c,
            d,
            e,
            f,
            line_e: e,
            line_f: f,
        };
    }

    /// `Td`: offset from the start of the current line.
    fn translate(&mut self, tx: f32, ty: f32) {
        self.line_e += tx * self.a + ty * self.c;
        self.line_f += tx * self.b + ty * self.d;
        self.e = self.line_e;
        self.f = self.line_f;
    }

    fn next_line(&mut self, leading: f32) {
        self.translate(0.0, -leading);
    }

    /// Move along the baseline after showing text.
    fn advance(&mut self, tx: f32) {
        self.e += tx * self.a;
        self.f += tx * self.b;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }
}

/// Current transformation matrix `[a b c d e f]`, set by `cm` and saved by `q`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Ctm([f32; 6]);

impl Default for Ctm {
    fn default() -> Self {
        Ctm([1.0, 0.0, 0.0, 1.0, 0.0, 0.0])
    }
}

impl Ctm {
    /// `self × outer`: apply `self` first, then `outer`.
    fn then(&self, outer: &Ctm) -> Ctm {
        let [a, b, c, d, e, f] = self.0;
        let [oa, ob, oc, od, oe, of] = outer.0;
        Ctm([
            a * oa + b * oc,
            a * ob + b * od,
            c * oa + d * oc,
            c * ob + d * od,
            e * oa + f * oc + oe,
            e * ob + f * od + of,
        ])
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }

    /// Map a direction vector, ignoring translation.
    fn scale_vector(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, c, d, _, _] = self.0;
        (a * x + c * y, b * x + d * y)
    }
}

fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn pair(operands: &[Object]) -> Option<(f32, f32)> {
    Some((
        operands.first().and_then(get_number)?,
        operands.get(1).and_then(get_number)?,
    ))
}

/// Check if character is from a script that doesn't use word spaces.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana and Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(utf16) = decode_utf16be(bytes) {
        return utf16;
    }
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }
    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

fn decode_utf16be(bytes: &[u8]) -> Option<String> {
    let body = bytes.strip_prefix(&[0xFE, 0xFF])?;
    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => {
            Some(decode_utf16be(bytes).unwrap_or_else(|| decode_text_simple(bytes)))
        }
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let field = |range: std::ops::Range<usize>, default: u32| {
        s.get(range).and_then(|v| v.parse().ok()).unwrap_or(default)
    };

    chrono::NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))
        .and_then(|date| date.and_hms_opt(field(8..10, 0), field(10..12, 0), field(12..14, 0)))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}

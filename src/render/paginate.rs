//! Fixed-page layout of markdown-like text.
//!
//! The output is a flat list of draw instructions, independent of any
//! rendering backend. The PDF exporter consumes it, and so can a preview.

use super::inline::BOLD_SPAN;
use super::metrics::{Helvetica, TextMeasure};

/// Body text size in points.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

const BULLET: &str = "•";

/// Page size, margins and spacing, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub line_height: f32,
    /// Extra left offset for list item text.
    pub list_indent: f32,
}

impl PageGeometry {
    /// A4 portrait with 15mm side margins and 20mm top/bottom margins.
    pub const fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin_left: 42.52,
            margin_right: 42.52,
            margin_top: 56.69,
            margin_bottom: 56.69,
            line_height: 19.84,
            list_indent: 28.35,
        }
    }

    /// Horizontal space between the margins.
    pub fn text_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// X coordinate text must not cross.
    pub fn right_edge(&self) -> f32 {
        self.width - self.margin_right
    }

    /// Y coordinate at which a new page starts.
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margin_bottom
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// A piece of text placed on a page. `y` grows downwards from the page top.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub bold: bool,
    pub font_size: f32,
}

/// One layout instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextRun),
    /// Starts page `page` (zero-based).
    PageBreak { page: usize },
}

/// Laid-out text, ready for a rendering backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub ops: Vec<DrawOp>,
}

impl Document {
    /// Number of pages, counting the first page even when it is empty.
    pub fn page_count(&self) -> usize {
        1 + self
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::PageBreak { .. }))
            .count()
    }

    /// All text runs in drawing order.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            DrawOp::PageBreak { .. } => None,
        })
    }

    /// Text runs on one page.
    pub fn runs_on(&self, page: usize) -> impl Iterator<Item = &TextRun> {
        self.runs().filter(move |run| run.page == page)
    }
}

/// Lays out `text` at [`DEFAULT_FONT_SIZE`] starting at the top of page 0.
///
/// # Examples
///
/// ```
/// use dietnerd::render::{Helvetica, PageGeometry, paginate};
///
/// let doc = paginate("Eat **more** fiber.", PageGeometry::a4(), Helvetica);
/// let runs: Vec<_> = doc.runs().map(|r| (r.text.as_str(), r.bold)).collect();
/// assert_eq!(runs, vec![("Eat", false), ("more", true), ("fiber.", false)]);
/// ```
pub fn paginate<M: TextMeasure>(text: &str, geometry: PageGeometry, measure: M) -> Document {
    let mut writer = LayoutWriter::new(geometry, measure);
    writer.write_block(text, DEFAULT_FONT_SIZE);
    writer.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Paragraph,
    ListItem,
    Heading,
}

impl LineKind {
    /// Classifies a source line and strips its marker.
    fn classify(line: &str) -> (Self, &str) {
        let trimmed = line.trim_start();
        for marker in ['-', '*', '•'] {
            if let Some(rest) = trimmed.strip_prefix(marker) {
                if rest.starts_with(char::is_whitespace) {
                    return (Self::ListItem, rest.trim());
                }
            }
        }
        if trimmed.starts_with('#') {
            return (Self::Heading, trimmed.trim_start_matches('#').trim());
        }
        (Self::Paragraph, line)
    }
}

/// A stretch of a line with one font style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run<'a> {
    text: &'a str,
    bold: bool,
}

/// Splits a line at `**...**` boundaries.
fn split_runs(line: &str, force_bold: bool) -> Vec<Run<'_>> {
    let mut runs = Vec::new();
    let mut last = 0;
    for caps in BOLD_SPAN.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            runs.push(Run {
                text: &line[last..whole.start()],
                bold: force_bold,
            });
        }
        if !inner.as_str().is_empty() {
            runs.push(Run {
                text: inner.as_str(),
                bold: true,
            });
        }
        last = whole.end();
    }
    if last < line.len() {
        runs.push(Run {
            text: &line[last..],
            bold: force_bold,
        });
    }
    runs
}

/// Stateful layout cursor for building multi-part documents.
///
/// Every flush first checks whether the cursor has reached the bottom limit
/// and starts a new page if so, so no run is ever placed below
/// [`PageGeometry::bottom_limit`].
pub struct LayoutWriter<M = Helvetica> {
    geometry: PageGeometry,
    measure: M,
    ops: Vec<DrawOp>,
    page: usize,
    y: f32,
}

impl<M: TextMeasure> LayoutWriter<M> {
    pub fn new(geometry: PageGeometry, measure: M) -> Self {
        Self {
            geometry,
            measure,
            ops: Vec::new(),
            page: 0,
            y: geometry.margin_top,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Current zero-based page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Current vertical cursor.
    pub fn cursor_y(&self) -> f32 {
        self.y
    }

    /// Moves the cursor down without drawing.
    pub fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    /// Starts a new page and moves the cursor to its top margin.
    ///
    /// Consecutive breaks collapse into one, so no page is left without text
    /// between two breaks.
    pub fn page_break(&mut self) {
        if !matches!(self.ops.last(), Some(DrawOp::PageBreak { .. })) {
            self.page += 1;
            self.ops.push(DrawOp::PageBreak { page: self.page });
        }
        self.y = self.geometry.margin_top;
    }

    /// Lays out a block of markdown-like text, one source line at a time.
    pub fn write_block(&mut self, text: &str, font_size: f32) {
        for line in text.split('\n') {
            self.write_line(line.trim_end_matches('\r'), font_size);
        }
    }

    /// Writes `text` in bold, wrapped to the text width, advancing by
    /// `line_advance` after each wrapped line.
    pub fn write_title(&mut self, text: &str, font_size: f32, line_advance: f32) {
        let left = self.geometry.margin_left;
        let available = self.geometry.text_width();
        for line in self.wrap(text, true, font_size, available) {
            self.flush(&line, left, true, font_size);
            self.y += line_advance;
        }
    }

    /// Returns the finished document, without trailing blank pages.
    pub fn finish(mut self) -> Document {
        while matches!(self.ops.last(), Some(DrawOp::PageBreak { .. })) {
            self.ops.pop();
        }
        Document { ops: self.ops }
    }

    fn write_line(&mut self, line: &str, font_size: f32) {
        let (kind, body) = LineKind::classify(line);
        let mut left = self.geometry.margin_left;

        if kind == LineKind::ListItem {
            self.flush(BULLET, left, false, font_size);
            left += self.geometry.list_indent;
        }

        let mut x = left;
        for run in split_runs(body, kind == LineKind::Heading) {
            x = self.write_run(run, x, left, font_size);
        }

        self.y += self.geometry.line_height;
        self.ensure_room();
    }

    /// Packs the words of one run greedily, starting at `x`. Returns the
    /// horizontal cursor after the run.
    fn write_run(&mut self, run: Run<'_>, mut x: f32, left: f32, font_size: f32) -> f32 {
        let right = self.geometry.right_edge();
        let space = self.measure.width(" ", run.bold, font_size);
        if x > left && run.text.starts_with(char::is_whitespace) {
            x += space;
        }

        let mut current = String::new();
        for word in run.text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if self.measure.width(&candidate, run.bold, font_size) <= right - x {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                self.flush(&current, x, run.bold, font_size);
                current.clear();
                self.newline();
                x = left;
            } else if x > left {
                self.newline();
                x = left;
            }

            if self.measure.width(word, run.bold, font_size) <= right - x {
                current = word.to_string();
            } else {
                current = self.break_word(word, x, run.bold, font_size);
            }
        }

        if !current.is_empty() {
            self.flush(&current, x, run.bold, font_size);
            x += self.measure.width(&current, run.bold, font_size);
            if run.text.ends_with(char::is_whitespace) {
                x += space;
            }
        }
        x
    }

    /// Hard-breaks a word wider than the line, flushing every full chunk.
    /// Returns the unflushed tail.
    fn break_word(&mut self, word: &str, x: f32, bold: bool, font_size: f32) -> String {
        let available = self.geometry.right_edge() - x;
        let mut chunk = String::new();
        for c in word.chars() {
            chunk.push(c);
            if chunk.chars().count() > 1 && self.measure.width(&chunk, bold, font_size) > available
            {
                chunk.pop();
                self.flush(&chunk, x, bold, font_size);
                self.newline();
                chunk.clear();
                chunk.push(c);
            }
        }
        chunk
    }

    /// Greedy word wrap without drawing; long words are hard-broken.
    fn wrap(&self, text: &str, bold: bool, font_size: f32, available: f32) -> Vec<String> {
        let fits = |s: &str| self.measure.width(s, bold, font_size) <= available;
        let mut lines = Vec::new();
        let mut current = String::new();
        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if fits(&candidate) {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            for c in word.chars() {
                current.push(c);
                if current.chars().count() > 1 && !fits(&current) {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    fn newline(&mut self) {
        self.y += self.geometry.line_height;
    }

    fn ensure_room(&mut self) {
        if self.y >= self.geometry.bottom_limit() {
            self.page_break();
        }
    }

    fn flush(&mut self, text: &str, x: f32, bold: bool, font_size: f32) {
        self.ensure_room();
        self.ops.push(DrawOp::Text(TextRun {
            page: self.page,
            x,
            y: self.y,
            text: text.to_string(),
            bold,
            font_size,
        }));
    }
}

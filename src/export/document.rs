use crate::models::MetadataStore;
use crate::render::{DEFAULT_FONT_SIZE, Document, Helvetica, LayoutWriter, PageGeometry, TextMeasure};

/// Font size of the question title and the appendix heading.
pub const HEADING_FONT_SIZE: f32 = 16.0;
/// Font size of the `Citation:` and `Summary:` labels.
pub const ENTRY_FONT_SIZE: f32 = 14.0;
/// Vertical advance per wrapped title line.
pub const TITLE_LINE_ADVANCE: f32 = 28.35;
/// Extra space between the title and the answer body.
pub const TITLE_GAP: f32 = 28.35;
/// Space below the appendix heading.
const APPENDIX_HEADING_ADVANCE: f32 = 56.69;

pub const APPENDIX_HEADING: &str = "Citation Summaries";

/// Lays out an answer for export using Helvetica metrics.
///
/// The first pages hold the question as a bold title followed by the answer
/// text. A new page then starts the citation-summary appendix, with one page
/// per metadata entry in store order.
pub fn build_export(
    question: &str,
    output: &str,
    metadata: &MetadataStore,
    geometry: PageGeometry,
) -> Document {
    build_export_with(question, output, metadata, geometry, Helvetica)
}

/// [`build_export`] with custom text metrics.
pub fn build_export_with<M: TextMeasure>(
    question: &str,
    output: &str,
    metadata: &MetadataStore,
    geometry: PageGeometry,
    measure: M,
) -> Document {
    let mut writer = LayoutWriter::new(geometry, measure);
    let blank = geometry.line_height;

    writer.write_title(question, HEADING_FONT_SIZE, TITLE_LINE_ADVANCE);
    writer.advance(TITLE_GAP);
    writer.write_block(output, DEFAULT_FONT_SIZE);

    writer.page_break();
    writer.write_title(APPENDIX_HEADING, HEADING_FONT_SIZE, APPENDIX_HEADING_ADVANCE);

    for (index, (citation, details)) in metadata.iter().enumerate() {
        if index > 0 {
            writer.page_break();
        }

        writer.write_block(&format!("**Citation:** {citation}"), ENTRY_FONT_SIZE);
        writer.advance(blank);
        writer.write_block("**Summary:**", ENTRY_FONT_SIZE);
        writer.advance(blank);
        writer.write_block(&details.summary, DEFAULT_FONT_SIZE);
        writer.advance(blank);
        writer.write_block(&format!("**PMID:** {}", details.pmid), DEFAULT_FONT_SIZE);
        writer.advance(blank);
        writer.write_block(&format!("**PMCID:** {}", details.pmcid), DEFAULT_FONT_SIZE);
        writer.advance(blank);
        writer.write_block(&format!("**URL:** {}", details.url), DEFAULT_FONT_SIZE);
        writer.advance(blank * 2.0);
    }

    writer.finish()
}

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, ObjectId, Stream, dictionary};

use crate::render::{Document, DrawOp, PageGeometry, TextRun};

use super::ExportError;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Renders laid-out text as a PDF using the base-14 Helvetica fonts.
///
/// Layout coordinates grow downwards from the page top; they are flipped
/// into PDF user space here.
pub fn render_pdf(document: &Document, geometry: &PageGeometry) -> Result<Vec<u8>, ExportError> {
    let mut pdf = lopdf::Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let regular_id = pdf.add_object(font_dictionary("Helvetica"));
    let bold_id = pdf.add_object(font_dictionary("Helvetica-Bold"));
    let resources_id = pdf.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular_id,
            BOLD_FONT => bold_id,
        },
    });

    let mut page_ops: Vec<Vec<Operation>> =
        (0..document.page_count()).map(|_| Vec::new()).collect();
    for op in &document.ops {
        if let DrawOp::Text(run) = op {
            if let Some(ops) = page_ops.get_mut(run.page) {
                ops.extend(text_operations(run, geometry));
            }
        }
    }

    let mut kids: Vec<Object> = Vec::with_capacity(page_ops.len());
    for operations in page_ops {
        let content = Content { operations };
        let content_id = pdf.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            geometry.width.into(),
            geometry.height.into(),
        ],
    };
    pdf.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id: ObjectId = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);
    pdf.compress();

    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes)?;
    Ok(bytes)
}

fn font_dictionary(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn text_operations(run: &TextRun, geometry: &PageGeometry) -> Vec<Operation> {
    let font = if run.bold { BOLD_FONT } else { REGULAR_FONT };
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), run.font_size.into()]),
        Operation::new("Td", vec![run.x.into(), (geometry.height - run.y).into()]),
        Operation::new("Tj", vec![Object::string_literal(win_ansi(&run.text))]),
        Operation::new("ET", vec![]),
    ]
}

/// Encodes text for a WinAnsi-encoded base-14 font.
///
/// Latin-1 characters map to themselves, common typographic punctuation to
/// its Windows-1252 slot, and anything else to `?`.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            c if u32::from(c) < 0x80 || (0xA0..=0xFF).contains(&u32::from(c)) => c as u8,
            _ => b'?',
        })
        .collect()
}

//! Document Writer: render original text and summary into a one-page PDF.
//!
//! The layout is a fixed template on a US-Letter page: four text elements,
//! each drawn in its own `BT … ET` block at a fixed position so that text
//! extraction surfaces them as four separate lines:
//!
//! ```text
//!  y=740  Original Text:
//!  y=720  <original text>
//!  y=700  Summary:
//!  y=680  <summary text>
//! ```
//!
//! No wrapping or pagination happens. Whatever runs past the right edge is
//! simply not visible unless [`OverflowPolicy::Fail`] is selected, in which
//! case an over-wide element is rejected before anything touches the disk.
//!
//! The document is serialised into a temporary file next to the destination
//! and renamed over it, so a failed run never leaves a partial PDF behind.

use crate::config::OverflowPolicy;
use crate::error::Pdf2SumError;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const ORIGINAL_LABEL: &str = "Original Text:";
pub const SUMMARY_LABEL: &str = "Summary:";

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const LEFT_X: i64 = 100;
const RIGHT_MARGIN: i64 = 72;
const FONT_SIZE: i64 = 12;
const TOP_Y: i64 = 740;
const LINE_STEP: i64 = 20;

/// Average Helvetica advance width, in 1/1000 em.
const AVG_GLYPH_WIDTH: f32 = 556.0;

/// Render `original` and `summary` into a new PDF at `path`.
///
/// Creates or overwrites `path`. Parent directories are created as needed.
pub async fn write_pdf(
    path: impl AsRef<Path>,
    original: &str,
    summary: &str,
    overflow: OverflowPolicy,
) -> Result<(), Pdf2SumError> {
    let path = path.as_ref().to_path_buf();
    let original = original.to_string();
    let summary = summary.to_string();

    tokio::task::spawn_blocking(move || write_pdf_blocking(&path, &original, &summary, overflow))
        .await
        .map_err(|e| Pdf2SumError::Internal(format!("Write task panicked: {}", e)))?
}

/// Blocking implementation of [`write_pdf`].
pub fn write_pdf_blocking(
    path: &Path,
    original: &str,
    summary: &str,
    overflow: OverflowPolicy,
) -> Result<(), Pdf2SumError> {
    let elements = [
        ("Original text label", ORIGINAL_LABEL),
        ("Original text", original),
        ("Summary label", SUMMARY_LABEL),
        ("Summary", summary),
    ];

    if overflow == OverflowPolicy::Fail {
        for (element, text) in &elements {
            check_fits(element, text)?;
        }
    }

    let mut document = build_document(&elements.map(|(_, text)| text))
        .map_err(|detail| Pdf2SumError::PdfBuildFailed {
            path: path.to_path_buf(),
            detail,
        })?;

    persist(&mut document, path)?;
    info!("Wrote summary PDF: {}", path.display());
    Ok(())
}

/// Build the single-page document in memory.
fn build_document(lines: &[&str; 4]) -> Result<Document, String> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut operations = Vec::with_capacity(lines.len() * 5);
    for (i, text) in lines.iter().enumerate() {
        let y = TOP_Y - LINE_STEP * i as i64;
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]));
        operations.push(Operation::new("Td", vec![LEFT_X.into(), y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(text))],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    let content = Content { operations };
    let encoded = content.encode().map_err(|e| e.to_string())?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Summary"),
        "Producer" => Object::string_literal(concat!("edgequake-pdf2sum ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    Ok(doc)
}

/// Serialise to a sibling temp file, then rename over `path`.
fn persist(document: &mut Document, path: &Path) -> Result<(), Pdf2SumError> {
    let write_err = |source: std::io::Error| Pdf2SumError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir: PathBuf = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(write_err)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".pdf2sum-")
        .suffix(".pdf.tmp")
        .tempfile_in(&dir)
        .map_err(write_err)?;

    document
        .save_to(tmp.as_file_mut())
        .map_err(|e| Pdf2SumError::PdfBuildFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
    tmp.as_file_mut().flush().map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    tmp.persist(path).map_err(|e| write_err(e.error))?;
    debug!("Persisted {}", path.display());
    Ok(())
}

/// Map text onto single-byte WinAnsi codes for the standard Helvetica font.
///
/// Line breaks and other control characters become spaces; characters the
/// font cannot show become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x00..=0x1F | 0x7F => b' ',
            0x20..=0x7E => c as u8,
            0xA0..=0xFF => c as u8,
            _ => win_ansi_extra(c).unwrap_or(b'?'),
        })
        .collect()
}

/// The 0x80–0x9F block, where WinAnsi departs from Latin-1.
fn win_ansi_extra(c: char) -> Option<u8> {
    let code = match c {
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
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(code)
}

/// Estimated rendered width of `text` in points.
fn estimated_width(text: &str) -> f32 {
    text.chars().count() as f32 * AVG_GLYPH_WIDTH / 1000.0 * FONT_SIZE as f32
}

fn check_fits(element: &str, text: &str) -> Result<(), Pdf2SumError> {
    let max_width = (PAGE_WIDTH - LEFT_X - RIGHT_MARGIN) as f32;
    let width = estimated_width(text);
    if width > max_width {
        return Err(Pdf2SumError::TextOverflow {
            element: element.to_string(),
            width,
            max_width,
        });
    }
    Ok(())
}

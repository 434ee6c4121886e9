//! End-to-end conversion of generated PDF files.

#![cfg(feature = "lopdf")]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pdf2html::{pdf_to_html, pdf_to_html_file, Pdf2Html, ERROR_HTML};

/// Build a PDF with one page per entry; each entry lists `(text, size, x, y)`.
fn build_pdf(pages: &[Vec<(&str, i64, i64, i64)>], title: Option<&str>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = vec![Operation::new("BT", vec![])];
        for (text, size, x, y) in lines {
            operations.push(Operation::new("Tf", vec!["F1".into(), (*size).into()]));
            operations.push(Operation::new(
                "Tm",
                vec![1.into(), 0.into(), 0.into(), 1.into(), (*x).into(), (*y).into()],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        });
        doc.trailer.set("Info", info_id);
    }

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn report() -> Vec<u8> {
    build_pdf(
        &[
            vec![
                ("Quarterly Report", 20, 72, 700),
                ("Revenue grew in every region.", 10, 72, 650),
                ("Costs stayed flat.", 10, 72, 630),
            ],
            vec![("Second page text.", 10, 72, 700)],
        ],
        Some("Q3 Report"),
    )
}

#[test]
fn test_pdf_to_html() {
    let html = pdf_to_html(&report(), None).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Q3 Report</title>"));
    assert!(html.contains("<h1>Quarterly Report</h1>"));
    assert!(html.contains("<p>Revenue grew in every region.</p>"));
    assert!(html.contains("<p>Second page text.</p>"));

    let first = html.find("Quarterly Report</h1>").unwrap();
    let second = html.find("Second page text.").unwrap();
    assert!(first < second);
}

#[test]
fn test_title_fallback_without_metadata() {
    let data = build_pdf(&[vec![("Only text here.", 10, 72, 700)]], None);
    let html = pdf_to_html(&data, Some("Fallback Title")).unwrap();
    assert!(html.contains("<title>Fallback Title</title>"));
}

#[test]
fn test_invalid_pdf_yields_error_document() {
    assert_eq!(pdf_to_html(b"not a pdf at all", None).unwrap(), ERROR_HTML);
    assert_eq!(pdf_to_html(b"%PDF-1.7 truncated", None).unwrap(), ERROR_HTML);
}

#[test]
fn test_pdf_to_html_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");
    std::fs::write(&path, report()).unwrap();

    let html = pdf_to_html_file(&path).unwrap();
    assert!(html.contains("<h1>Quarterly Report</h1>"));
}

#[test]
fn test_builder_convert_bytes() {
    let result = Pdf2Html::new()
        .sequential()
        .convert_bytes(&report())
        .unwrap();

    assert_eq!(result.document.page_count(), 2);
    assert_eq!(result.document.metadata.title.as_deref(), Some("Q3 Report"));
    assert_eq!(result.stats.heading_count, 1);
}

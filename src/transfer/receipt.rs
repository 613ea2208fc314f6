//! Single-page PDF receipts for outbound transfers.

use lopdf::{
    Document, Object, Stream,
    content::{Content, Operation},
    dictionary,
};

use crate::{Error, filter::RecordStatus, html::format_money};

use super::Transfer;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const LEFT_MARGIN: i64 = 72;
const FIRST_LINE_Y: i64 = 760;
const LINE_HEIGHT: i64 = 22;

/// Render a one-page receipt listing the transfer's id, status, date,
/// amount and destination.
///
/// The page uses the standard Helvetica font with WinAnsi encoding, so
/// characters outside Latin-1 are replaced with `?`.
pub fn render_transfer_receipt(transfer: &Transfer) -> Result<Vec<u8>, Error> {
    let date = transfer
        .details
        .created_at
        .as_deref()
        .or(transfer.details.date.as_deref())
        .or(transfer.details.executed_at.as_deref())
        .unwrap_or("-");

    let mut lines = vec![
        ("Comprobante de transferencia".to_owned(), 18),
        (format!("ID: {}", transfer.id), 12),
        (format!("Estado: {}", transfer.details.status.label()), 12),
        (format!("Fecha: {date}"), 12),
        (
            format!(
                "Monto: {}",
                format_money(transfer.details.amount, &transfer.details.currency)
            ),
            12,
        ),
        (format!("Destino: {}", transfer.details.destination), 12),
    ];

    if let Some(reason) = &transfer.details.failure_reason {
        lines.push((format!("Motivo del fallo: {reason}"), 12));
    }

    build_document(&lines)
}

fn build_document(lines: &[(String, i64)]) -> Result<Vec<u8>, Error> {
    let mut document = Document::with_version("1.4");
    let pages_id = document.new_object_id();

    let font_id = document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = document.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut operations = vec![Operation::new("BT", vec![])];

    for (index, (text, font_size)) in lines.iter().enumerate() {
        operations.push(Operation::new(
            "Tf",
            vec!["F1".into(), (*font_size).into()],
        ));

        // Td moves relative to the start of the previous line.
        let (x, y) = if index == 0 {
            (LEFT_MARGIN, FIRST_LINE_Y)
        } else {
            (0, -LINE_HEIGHT)
        };
        operations.push(Operation::new("Td", vec![x.into(), y.into()]));

        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(to_win_ansi(text))],
        ));
    }

    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = document.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = document.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    document.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = document.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    document.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    document
        .save_to(&mut bytes)
        .map_err(|error| Error::PdfError(error.to_string()))?;

    Ok(bytes)
}

/// WinAnsi matches Latin-1 for the characters we print.
fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer: assemble pages into a single document, one page per image,
// with each image re-encoded to JPEG and embedded as a DCTDecode stream.

use std::io::Write;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use tracing::{debug, instrument};

use packwerk_core::{PackwerkError, Page, Result};

use crate::export::encode_jpeg_into;

/// Write the pages as a PDF, in order, one page per image.
///
/// Every image is re-encoded to JPEG at `quality` first; page dimensions
/// follow each image's native pixel dimensions (one pixel per point), with
/// no further page-size negotiation. Any single page's encode failure aborts
/// the whole write.
#[instrument(skip_all, fields(count = pages.len()))]
pub fn write_pdf<W: Write>(pages: &[Page], writer: &mut W, quality: u8) -> Result<()> {
    let bytes = build_pdf(pages, quality)?;
    writer.write_all(&bytes)?;
    Ok(())
}

/// Assemble the document in memory and return its serialized bytes.
pub fn build_pdf(pages: &[Page], quality: u8) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in pages {
        let mut jpeg = Vec::new();
        encode_jpeg_into(page, &mut jpeg, quality)?;

        let width = page.width() as i64;
        let height = page.height() as i64;

        let image_stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => Object::Integer(width),
                "Height" => Object::Integer(height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => Object::Integer(8),
                "Filter" => "DCTDecode",
            },
            jpeg,
        );
        let image_id = doc.add_object(image_stream);

        // Scale the unit image square up to the page size, then draw.
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(width as f32),
                        Object::Real(0.0),
                        Object::Real(0.0),
                        Object::Real(height as f32),
                        Object::Real(0.0),
                        Object::Real(0.0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_bytes = content
            .encode()
            .map_err(|err| PackwerkError::EncodeFailed(format!("content stream: {err}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content_bytes));

        let page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(height),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => Object::Dictionary(dictionary! {
                "XObject" => Object::Dictionary(dictionary! {
                    "Im0" => Object::Reference(image_id),
                }),
            }),
        };
        kids.push(Object::Reference(doc.add_object(page_dict)));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|err| PackwerkError::Io(std::io::Error::other(err)))?;

    debug!(pages = page_count, bytes = out.len(), "PDF assembled");
    Ok(out)
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: extract every raster image XObject from every page of a
// document, using the `lopdf` crate.

use std::io::Cursor;

use image::DynamicImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, instrument};

use packwerk_core::{PackwerkError, Page, Result};

use crate::decode::decode_page;
use crate::digits::{count_digits, zero_padded};

/// Extract every raster image embedded in every page of a PDF.
///
/// Each image is named `<paddedWithinPageIndex>_<pageOrdinal>`, where the
/// padding width is the digit count of the largest within-page index seen
/// across the whole document, and the final order is a lexicographic sort
/// of those names. Page ordinals are deliberately left unpadded, so "page
/// 10" sorts before "page 2"; callers relying on the generated names depend
/// on this order (see DESIGN.md).
///
/// Unlike zip and directory import there is no per-entry tolerance: any
/// parse or extraction failure aborts the whole import with no partial
/// result.
#[instrument(skip_all, fields(bytes_len = bytes.len()))]
pub fn read_pdf(bytes: &[u8]) -> Result<Vec<Page>> {
    let doc = Document::load_mem(bytes)
        .map_err(|err| PackwerkError::ContainerCorrupt(format!("failed to parse PDF: {err}")))?;

    let mut extracted: Vec<(u32, usize, Vec<u8>)> = Vec::new();
    for (&page_number, &page_id) in &doc.get_pages() {
        let images = page_image_streams(&doc, page_number, page_id)?;
        for (index, image_bytes) in images.into_iter().enumerate() {
            extracted.push((page_number, index, image_bytes));
        }
    }

    debug!(images = extracted.len(), "raster images extracted");

    let max_index = extracted.iter().map(|(_, index, _)| *index).max().unwrap_or(0);
    let width = count_digits(max_index);

    let mut named: Vec<(String, Vec<u8>)> = extracted
        .into_iter()
        .map(|(page, index, image_bytes)| (entry_name(page, index, width), image_bytes))
        .collect();
    named.sort_by(|a, b| a.0.cmp(&b.0));

    named
        .into_iter()
        .map(|(name, image_bytes)| decode_page(&image_bytes, &name))
        .collect()
}

/// Generated name for one extracted image: zero-padded within-page index,
/// underscore, unpadded page ordinal.
fn entry_name(page: u32, index: usize, width: usize) -> String {
    format!("{}_{}", zero_padded(index, width), page)
}

/// Collect the encoded bytes (JPEG passthrough or lossless PNG re-encode)
/// of every image XObject on one page, in resource-dictionary order.
fn page_image_streams(doc: &Document, page_number: u32, page_id: ObjectId) -> Result<Vec<Vec<u8>>> {
    let page_dict = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|err| {
            PackwerkError::ContainerCorrupt(format!("page {page_number}: not a dictionary: {err}"))
        })?;

    let Some(xobjects) = resolve_xobject_dict(doc, page_dict) else {
        return Ok(Vec::new());
    };

    let mut images = Vec::new();
    for (name, object) in xobjects.iter() {
        let resolved = resolve_object(doc, object);
        let Object::Stream(stream) = resolved else {
            continue;
        };

        let is_image = stream
            .dict
            .get(b"Subtype")
            .ok()
            .and_then(|subtype| subtype.as_name().ok())
            .is_some_and(|subtype| subtype == b"Image");
        if !is_image {
            continue;
        }

        let label = String::from_utf8_lossy(name);
        let encoded = extract_stream_bytes(doc, stream).map_err(|reason| {
            PackwerkError::ContainerCorrupt(format!(
                "page {page_number}, image {label}: {reason}"
            ))
        })?;
        images.push(encoded);
    }

    Ok(images)
}

/// Turn an image XObject stream into decodable bytes.
///
/// `DCTDecode` streams already hold a complete JPEG and pass through
/// untouched. Everything else is treated as raw pixel data (inflated
/// first where lopdf knows the filter) and re-encoded losslessly as PNG.
fn extract_stream_bytes(doc: &Document, stream: &Stream) -> std::result::Result<Vec<u8>, String> {
    match extract_filter_name(&stream.dict).as_deref() {
        Some("DCTDecode") => Ok(stream.content.clone()),
        Some("JPXDecode") => Err("JPEG2000 image streams are not supported".to_string()),
        _ => {
            let raw = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            let meta = RawImageMeta::from_dict(doc, &stream.dict)?;
            meta.encode_png(&raw)
        }
    }
}

/// Parsed metadata of a raw (non-JPEG) image stream.
struct RawImageMeta {
    width: u32,
    height: u32,
    color_space: ColorSpace,
}

#[derive(Clone, Copy)]
enum ColorSpace {
    Gray,
    Rgb,
    Cmyk,
}

impl RawImageMeta {
    fn from_dict(doc: &Document, dict: &Dictionary) -> std::result::Result<Self, String> {
        let width = dict
            .get(b"Width")
            .and_then(Object::as_i64)
            .map_err(|_| "missing image width".to_string())? as u32;
        let height = dict
            .get(b"Height")
            .and_then(Object::as_i64)
            .map_err(|_| "missing image height".to_string())? as u32;

        let bits = dict
            .get(b"BitsPerComponent")
            .and_then(Object::as_i64)
            .unwrap_or(8);
        if bits != 8 {
            return Err(format!("{bits}-bit image components are not supported"));
        }

        let color_space_obj = dict
            .get(b"ColorSpace")
            .map_err(|_| "missing image color space".to_string())?;
        let color_space_name = resolve_object(doc, color_space_obj)
            .as_name()
            .map_err(|_| "non-name color spaces are not supported".to_string())?;

        let color_space = match color_space_name {
            b"DeviceGray" => ColorSpace::Gray,
            b"DeviceRGB" => ColorSpace::Rgb,
            b"DeviceCMYK" => ColorSpace::Cmyk,
            other => {
                return Err(format!(
                    "unsupported color space {}",
                    String::from_utf8_lossy(other)
                ));
            }
        };

        Ok(Self {
            width,
            height,
            color_space,
        })
    }

    fn channels(&self) -> usize {
        match self.color_space {
            ColorSpace::Gray => 1,
            ColorSpace::Rgb => 3,
            ColorSpace::Cmyk => 4,
        }
    }

    /// Re-encode raw pixel data as PNG for the decoder.
    fn encode_png(&self, raw: &[u8]) -> std::result::Result<Vec<u8>, String> {
        let expected = self.width as usize * self.height as usize * self.channels();
        if raw.len() < expected {
            return Err(format!(
                "raw pixel data too short: {} bytes, expected {expected}",
                raw.len()
            ));
        }
        let raw = &raw[..expected];

        let dynamic = match self.color_space {
            ColorSpace::Gray => image::GrayImage::from_raw(self.width, self.height, raw.to_vec())
                .map(DynamicImage::ImageLuma8),
            ColorSpace::Rgb => image::RgbImage::from_raw(self.width, self.height, raw.to_vec())
                .map(DynamicImage::ImageRgb8),
            ColorSpace::Cmyk => {
                image::RgbImage::from_raw(self.width, self.height, cmyk_to_rgb(raw))
                    .map(DynamicImage::ImageRgb8)
            }
        }
        .ok_or_else(|| "raw pixel buffer does not match dimensions".to_string())?;

        let mut buf = Vec::new();
        dynamic
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|err| format!("PNG re-encode failed: {err}"))?;
        Ok(buf)
    }
}

/// Naive CMYK to RGB conversion.
fn cmyk_to_rgb(cmyk: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(cmyk.len() / 4 * 3);
    for pixel in cmyk.chunks_exact(4) {
        let (c, m, y, k) = (
            pixel[0] as u16,
            pixel[1] as u16,
            pixel[2] as u16,
            pixel[3] as u16,
        );
        rgb.push(255u16.saturating_sub((c + k).min(255)) as u8);
        rgb.push(255u16.saturating_sub((m + k).min(255)) as u8);
        rgb.push(255u16.saturating_sub((y + k).min(255)) as u8);
    }
    rgb
}

/// Resolve an object that might be a reference to the actual object.
fn resolve_object<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

/// Resolve an object to a dictionary, following one level of indirection.
fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    resolve_object(doc, object).as_dict().ok()
}

/// The page's `Resources -> XObject` dictionary, following references.
fn resolve_xobject_dict<'a>(doc: &'a Document, page_dict: &'a Dictionary) -> Option<&'a Dictionary> {
    let resources = page_dict.get(b"Resources").ok()?;
    let resources_dict = resolve_dict(doc, resources)?;
    let xobjects = resources_dict.get(b"XObject").ok()?;
    resolve_dict(doc, xobjects)
}

/// First filter name of a stream; `Filter` may be a name or an array.
fn extract_filter_name(dict: &Dictionary) -> Option<String> {
    match dict.get(b"Filter").ok()? {
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        Object::Array(filters) => filters.first().and_then(|first| match first {
            Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
            _ => None,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use lopdf::dictionary;

    fn jpeg_bytes(shade: u8) -> Vec<u8> {
        let img = RgbImage::from_pixel(2, 2, Rgb([shade, shade, shade]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
            .unwrap();
        buf
    }

    /// Build a PDF with the given number of embedded JPEG images per page.
    fn pdf_with_images(images_per_page: &[usize]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::new();
        for (page_idx, &count) in images_per_page.iter().enumerate() {
            let mut xobjects = Dictionary::new();
            for image_idx in 0..count {
                let stream = Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => Object::Integer(2),
                        "Height" => Object::Integer(2),
                        "ColorSpace" => "DeviceRGB",
                        "BitsPerComponent" => Object::Integer(8),
                        "Filter" => "DCTDecode",
                    },
                    jpeg_bytes((page_idx * 40 + image_idx * 10) as u8),
                );
                let id = doc.add_object(stream);
                xobjects.set(format!("Im{image_idx}").into_bytes(), Object::Reference(id));
            }

            let page = dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(2),
                    Object::Integer(2),
                ],
                "Resources" => Object::Dictionary(dictionary! {
                    "XObject" => Object::Dictionary(xobjects),
                }),
            };
            kids.push(Object::Reference(doc.add_object(page)));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => Object::Integer(count),
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn name_padding_width_follows_max_within_page_index() {
        assert_eq!(entry_name(3, 0, 1), "0_3");
        assert_eq!(entry_name(3, 7, 2), "07_3");
        assert_eq!(entry_name(12, 10, 2), "10_12");
    }

    #[test]
    fn unpadded_page_ordinals_sort_ten_before_two() {
        // The documented sharp edge: lexicographic order, ordinals unpadded.
        let mut names: Vec<String> = (1..=10).map(|page| entry_name(page, 0, 1)).collect();
        names.sort();
        assert_eq!(names[0], "0_1");
        assert_eq!(names[1], "0_10");
        assert_eq!(names[2], "0_2");
    }

    #[test]
    fn extracts_images_across_pages_including_empty_ones() {
        // Pages with 2, 0, and 1 embedded images: three pages in, three
        // images out, ordered by generated name.
        let data = pdf_with_images(&[2, 0, 1]);
        let pages = read_pdf(&data).unwrap();

        let names: Vec<&str> = pages.iter().map(|p| p.display_name()).collect();
        assert_eq!(names, ["0_1", "0_3", "1_1"]);
        assert!(pages.iter().all(|p| p.width() == 2 && p.height() == 2));
    }

    #[test]
    fn pdf_without_images_yields_empty() {
        let data = pdf_with_images(&[0, 0]);
        let pages = read_pdf(&data).unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn garbage_bytes_are_container_corrupt() {
        let err = read_pdf(b"%PDF-not really").unwrap_err();
        assert!(matches!(err, PackwerkError::ContainerCorrupt(_)));
    }
}

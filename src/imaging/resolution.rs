//! Physical resolution declared by the file.
//!
//! The `image` crate decodes pixels but does not surface the declared print
//! resolution, so it is read from the container:
//!
//! - PNG: the `pHYs` chunk (pixels per metre when the unit byte is 1).
//! - JPEG: the JFIF APP0 density fields (unit 1 = dots/inch, 2 = dots/cm).
//! - TIFF: `XResolution`/`YResolution` scaled by `ResolutionUnit`, read with
//!   the `tiff` crate.
//! - BMP: `biXPelsPerMeter`/`biYPelsPerMeter` in the info header.
//!
//! Anything else, or a file that declares only an aspect ratio, yields `None`
//! and the caller may fall back to EXIF `XResolution`/`YResolution`.

use super::container::{self, BMP_DIB_OFFSET, BMP_MAGIC};
use image::ImageFormat;
use std::io::Cursor;
use tiff::decoder::{Decoder as TiffDecoder, ifd::Value as TiffValue};
use tiff::tags::Tag as TiffTag;

const INCHES_PER_METRE: f64 = 0.0254;
const CM_PER_INCH: f64 = 2.54;

/// Declared resolution in dots per inch as `(x, y)`.
pub fn read_resolution(data: &[u8], format: ImageFormat) -> Option<(f64, f64)> {
    match format {
        ImageFormat::Png => read_png_phys(data),
        ImageFormat::Jpeg => read_jfif_density(data),
        ImageFormat::Tiff => read_tiff_resolution(data),
        ImageFormat::Bmp => read_bmp_pels(data),
        _ => None,
    }
}

fn per_metre_to_dpi(x: f64, y: f64) -> (f64, f64) {
    (x * INCHES_PER_METRE, y * INCHES_PER_METRE)
}

// ---------------------------------------------------------------------------
// PNG: pHYs chunk
// ---------------------------------------------------------------------------

/// `pHYs` data: x ppu (u32 BE) + y ppu (u32 BE) + unit (u8). Must precede `IDAT`.
fn read_png_phys(data: &[u8]) -> Option<(f64, f64)> {
    for (kind, body) in container::png_chunks(data)? {
        match kind {
            b"pHYs" if body.len() >= 9 => {
                let x = container::read_u32_be(body, 0)?;
                let y = container::read_u32_be(body, 4)?;
                // Unit 0 only states an aspect ratio
                return (body[8] == 1).then(|| per_metre_to_dpi(f64::from(x), f64::from(y)));
            }
            b"IDAT" | b"IEND" => return None,
            _ => {}
        }
    }
    None
}

// ---------------------------------------------------------------------------
// JPEG: JFIF APP0 density
// ---------------------------------------------------------------------------

const JFIF_IDENT: &[u8] = b"JFIF\0";
const APP0: u8 = 0xE0;

fn read_jfif_density(data: &[u8]) -> Option<(f64, f64)> {
    container::jpeg_segments(data)?
        .filter(|(marker, _)| *marker == APP0)
        .find_map(|(_, segment)| parse_jfif(segment))
        .flatten()
}

/// APP0 payload: "JFIF\0" + version (2) + units (1) + Xdensity (u16 BE) +
/// Ydensity (u16 BE) + thumbnail dims.
///
/// Returns `Some(None)` for a JFIF segment without absolute density,
/// `None` if the segment is not JFIF at all.
fn parse_jfif(segment: &[u8]) -> Option<Option<(f64, f64)>> {
    if !segment.starts_with(JFIF_IDENT) || segment.len() < 12 {
        return None;
    }
    let unit = segment[7];
    let x = f64::from(u16::from_be_bytes([segment[8], segment[9]]));
    let y = f64::from(u16::from_be_bytes([segment[10], segment[11]]));

    Some(match unit {
        1 => Some((x, y)),
        2 => Some((x * CM_PER_INCH, y * CM_PER_INCH)),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// TIFF: resolution tags of the first image directory
// ---------------------------------------------------------------------------

fn read_tiff_resolution(data: &[u8]) -> Option<(f64, f64)> {
    let mut decoder = TiffDecoder::new(Cursor::new(data)).ok()?;
    let x = rational(decoder.find_tag(TiffTag::XResolution).ok()??)?;
    let y = rational(decoder.find_tag(TiffTag::YResolution).ok()??)?;
    // Absent ResolutionUnit means inches
    let unit = decoder
        .find_tag_unsigned::<u16>(TiffTag::ResolutionUnit)
        .ok()
        .flatten()
        .unwrap_or(2);

    match unit {
        2 => Some((x, y)),
        3 => Some((x * CM_PER_INCH, y * CM_PER_INCH)),
        _ => None,
    }
}

fn rational(value: TiffValue) -> Option<f64> {
    match value {
        TiffValue::Rational(n, d) if d != 0 => Some(f64::from(n) / f64::from(d)),
        TiffValue::Float(x) => Some(f64::from(x)),
        TiffValue::Double(x) => Some(x),
        TiffValue::List(values) => values.into_iter().next().and_then(rational),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// BMP: info header pixels per metre
// ---------------------------------------------------------------------------

/// Pels-per-metre fields sit at DIB offsets 24 and 28 of a 40-byte or larger
/// info header. The 12-byte core header has none.
fn read_bmp_pels(data: &[u8]) -> Option<(f64, f64)> {
    if !data.starts_with(BMP_MAGIC) || container::read_u32_le(data, BMP_DIB_OFFSET)? < 40 {
        return None;
    }
    let x = container::read_i32_le(data, BMP_DIB_OFFSET + 24)?;
    let y = container::read_i32_le(data, BMP_DIB_OFFSET + 28)?;
    // Encoders that don't record a resolution write zeros
    (x > 0 && y > 0).then(|| per_metre_to_dpi(f64::from(x), f64::from(y)))
}

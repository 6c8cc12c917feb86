//! Stored color mode from the container header.
//!
//! The PNG, JPEG and BMP decoders report the color type they expand *to*
//! (palettes become RGB, 1-bit gray becomes 8-bit), so the mode the file
//! was saved in is read from the header instead:
//!
//! | Format | Field | Modes |
//! |---|---|---|
//! | PNG | `IHDR` color type + bit depth | `1`, `L`, `I;16`, `LA`, `P`, `RGB`, `RGBA` |
//! | JPEG | component count in the SOF segment | `L`, `RGB`, `CMYK` |
//! | BMP | `biBitCount` | `1`, `P` |
//! | GIF | always palette-based | `P` |
//!
//! `None` means "ask the decoder": TIFF decoders already report their
//! stored type, and BMPs above 8 bits per pixel carry no palette.

use super::container::{self, BMP_DIB_OFFSET, BMP_MAGIC};
use image::ImageFormat;

/// Mode string declared by the file header, if the format has one.
pub fn stored_mode(data: &[u8], format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => png_mode(data),
        ImageFormat::Jpeg => jpeg_mode(data),
        ImageFormat::Bmp => bmp_mode(data),
        ImageFormat::Gif => Some("P"),
        _ => None,
    }
}

/// `IHDR` body: width (4) + height (4) + bit depth (1) + color type (1) + ...
fn png_mode(data: &[u8]) -> Option<&'static str> {
    let (kind, body) = container::png_chunks(data)?.next()?;
    if kind != b"IHDR" || body.len() < 13 {
        return None;
    }
    let (depth, color) = (body[8], body[9]);

    Some(match (color, depth) {
        (0, 1) => "1",
        (0, 16) => "I;16",
        (0, _) => "L",
        (2, _) => "RGB",
        (3, _) => "P",
        (4, _) => "LA",
        (6, _) => "RGBA",
        _ => return None,
    })
}

/// SOF payload: precision (1) + height (2) + width (2) + component count (1).
fn jpeg_mode(data: &[u8]) -> Option<&'static str> {
    let (_, frame) = container::jpeg_segments(data)?
        .find(|(marker, _)| container::is_start_of_frame(*marker))?;

    match *frame.get(5)? {
        1 => Some("L"),
        3 => Some("RGB"),
        4 => Some("CMYK"),
        _ => None,
    }
}

/// `biBitCount` sits at DIB offset 14 (offset 10 in the old 12-byte core header).
fn bmp_mode(data: &[u8]) -> Option<&'static str> {
    if !data.starts_with(BMP_MAGIC) {
        return None;
    }
    let header_size = container::read_u32_le(data, BMP_DIB_OFFSET)?;
    let bits_offset = if header_size == 12 { 10 } else { 14 };
    let bits = container::read_u16_le(data, BMP_DIB_OFFSET + bits_offset)?;

    match bits {
        1 => Some("1"),
        2..=8 => Some("P"),
        _ => None,
    }
}

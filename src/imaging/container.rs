//! Byte-level walkers over image container headers.
//!
//! The `image` decoders expand pixel data on the way in and do not surface
//! everything the file declares about itself (stored color type, physical
//! resolution). [`resolution`](super::resolution) and
//! [`color_mode`](super::color_mode) read those fields directly with these
//! helpers. Nothing here decodes pixels; every walker stops quietly at the
//! first malformed structure.

pub const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
pub const JPEG_SOI: &[u8] = &[0xFF, 0xD8];
pub const BMP_MAGIC: &[u8] = b"BM";

/// Offset of the DIB header inside a BMP file (after the 14-byte file header).
pub const BMP_DIB_OFFSET: usize = 14;

// ---------------------------------------------------------------------------
// PNG chunks
// ---------------------------------------------------------------------------

/// Iterator over `(type, body)` of each PNG chunk, in file order.
///
/// Chunk layout: length (u32 BE) + type (4) + data + CRC (4). CRCs are not
/// checked.
pub struct PngChunks<'a> {
    data: &'a [u8],
    pos: usize,
}

/// Chunks of a PNG file, or `None` if the signature is missing.
pub fn png_chunks(data: &[u8]) -> Option<PngChunks<'_>> {
    data.starts_with(PNG_SIGNATURE).then_some(PngChunks {
        data,
        pos: PNG_SIGNATURE.len(),
    })
}

impl<'a> Iterator for PngChunks<'a> {
    type Item = (&'a [u8], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.data;
        let len = read_u32_be(data, self.pos)? as usize;
        let kind = data.get(self.pos + 4..self.pos + 8)?;
        let body_start = self.pos + 8;
        let body = data.get(body_start..body_start.checked_add(len)?)?;
        self.pos = body_start + len + 4;
        Some((kind, body))
    }
}

// ---------------------------------------------------------------------------
// JPEG marker segments
// ---------------------------------------------------------------------------

/// Iterator over `(marker, payload)` of each JPEG header segment up to SOS.
///
/// The payload excludes the marker and the two length bytes.
pub struct JpegSegments<'a> {
    data: &'a [u8],
    pos: usize,
}

/// Header segments of a JPEG file, or `None` if the SOI marker is missing.
pub fn jpeg_segments(data: &[u8]) -> Option<JpegSegments<'_>> {
    data.starts_with(JPEG_SOI).then_some(JpegSegments {
        data,
        pos: JPEG_SOI.len(),
    })
}

impl<'a> Iterator for JpegSegments<'a> {
    type Item = (u8, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.data;
        while self.pos + 4 <= data.len() {
            if data[self.pos] != 0xFF {
                self.pos += 1;
                continue;
            }
            let marker = data[self.pos + 1];

            // Fill bytes and markers without a length field
            if marker == 0xFF {
                self.pos += 1;
                continue;
            }
            if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
                self.pos += 2;
                continue;
            }
            // SOS: entropy-coded data follows, no more headers
            if marker == 0xDA || marker == 0xD9 {
                self.pos = data.len();
                return None;
            }

            let seg_len =
                usize::from(u16::from_be_bytes([data[self.pos + 2], data[self.pos + 3]]));
            let start = self.pos + 4;
            let end = (self.pos + 2 + seg_len).min(data.len()).max(start);
            self.pos += 2 + seg_len;
            return Some((marker, &data[start..end]));
        }
        None
    }
}

/// Start-of-frame markers (SOF0..SOF15 minus DHT, JPG and DAC).
pub fn is_start_of_frame(marker: u8) -> bool {
    (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

// ---------------------------------------------------------------------------
// Integer reads
// ---------------------------------------------------------------------------

fn bytes<const N: usize>(data: &[u8], offset: usize) -> Option<[u8; N]> {
    data.get(offset..offset.checked_add(N)?)?.try_into().ok()
}

pub fn read_u32_be(data: &[u8], offset: usize) -> Option<u32> {
    bytes(data, offset).map(u32::from_be_bytes)
}

pub fn read_u16_le(data: &[u8], offset: usize) -> Option<u16> {
    bytes(data, offset).map(u16::from_le_bytes)
}

pub fn read_u32_le(data: &[u8], offset: usize) -> Option<u32> {
    bytes(data, offset).map(u32::from_le_bytes)
}

pub fn read_i32_le(data: &[u8], offset: usize) -> Option<i32> {
    bytes(data, offset).map(i32::from_le_bytes)
}

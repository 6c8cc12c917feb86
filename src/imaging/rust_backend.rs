//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, BMP, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Capture metadata | `ImageDecoder::exif_metadata` → `kamadak-exif` tag table |
//! | ICC presence | `ImageDecoder::icc_profile` |
//! | Mode | [`color_mode`](super::color_mode) header, else `original_color_type` |
//! | DPI | [`resolution`](super::resolution) (`pHYs`, JFIF, TIFF, BMP), else EXIF |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode | `image` encoders; JPEG takes the requested quality |
//! | SVG → PNG | `resvg` (usvg parse, tiny-skia render, PNG encode) |

use super::backend::{BackendError, ImageBackend};
use super::params::{RasterizeParams, ResizeParams, TargetFormat};
use super::{color_mode, resolution};
use crate::metadata::{self, ImageMetadata, MetadataValue};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ExtendedColorType, ImageDecoder, ImageFormat, ImageReader};
use resvg::{tiny_skia, usvg};
use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, err: impl std::fmt::Display) -> BackendError {
    BackendError::Decode(format!("{}: {}", path.display(), err))
}

/// Load and decode an image from disk. The format comes from the extension.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| decode_error(path, e))
}

/// Conventional upper-case name of a container format.
fn format_name(format: ImageFormat) -> String {
    let name = match format {
        ImageFormat::Png => "PNG",
        ImageFormat::Jpeg => "JPEG",
        ImageFormat::Gif => "GIF",
        ImageFormat::Bmp => "BMP",
        ImageFormat::Tiff => "TIFF",
        ImageFormat::WebP => "WEBP",
        ImageFormat::Ico => "ICO",
        ImageFormat::Pnm => "PPM",
        ImageFormat::Tga => "TGA",
        other => {
            return other
                .extensions_str()
                .first()
                .map(|e| e.to_ascii_uppercase())
                .unwrap_or_else(|| format!("{other:?}").to_ascii_uppercase());
        }
    };
    name.to_string()
}

/// Color mode string for a decoder's reported color type.
///
/// Only consulted when the header gives no stored mode, see [`color_mode`].
fn mode_name(original: ExtendedColorType) -> &'static str {
    match original {
        ExtendedColorType::L1 => "1",
        ExtendedColorType::L2 | ExtendedColorType::L4 | ExtendedColorType::L8 => "L",
        ExtendedColorType::La8 => "LA",
        ExtendedColorType::L16 => "I;16",
        ExtendedColorType::La16 => "LA;16",
        ExtendedColorType::Rgb8 | ExtendedColorType::Bgr8 => "RGB",
        ExtendedColorType::Rgba8 | ExtendedColorType::Bgra8 => "RGBA",
        ExtendedColorType::Rgb16 => "RGB;16",
        ExtendedColorType::Rgba16 => "RGBA;16",
        ExtendedColorType::Rgb32F => "RGB;32F",
        ExtendedColorType::Rgba32F => "RGBA;32F",
        ExtendedColorType::Cmyk8 => "CMYK",
        ExtendedColorType::A8 => "A",
        _ => "RGB",
    }
}

/// EXIF `XResolution`/`YResolution` scaled to dots per inch.
fn exif_resolution(exif: &exif::Exif) -> Option<(f64, f64)> {
    let rational = |tag| match &exif.get_field(tag, exif::In::PRIMARY)?.value {
        exif::Value::Rational(v) => v.first().map(|r| r.to_f64()),
        _ => None,
    };
    let x = rational(exif::Tag::XResolution)?;
    let y = rational(exif::Tag::YResolution)?;
    let unit = exif
        .get_field(exif::Tag::ResolutionUnit, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .unwrap_or(2);

    match unit {
        2 => Some((x, y)),
        3 => Some((x * 2.54, y * 2.54)),
        _ => None,
    }
}

/// Convert pixel data to a color type the target encoder accepts.
///
/// JPEG has no alpha channel; GIF, BMP and WebP only take 8-bit data.
fn encodable(img: &DynamicImage, format: TargetFormat) -> Cow<'_, DynamicImage> {
    let color = img.color();
    let accepted = match format {
        TargetFormat::Jpeg => matches!(color, ColorType::L8 | ColorType::Rgb8),
        TargetFormat::Png => !matches!(color, ColorType::Rgb32F | ColorType::Rgba32F),
        TargetFormat::Tiff => matches!(
            color,
            ColorType::L8
                | ColorType::L16
                | ColorType::Rgb8
                | ColorType::Rgb16
                | ColorType::Rgba8
                | ColorType::Rgba16
        ),
        TargetFormat::Gif => matches!(color, ColorType::Rgb8 | ColorType::Rgba8),
        TargetFormat::Bmp | TargetFormat::Webp => matches!(
            color,
            ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8
        ),
    };
    if accepted {
        return Cow::Borrowed(img);
    }

    let converted = match format {
        TargetFormat::Jpeg if !color.has_color() => DynamicImage::ImageLuma8(img.to_luma8()),
        TargetFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        TargetFormat::Png if color.has_alpha() => DynamicImage::ImageRgba16(img.to_rgba16()),
        TargetFormat::Png => DynamicImage::ImageRgb16(img.to_rgb16()),
        _ if color.has_alpha() => DynamicImage::ImageRgba8(img.to_rgba8()),
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    };
    Cow::Owned(converted)
}

/// Encode into memory so a failed encode never leaves a partial file behind.
fn encode(img: &DynamicImage, params: &ResizeParams) -> Result<Vec<u8>, BackendError> {
    let img = encodable(img, params.format);
    let mut buf = Vec::new();

    let result = match params.format {
        TargetFormat::Jpeg => img.write_with_encoder(JpegEncoder::new_with_quality(
            &mut buf,
            params.quality.value() as u8,
        )),
        TargetFormat::Png if params.optimize => img.write_with_encoder(
            PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilterType::Adaptive),
        ),
        other => img.write_to(&mut Cursor::new(&mut buf), other.image_format()),
    };
    result.map_err(|e| BackendError::Encode(format!("{}: {}", params.format, e)))?;

    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn read_metadata(&self, path: &Path) -> Result<ImageMetadata, BackendError> {
        let format = ImageFormat::from_path(path).map_err(|e| decode_error(path, e))?;
        let bytes = std::fs::read(path)?;
        let mut decoder = ImageReader::with_format(Cursor::new(bytes.as_slice()), format)
            .into_decoder()
            .map_err(|e| decode_error(path, e))?;

        let exif = match decoder.exif_metadata().map_err(|e| decode_error(path, e))? {
            Some(raw) => match exif::Reader::new().read_raw(raw) {
                Ok(exif) => Some(exif),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Ignoring unreadable EXIF block");
                    None
                }
            },
            None => None,
        };
        let has_icc = decoder
            .icc_profile()
            .map_err(|e| decode_error(path, e))?
            .is_some_and(|profile| !profile.is_empty());
        let (width, height) = decoder.dimensions();
        let mode = color_mode::stored_mode(&bytes, format)
            .unwrap_or_else(|| mode_name(decoder.original_color_type()));
        let dpi = resolution::read_resolution(&bytes, format)
            .or_else(|| exif.as_ref().and_then(exif_resolution));

        let mut meta = ImageMetadata::new();
        if let Some(exif) = &exif {
            for field in exif.fields().filter(|f| f.ifd_num == exif::In::PRIMARY) {
                meta.insert(
                    metadata::exif_tag_name(field.tag),
                    MetadataValue::from(&field.value),
                );
            }
        }

        let icc = if has_icc {
            metadata::ICC_PRESENT
        } else {
            metadata::ICC_NOT_PRESENT
        };
        meta.insert(metadata::ICC_PROFILE, MetadataValue::text(icc));
        meta.insert(metadata::FORMAT, MetadataValue::Text(format_name(format)));
        meta.insert(metadata::MODE, MetadataValue::text(mode));
        meta.insert(metadata::SIZE, MetadataValue::Size(width, height));
        meta.insert(
            metadata::DPI,
            match dpi {
                Some((x, y)) => MetadataValue::Resolution(x, y),
                None => MetadataValue::text(metadata::UNKNOWN_DPI),
            },
        );
        meta.insert(
            metadata::BIT_DEPTH,
            MetadataValue::text(metadata::bit_depth_label(mode)),
        );

        Ok(meta)
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;

        if (params.width > img.width() || params.height > img.height()) && !params.allow_upscale
        {
            debug!(
                source = %params.source.display(),
                from = %format!("{}x{}", img.width(), img.height()),
                to = %format!("{}x{}", params.width, params.height),
                "Upscaling even though allow_upscale is off"
            );
        }

        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        let encoded = encode(&resized, params)?;
        std::fs::write(&params.output, encoded)?;
        Ok(())
    }

    fn rasterize(&self, params: &RasterizeParams) -> Result<(), BackendError> {
        let data = std::fs::read(&params.source)?;

        let mut options = usvg::Options::default();
        // Relative <image href> resolves against the SVG's own directory
        options.resources_dir = params.source.parent().map(Path::to_path_buf);
        options.fontdb_mut().load_system_fonts();

        let tree = usvg::Tree::from_data(&data, &options).map_err(|e| {
            BackendError::Rasterize(format!("{}: {}", params.source.display(), e))
        })?;
        let size = tree.size().to_int_size();
        let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| {
            BackendError::Rasterize(format!(
                "{}: cannot allocate a {}x{} canvas",
                params.source.display(),
                size.width(),
                size.height()
            ))
        })?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        let png = pixmap
            .encode_png()
            .map_err(|e| BackendError::Rasterize(format!("PNG encode failed: {e}")))?;
        std::fs::write(&params.output, png)?;
        Ok(())
    }
}

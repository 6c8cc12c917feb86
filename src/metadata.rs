//! The descriptive record produced for a single image file.
//!
//! An [`ImageMetadata`] is an ordered attribute → value mapping. Raster files
//! always carry the six descriptive keys below; EXIF tags copied from the file
//! come first, in the order the file stores them:
//!
//! | Key | Value |
//! |---|---|
//! | `Format` | Upper-case container name: `PNG`, `JPEG`, `GIF`, ... |
//! | `Mode` | Color mode: `1`, `L`, `LA`, `P`, `RGB`, `RGBA`, `CMYK`, `I;16`, ... |
//! | `Size` | `(width, height)` in pixels |
//! | `DPI` | `(x, y)` dots per inch, or `"Unknown"` |
//! | `Bit Depth` | The mode itself for `1`/`L`/`P`, else `"8-bit or higher"` |
//! | `ICC_Profile` | `"Present"` or `"Not Present"` |
//!
//! Vector files never get decoded: their record is exactly
//! `{Format: "SVG", Message: "..."}` (see [`ImageMetadata::vector`]).
//!
//! ## EXIF values
//!
//! EXIF fields are heterogeneous (ASCII strings, integer arrays, rationals,
//! opaque byte blobs), so values are a small enum rather than strings.
//! Single-element arrays collapse to the scalar; longer ones become
//! [`MetadataValue::List`].

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

pub const FORMAT: &str = "Format";
pub const MODE: &str = "Mode";
pub const SIZE: &str = "Size";
pub const DPI: &str = "DPI";
pub const BIT_DEPTH: &str = "Bit Depth";
pub const ICC_PROFILE: &str = "ICC_Profile";
pub const MESSAGE: &str = "Message";

pub const SVG_FORMAT: &str = "SVG";
pub const SVG_MESSAGE: &str = "Vector image - no raster metadata available.";
pub const UNKNOWN_DPI: &str = "Unknown";
pub const ICC_PRESENT: &str = "Present";
pub const ICC_NOT_PRESENT: &str = "Not Present";
pub const HIGH_BIT_DEPTH: &str = "8-bit or higher";

/// Modes that report themselves as their bit depth label.
const SINGLE_CHANNEL_MODES: &[&str] = &["1", "L", "P"];

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bytes(Vec<u8>),
    /// Pixel dimensions `(width, height)`.
    Size(u32, u32),
    /// Resolution `(x, y)` in dots per inch.
    Resolution(f64, f64),
    List(Vec<MetadataValue>),
}

impl MetadataValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Collapse a single-element array to its scalar.
    fn collapse(mut items: Vec<MetadataValue>) -> Self {
        if items.len() == 1 {
            items.remove(0)
        } else {
            Self::List(items)
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::Size(w, h) => write!(f, "({w}, {h})"),
            Self::Resolution(x, y) => write!(f, "({x}, {y})"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&exif::Value> for MetadataValue {
    fn from(value: &exif::Value) -> Self {
        use exif::Value;

        fn ints<T: Copy + Into<i64>>(v: &[T]) -> MetadataValue {
            MetadataValue::collapse(v.iter().map(|&n| MetadataValue::Integer(n.into())).collect())
        }

        match value {
            Value::Ascii(strings) => MetadataValue::collapse(
                strings
                    .iter()
                    .map(|s| {
                        let s = String::from_utf8_lossy(s);
                        MetadataValue::Text(s.trim_end_matches('\0').to_string())
                    })
                    .collect(),
            ),
            Value::Byte(bytes) | Value::Undefined(bytes, _) => MetadataValue::Bytes(bytes.clone()),
            Value::SByte(v) => ints(v),
            Value::Short(v) => ints(v),
            Value::SShort(v) => ints(v),
            Value::Long(v) => ints(v),
            Value::SLong(v) => ints(v),
            Value::Rational(v) => MetadataValue::collapse(
                v.iter().map(|r| MetadataValue::Float(r.to_f64())).collect(),
            ),
            Value::SRational(v) => MetadataValue::collapse(
                v.iter().map(|r| MetadataValue::Float(r.to_f64())).collect(),
            ),
            Value::Float(v) => MetadataValue::collapse(
                v.iter().map(|&x| MetadataValue::Float(f64::from(x))).collect(),
            ),
            Value::Double(v) => {
                MetadataValue::collapse(v.iter().map(|&x| MetadataValue::Float(x)).collect())
            }
            Value::Unknown(typ, count, _) => {
                MetadataValue::Text(format!("unknown type {typ} ({count} values)"))
            }
        }
    }
}

/// Human-readable key for an EXIF tag.
///
/// Known tags use their standard name (`Make`, `ExposureTime`); tags missing
/// from the table fall back to the raw numeric id.
pub fn exif_tag_name(tag: exif::Tag) -> String {
    if tag.description().is_some() {
        tag.to_string()
    } else {
        tag.number().to_string()
    }
}

/// Bit depth label for a color mode.
pub fn bit_depth_label(mode: &str) -> &str {
    if SINGLE_CHANNEL_MODES.contains(&mode) {
        mode
    } else {
        HIGH_BIT_DEPTH
    }
}

/// Ordered attribute → value mapping for one image.
///
/// Inserting an existing key replaces its value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageMetadata {
    entries: Vec<(String, MetadataValue)>,
}

impl ImageMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed record returned for vector sources.
    pub fn vector() -> Self {
        let mut meta = Self::new();
        meta.insert(FORMAT, MetadataValue::text(SVG_FORMAT));
        meta.insert(MESSAGE, MetadataValue::text(SVG_MESSAGE));
        meta
    }

    pub fn insert(&mut self, key: impl Into<String>, value: MetadataValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Shorthand for a text-valued key.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetadataValue::as_text)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for ImageMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

//! EXIF reading via kamadak-exif.

use super::{Dms, EmbeddedMetadata, MetadataReader};
use crate::error::MetadataError;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use exif::{Context, Exif, In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Windows keyword tag, stored as UTF-16LE bytes
const TAG_XP_KEYWORDS: Tag = Tag(Context::Tiff, 0x9C9E);

/// Reads EXIF blocks from JPEG, TIFF, HEIF, PNG and WebP containers
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifMetadataReader;

impl MetadataReader for ExifMetadataReader {
    fn read(&self, path: &Path) -> Result<EmbeddedMetadata, MetadataError> {
        let file = File::open(path).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut bufreader = BufReader::new(file);
        let exif = Reader::new()
            .read_from_container(&mut bufreader)
            .map_err(|e| MetadataError::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(EmbeddedMetadata {
            date_taken: date_field(&exif, Tag::DateTimeOriginal),
            date_encoded: date_field(&exif, Tag::DateTimeDigitized),
            keywords: keywords(&exif),
            gps_latitude: gps_field(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, 'S'),
            gps_longitude: gps_field(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, 'W'),
        })
    }
}

fn first_ascii(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    if let Value::Ascii(ref vec) = field.value {
        let bytes = vec.first()?;
        let s = std::str::from_utf8(bytes).ok()?;
        let trimmed = s.trim_end_matches('\0').trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    None
}

fn date_field(exif: &Exif, tag: Tag) -> Option<DateTime<Local>> {
    first_ascii(exif, tag).and_then(|s| parse_exif_datetime(&s))
}

/// Parse `YYYY:MM:DD HH:MM:SS` as local wall-clock time.
///
/// Cameras write zeroed or blank dates when the clock was never set;
/// those parse to `None`.
pub(crate) fn parse_exif_datetime(s: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), "%Y:%m:%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S"))
        .ok()?;
    Local.from_local_datetime(&naive).earliest()
}

fn keywords(exif: &Exif) -> Vec<String> {
    let Some(field) = exif.get_field(TAG_XP_KEYWORDS, In::PRIMARY) else {
        return Vec::new();
    };
    match field.value {
        Value::Byte(ref bytes) => split_keywords(&decode_utf16le(bytes)),
        _ => Vec::new(),
    }
}

fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .collect();
    String::from_utf16_lossy(&units)
}

fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn gps_field(exif: &Exif, tag: Tag, ref_tag: Tag, negative_ref: char) -> Option<Dms> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let dms = match field.value {
        Value::Rational(ref parts) if parts.len() >= 3 => Dms::new(
            parts[0].to_f64(),
            parts[1].to_f64(),
            parts[2].to_f64(),
        ),
        _ => return None,
    };

    let negative = first_ascii(exif, ref_tag)
        .and_then(|r| r.chars().next())
        .is_some_and(|c| c.eq_ignore_ascii_case(&negative_ref));

    Some(if negative { dms.negated() } else { dms })
}

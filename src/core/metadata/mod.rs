//! # Metadata Module
//!
//! Reads and writes metadata embedded inside photo and video files.
//!
//! ## Fields
//! - Date taken (`DateTimeOriginal`)
//! - Date encoded (`DateTimeDigitized`, a.k.a. CreateDate)
//! - Keywords (`XPKeywords`)
//! - GPS latitude / longitude
//!
//! Files without metadata are normal: readers return an error value that
//! callers turn into "absent", and writers fail per slot.

mod reader;
mod writer;

pub use reader::ExifMetadataReader;
pub use writer::ExifMetadataWriter;

use crate::error::MetadataError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Metadata extracted from inside a file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedMetadata {
    /// When the picture was taken
    pub date_taken: Option<DateTime<Local>>,
    /// When the media was encoded/digitized
    pub date_encoded: Option<DateTime<Local>>,
    /// Keywords attached to the file
    pub keywords: Vec<String>,
    /// Latitude, signed by hemisphere
    pub gps_latitude: Option<Dms>,
    /// Longitude, signed by hemisphere
    pub gps_longitude: Option<Dms>,
}

impl EmbeddedMetadata {
    /// The embedded timestamp used for sorting: date taken, else date encoded
    pub fn timestamp(&self) -> Option<DateTime<Local>> {
        self.date_taken.or(self.date_encoded)
    }

    /// Decimal `(latitude, longitude)` when both are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (&self.gps_latitude, &self.gps_longitude) {
            (Some(lat), Some(lon)) => Some((lat.to_decimal_degrees(), lon.to_decimal_degrees())),
            _ => None,
        }
    }
}

/// A degrees/minutes/seconds angle.
///
/// The sign of `degrees` is the sign of the whole angle, so
/// `[-79, 56, 55]` is 79°56'55" west.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dms {
    pub degrees: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl Dms {
    pub fn new(degrees: f64, minutes: f64, seconds: f64) -> Self {
        Self {
            degrees,
            minutes,
            seconds,
        }
    }

    /// `degrees + minutes/60 + seconds/3600`, carrying the sign of `degrees`
    pub fn to_decimal_degrees(&self) -> f64 {
        let magnitude = self.degrees.abs() + self.minutes / 60.0 + self.seconds / 3600.0;
        if self.degrees.is_sign_negative() {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Flip to the negative hemisphere (south / west)
    pub fn negated(self) -> Self {
        Self {
            degrees: -self.degrees,
            ..self
        }
    }
}

impl From<[f64; 3]> for Dms {
    fn from([degrees, minutes, seconds]: [f64; 3]) -> Self {
        Self::new(degrees, minutes, seconds)
    }
}

/// The two embedded date slots that get corrected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateSlot {
    /// `DateTimeOriginal`
    DateTaken,
    /// `DateTimeDigitized` / CreateDate
    DateEncoded,
}

impl DateSlot {
    pub const ALL: [DateSlot; 2] = [DateSlot::DateTaken, DateSlot::DateEncoded];
}

impl fmt::Display for DateSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateSlot::DateTaken => write!(f, "date taken"),
            DateSlot::DateEncoded => write!(f, "date encoded"),
        }
    }
}

/// Source of embedded metadata
pub trait MetadataReader: Send + Sync {
    /// Read whatever metadata `path` carries
    fn read(&self, path: &Path) -> Result<EmbeddedMetadata, MetadataError>;
}

/// Sink for corrected embedded dates, one slot at a time
pub trait MetadataWriter: Send + Sync {
    /// Write `time` into `slot`; failure leaves the other slot unaffected
    fn write_date(
        &self,
        path: &Path,
        slot: DateSlot,
        time: DateTime<Local>,
    ) -> Result<(), MetadataError>;

    /// Whether `path` can hold embedded dates at all. Must not modify the file.
    fn supports(&self, _path: &Path) -> bool {
        true
    }
}

/// A tiny JPEG that already carries an EXIF block
#[cfg(test)]
pub(crate) fn exif_jpeg(path: &Path) {
    use little_exif::exif_tag::ExifTag;
    use little_exif::metadata::Metadata;

    #[rustfmt::skip]
    const JPEG: &[u8] = &[
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01,
        0x01, 0x01, 0x00, 0x48, 0x00, 0x48, 0x00, 0x00, 0xFF, 0xDB, 0x00, 0x43,
        0x00, 0x03, 0x02, 0x02, 0x02, 0x02, 0x02, 0x03, 0x02, 0x02, 0x02, 0x03,
        0x03, 0x03, 0x03, 0x04, 0x06, 0x04, 0x04, 0x04, 0x04, 0x04, 0x08, 0x06,
        0x06, 0x05, 0x06, 0x09, 0x08, 0x0A, 0x0A, 0x09, 0x08, 0x09, 0x09, 0x0A,
        0x0C, 0x0F, 0x0C, 0x0A, 0x0B, 0x0E, 0x0B, 0x09, 0x09, 0x0D, 0x11, 0x0D,
        0x0E, 0x0F, 0x10, 0x10, 0x11, 0x10, 0x0A, 0x0C, 0x12, 0x13, 0x12, 0x10,
        0x13, 0x0F, 0x10, 0x10, 0x10, 0xFF, 0xC9, 0x00, 0x0B, 0x08, 0x00, 0x01,
        0x00, 0x01, 0x01, 0x01, 0x11, 0x00, 0xFF, 0xCC, 0x00, 0x06, 0x00, 0x10,
        0x10, 0x05, 0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00,
        0xD2, 0xCF, 0x20, 0xFF, 0xD9,
    ];

    std::fs::write(path, JPEG).unwrap();
    let mut metadata = Metadata::new();
    metadata.set_tag(ExifTag::ImageDescription("fixture".to_string()));
    metadata.write_to_file(path).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn dms_converts_to_decimal() {
        let lat = Dms::from([40.0, 26.0, 46.0]);
        assert!((lat.to_decimal_degrees() - 40.44611).abs() < 1e-5);
    }

    #[test]
    fn negative_degrees_negate_whole_angle() {
        let lon = Dms::from([-79.0, 56.0, 55.0]);
        assert!((lon.to_decimal_degrees() + 79.94861).abs() < 1e-5);
        assert_eq!(
            Dms::from([79.0, 56.0, 55.0]).negated().to_decimal_degrees(),
            lon.to_decimal_degrees()
        );
    }

    #[test]
    fn timestamp_prefers_date_taken() {
        let taken = Local.with_ymd_and_hms(2020, 5, 1, 12, 0, 0).unwrap();
        let encoded = Local.with_ymd_and_hms(2019, 5, 1, 12, 0, 0).unwrap();

        let meta = EmbeddedMetadata {
            date_taken: Some(taken),
            date_encoded: Some(encoded),
            ..Default::default()
        };
        assert_eq!(meta.timestamp(), Some(taken));

        let video = EmbeddedMetadata {
            date_encoded: Some(encoded),
            ..Default::default()
        };
        assert_eq!(video.timestamp(), Some(encoded));
        assert_eq!(EmbeddedMetadata::default().timestamp(), None);
    }

    #[test]
    fn coordinates_need_both_axes() {
        let mut meta = EmbeddedMetadata {
            gps_latitude: Some(Dms::from([40.0, 26.0, 46.0])),
            ..Default::default()
        };
        assert!(meta.coordinates().is_none());

        meta.gps_longitude = Some(Dms::from([-79.0, 56.0, 55.0]));
        let (lat, lon) = meta.coordinates().unwrap();
        assert!(lat > 40.0 && lon < -79.0);
    }

    #[test]
    fn slots_display_human_names() {
        assert_eq!(DateSlot::DateTaken.to_string(), "date taken");
        assert_eq!(DateSlot::DateEncoded.to_string(), "date encoded");
    }
}
